//! WAV container codec using hound
//!
//! Reads and writes 8/16/24/32-bit integer and 32-bit float PCM with any
//! channel count. Integer samples are scaled by `2^(bits-1)` in both
//! directions, so decoding and re-encoding at the same depth is lossless.

use crate::error::{CodecError, Result};
use crate::options::BitDepth;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use speechaug_core::Waveform;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

/// A decoded WAV file: samples plus the encoding they were stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub waveform: Waveform,
    pub bit_depth: BitDepth,
}

/// Decode a WAV file from disk.
pub fn read_wav_file(path: &Path) -> Result<DecodedAudio> {
    let file = File::open(path)?;
    read_wav(BufReader::new(file))
}

/// Decode a WAV stream.
pub fn read_wav<R: Read>(reader: R) -> Result<DecodedAudio> {
    let mut reader = WavReader::new(reader)?;
    let spec = reader.spec();
    let bit_depth = bit_depth_from_spec(&spec)?;

    let interleaved: Vec<f32> = match bit_depth {
        BitDepth::Float32 => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        _ => {
            let scale = 1.0 / bit_depth.full_scale();
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f64 * scale) as f32))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let waveform =
        Waveform::from_interleaved(&interleaved, spec.channels as usize, spec.sample_rate)?;
    Ok(DecodedAudio {
        waveform,
        bit_depth,
    })
}

/// Encode a waveform to a WAV file.
///
/// The file is written to a temporary sibling and renamed over `path` only
/// after the encoder has finalized, so a failure never leaves a partial
/// file at `path`.
pub fn write_wav_file(path: &Path, wave: &Waveform, bit_depth: BitDepth) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".speechaug-").suffix(".part");
    // Temp files default to owner-only; artifacts are ordinary corpus files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let mut tmp = builder.tempfile_in(dir)?;

    {
        let writer = BufWriter::new(tmp.as_file_mut());
        write_wav(writer, wave, bit_depth)?;
    }

    tmp.persist(path)?;
    log::debug!(
        "wrote {} ({} frames @ {} Hz, {}-bit)",
        path.display(),
        wave.frames(),
        wave.sample_rate(),
        bit_depth.bits()
    );
    Ok(())
}

/// Encode a waveform into any seekable writer.
pub fn write_wav<W: Write + Seek>(writer: W, wave: &Waveform, bit_depth: BitDepth) -> Result<()> {
    let channels = u16::try_from(wave.num_channels()).map_err(|_| {
        CodecError::Encoding(format!("{} channels exceed WAV limit", wave.num_channels()))
    })?;
    let spec = create_wav_spec(wave.sample_rate(), channels, bit_depth);

    let mut writer =
        WavWriter::new(writer, spec).map_err(|e| CodecError::Encoding(e.to_string()))?;
    write_samples(&mut writer, wave, bit_depth)?;

    // Finalize writes the header sizes and flushes
    writer
        .finalize()
        .map_err(|e| CodecError::Encoding(e.to_string()))?;
    Ok(())
}

/// Map a hound spec onto a supported bit depth.
fn bit_depth_from_spec(spec: &WavSpec) -> Result<BitDepth> {
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => Ok(BitDepth::Int8),
        (SampleFormat::Int, 16) => Ok(BitDepth::Int16),
        (SampleFormat::Int, 24) => Ok(BitDepth::Int24),
        (SampleFormat::Int, 32) => Ok(BitDepth::Int32),
        (SampleFormat::Float, 32) => Ok(BitDepth::Float32),
        (format, bits) => Err(CodecError::UnsupportedFormat(format!(
            "{}-bit {:?} WAV",
            bits, format
        ))),
    }
}

/// Create hound WavSpec from our config
fn create_wav_spec(sample_rate: u32, channels: u16, bit_depth: BitDepth) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bit_depth.bits(),
        sample_format: if bit_depth.is_float() {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    }
}

/// Write interleaved samples to the writer
fn write_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    wave: &Waveform,
    bit_depth: BitDepth,
) -> Result<()> {
    let channels = wave.channels();
    for i in 0..wave.frames() {
        for ch in channels {
            let sample = ch[i];
            let res = if bit_depth.is_float() {
                writer.write_sample(sample)
            } else {
                writer.write_sample(float_to_int(sample, bit_depth))
            };
            res.map_err(|e| CodecError::Encoding(e.to_string()))?;
        }
    }
    Ok(())
}

/// Convert a float sample to an integer of the given depth, with clipping
#[inline]
fn float_to_int(sample: f32, bit_depth: BitDepth) -> i32 {
    let full = bit_depth.full_scale();
    let scaled = (sample as f64 * full).round();
    scaled.clamp(-full, full - 1.0) as i32
}
