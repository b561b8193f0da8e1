//! Tolerance constants for audio testing.

/// Audio perceptual tolerance (~-60dB, inaudible differences).
pub const PERCEPTUAL_EPSILON: f32 = 0.001;

/// 16-bit quantization step size.
/// Use when comparing a 16-bit fixture with its re-encoded copy.
pub const INT16_EPSILON: f32 = 1.0 / 32768.0;

/// 24-bit quantization step size.
pub const INT24_EPSILON: f32 = 1.0 / 8388608.0;
