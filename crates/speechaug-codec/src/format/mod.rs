//! Audio container codecs
//!
//! Each codec is feature-gated:
//! - `wav`: WAV via hound (pure Rust)

#[cfg(feature = "wav")]
pub mod wav;
