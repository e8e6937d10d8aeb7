//! Encoding of the finished frame sequence.
//!
//! Encoders consume a directory of `frame_%06d.png` files in index order and produce one output.

/// `ffmpeg`-based encoder (system binary).
pub mod ffmpeg;
/// Encoder trait and built-in in-memory encoder.
pub mod sink;
