//! Audio loading, slicing and streaming
//!
//! The decoder adapter and resampler are the leaves; the full-clip loader
//! and the byte-range streaming engine build on them, and the WAV module
//! provides the container header both of them emit.

pub mod decoder;
pub mod filter;
pub mod loader;
pub mod resampler;
pub mod stream;
pub mod wav;
pub mod waveform;

pub use loader::load_clip;
pub use stream::{stream_chunk, stream_range, ByteRange, StreamChunk, StreamOptions};
pub use waveform::Waveform;
