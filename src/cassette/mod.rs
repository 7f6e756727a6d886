//! Record/replay infrastructure for deterministic runs without the provider.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::{Call, Cassette, CassetteError, RecordedError};
