//! Adapter implementations for port traits.
//!
//! - `live/`: real provider and download implementations
//! - `recording/`: record interactions to cassettes
//! - `replaying/`: replay interactions from cassettes

pub mod live;
pub mod recording;
pub mod replaying;
