//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the card pipeline and an
//! external system. Implementations live in `src/adapters/`.

pub mod image_fetcher;
pub mod image_generator;

pub use image_fetcher::{FetchedImage, ImageFetcher};
pub use image_generator::{GenerationRequest, GenerationResponse, ImageGenerator};
