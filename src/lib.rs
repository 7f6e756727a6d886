//! Cardgen - personalized birthday cards from an AI-generated image.
//!
//! Attributes become a text prompt, the prompt becomes an image via the
//! provider, and the image is laid out on a single-page PDF. The same
//! pipeline backs the CLI and the web form.

pub mod acquire;
pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod compose;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod ports;
pub mod prompt;
pub mod server;

pub use compose::{Composer, Layout};
pub use context::ServiceContext;
pub use error::CardError;
pub use model::Attributes;
pub use pipeline::{generate_card, CardOptions};
pub use prompt::build_prompt;
