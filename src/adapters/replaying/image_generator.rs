//! Replaying adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::Call;
use crate::error::CardError;
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, GenerationResponse, ImageGenerator,
};

/// Serves recorded generation results from a cassette.
pub struct ReplayingImageGenerator {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageGenerator {
    /// Create a replaying generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageGenerator for ReplayingImageGenerator {
    fn generate(&self, _request: &GenerationRequest) -> GenerateFuture<'_> {
        let result = match next_output(&self.replayer, Call::Generate)
            .and_then(replay_result::<GenerationResponse>)
        {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(recorded)) => Err(CardError::Generation {
                status: recorded.status.unwrap_or(0),
                message: recorded.message,
            }),
            Err(e) => Err(CardError::Generation { status: 0, message: e.to_string() }),
        };
        Box::pin(async move { result })
    }
}
