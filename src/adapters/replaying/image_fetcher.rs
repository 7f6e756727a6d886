//! Replaying adapter for the `ImageFetcher` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::Call;
use crate::error::CardError;
use crate::ports::image_fetcher::{FetchFuture, FetchedImage, ImageFetcher};

/// Serves recorded image downloads from a cassette.
pub struct ReplayingImageFetcher {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageFetcher {
    /// Create a replaying fetcher backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageFetcher for ReplayingImageFetcher {
    fn fetch(&self, _url: &str) -> FetchFuture<'_> {
        let result = match next_output(&self.replayer, Call::Fetch)
            .and_then(replay_result::<FetchedImage>)
        {
            Ok(Ok(image)) => Ok(image),
            Ok(Err(recorded)) => Err(CardError::Download(recorded.message)),
            Err(e) => Err(CardError::Download(e.to_string())),
        };
        Box::pin(async move { result })
    }
}
