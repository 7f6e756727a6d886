//! Recording adapters that capture interactions to cassettes.

pub mod image_fetcher;
pub mod image_generator;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::{Call, RecordedError};
use crate::error::CardError;

/// Record a port result using the Ok/Err JSON convention.
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    call: Call,
    input: &I,
    result: &Result<T, CardError>,
) where
    T: Serialize,
    I: Serialize,
{
    let input_json = to_json(input);

    let output_json = match result {
        Ok(v) => serde_json::json!({ "Ok": to_json(v) }),
        Err(e) => serde_json::json!({ "Err": to_json(&recorded_error(e)) }),
    };

    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(call, input_json, output_json);
}

fn recorded_error(err: &CardError) -> RecordedError {
    match err {
        CardError::Generation { status, message } => {
            RecordedError { status: Some(*status), message: message.clone() }
        }
        CardError::Download(message) | CardError::Decode(message) => {
            RecordedError { status: None, message: message.clone() }
        }
        other => RecordedError { status: None, message: other.to_string() },
    }
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value)
        .unwrap_or_else(|e| serde_json::json!({ "unserializable": e.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_keeps_status() {
        let err = CardError::Generation { status: 429, message: "rate limited".into() };
        assert_eq!(
            recorded_error(&err),
            RecordedError { status: Some(429), message: "rate limited".into() }
        );
    }

    #[test]
    fn download_error_drops_prefix() {
        let err = CardError::Download("HTTP 404".into());
        assert_eq!(recorded_error(&err).message, "HTTP 404");
    }
}
