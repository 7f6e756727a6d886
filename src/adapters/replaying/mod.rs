//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_fetcher;
pub mod image_generator;

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::{Call, RecordedError};

/// Boxed error returned when a replayed output cannot be served.
pub(crate) type ReplayFailure = Box<dyn std::error::Error + Send + Sync>;

/// Retrieve the next recorded output for `call`.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    call: Call,
) -> Result<serde_json::Value, ReplayFailure> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(guard.next_interaction(call)?.output)
}

/// Deserialize a replayed output as the port's recorded `Result<T, _>`.
///
/// The outer error is a malformed cassette; the inner one is the failure the
/// live port returned when the cassette was recorded. A bare string under
/// `Err` is accepted as a message without a status.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<Result<T, RecordedError>, ReplayFailure> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        let recorded = match err_val {
            serde_json::Value::String(message) => {
                RecordedError { status: None, message: message.clone() }
            }
            other => serde_json::from_value(other.clone())?,
        };
        return Ok(Err(recorded));
    }
    let ok_val = output.get("Ok").or_else(|| output.get("ok")).unwrap_or(&output);
    Ok(Ok(serde_json::from_value(ok_val.clone())?))
}
