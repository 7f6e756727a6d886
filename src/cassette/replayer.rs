//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use thiserror::Error;

use super::format::{Call, Cassette, CassetteError, Interaction};

/// A replay request the cassette cannot satisfy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// Nothing was recorded for this call.
    #[error("Cassette has no interactions recorded for {call}. Recorded calls: [{available}]")]
    NotRecorded {
        /// Requested call.
        call: Call,
        /// Comma-separated recorded calls.
        available: String,
    },

    /// Every recorded interaction for this call was already served.
    #[error("Cassette exhausted: all {count} interactions for {call} have been consumed")]
    Exhausted {
        /// Requested call.
        call: Call,
        /// How many were recorded.
        count: usize,
    },
}

/// Per-call queues of recorded interactions.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<Call, VecDeque<Interaction>>,
    served: HashMap<Call, usize>,
}

impl CassetteReplayer {
    /// Index a cassette's interactions by call. Entries for unknown ports are skipped.
    #[must_use]
    pub fn new(cassette: Cassette) -> Self {
        let mut queues: HashMap<Call, VecDeque<Interaction>> = HashMap::new();
        for interaction in cassette.interactions {
            match Call::from_parts(&interaction.port, &interaction.method) {
                Some(call) => queues.entry(call).or_default().push_back(interaction),
                None => tracing::warn!(
                    port = %interaction.port,
                    method = %interaction.method,
                    "skipping unknown cassette interaction"
                ),
            }
        }
        Self { queues, served: HashMap::new() }
    }

    /// Load a cassette file for replay.
    ///
    /// # Errors
    ///
    /// Returns a [`CassetteError`] if the file cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self, CassetteError> {
        Cassette::load(path).map(Self::new)
    }

    /// Take the next recorded interaction for `call`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was recorded for the call or the recorded
    /// interactions are used up.
    pub fn next_interaction(&mut self, call: Call) -> Result<Interaction, ReplayError> {
        let Some(queue) = self.queues.get_mut(&call) else {
            let mut available: Vec<String> = self.queues.keys().map(Call::to_string).collect();
            available.sort();
            return Err(ReplayError::NotRecorded { call, available: available.join(", ") });
        };

        let served = self.served.entry(call).or_insert(0);
        let interaction = queue.pop_front().ok_or(ReplayError::Exhausted { call, count: *served })?;
        *served += 1;
        Ok(interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }
    }

    fn interaction(seq: u64, port: &str, method: &str) -> Interaction {
        Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input: json!({}),
            output: json!({"Ok": {"url": "https://img.example/a.png"}}),
        }
    }

    #[test]
    fn replay_in_order_per_call() {
        let mut replayer = CassetteReplayer::new(make_cassette(vec![
            interaction(0, "image_generator", "generate"),
            interaction(1, "image_fetcher", "fetch"),
            interaction(2, "image_generator", "generate"),
        ]));

        assert_eq!(replayer.next_interaction(Call::Generate).unwrap().seq, 0);
        assert_eq!(replayer.next_interaction(Call::Generate).unwrap().seq, 2);
        assert_eq!(replayer.next_interaction(Call::Fetch).unwrap().seq, 1);
    }

    #[test]
    fn exhausted_replayer_errors() {
        let cassette = make_cassette(vec![interaction(0, "image_generator", "generate")]);
        let mut replayer = CassetteReplayer::new(cassette);
        assert!(replayer.next_interaction(Call::Generate).is_ok());
        let err = replayer.next_interaction(Call::Generate).unwrap_err();
        assert_eq!(err, ReplayError::Exhausted { call: Call::Generate, count: 1 });
        assert!(err.to_string().contains("Cassette exhausted"));
    }

    #[test]
    fn missing_call_lists_recorded_calls() {
        let mut replayer = CassetteReplayer::new(make_cassette(vec![
            interaction(0, "image_fetcher", "fetch"),
            interaction(1, "legacy_port", "upload"),
        ]));
        let err = replayer.next_interaction(Call::Generate).unwrap_err();
        assert!(err.to_string().contains("no interactions recorded for image_generator::generate"));
        assert!(err.to_string().contains("[image_fetcher::fetch]"));
    }

    #[test]
    fn open_missing_file_fails() {
        assert!(CassetteReplayer::open(Path::new("/nonexistent/cassette.yaml")).is_err());
    }
}
