pub mod prompt;

use crate::document::Segment;
use crate::integrity::{verify_round_trip, IntegrityMismatch};
use crate::oracle::{
    parse_json_array, pause, FormatError, Oracle, OracleError, OracleRequest, RetryPolicy,
};
use crate::shared::EventLog;
use serde_json::json;
use std::time::Duration;

pub use prompt::{segmentation_request, SEGMENTATION_RULES};

pub const DEFAULT_SEGMENT_ATTEMPTS: u32 = 5;
pub const DEFAULT_SEGMENT_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    pub model: String,
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_attempts: DEFAULT_SEGMENT_ATTEMPTS,
            backoff_base: DEFAULT_SEGMENT_BACKOFF,
        }
    }
}

impl SegmenterConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(self.max_attempts, self.backoff_base)
    }
}

/// Why a single segmentation attempt was rejected. All of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentAttemptError {
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Integrity(#[from] IntegrityMismatch),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentationError {
    #[error("transcript is empty")]
    EmptyTranscript,
    #[error("segmentation gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: SegmentAttemptError,
    },
}

/// Splits transcripts into statements through the oracle and refuses any
/// split that does not reproduce the transcript's content exactly.
#[derive(Debug, Clone)]
pub struct Segmenter<O> {
    oracle: O,
    config: SegmenterConfig,
    log: EventLog,
}

impl<O: Oracle> Segmenter<O> {
    pub fn new(oracle: O, config: SegmenterConfig) -> Self {
        Self {
            oracle,
            config,
            log: EventLog::disabled(),
        }
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    /// Returns the statements in oracle order. Parse failures, transport
    /// failures and content drift all consume one attempt; the budget is
    /// `max_attempts` with exponential backoff in between.
    pub fn segment(&self, transcript: &str) -> Result<Vec<String>, SegmentationError> {
        if transcript.trim().is_empty() {
            return Err(SegmentationError::EmptyTranscript);
        }

        let request = segmentation_request(&self.config.model, transcript);
        let policy = self.config.retry_policy();
        let mut attempt = 0_u32;
        loop {
            attempt += 1;
            let failure = match self.attempt(&request, transcript) {
                Ok(statements) => {
                    self.log.info(
                        "segment.verified",
                        &[
                            ("attempt", json!(attempt)),
                            ("statements", json!(statements.len())),
                        ],
                    );
                    return Ok(statements);
                }
                Err(failure) => failure,
            };

            self.log.warn(
                "segment.attempt_failed",
                &[
                    ("attempt", json!(attempt)),
                    ("max_attempts", json!(self.config.max_attempts)),
                    ("reason", json!(failure.to_string())),
                ],
            );

            if !policy.allows_another(attempt) {
                self.log.error(
                    "segment.exhausted",
                    &[
                        ("attempts", json!(attempt)),
                        ("reason", json!(failure.to_string())),
                    ],
                );
                return Err(SegmentationError::Exhausted {
                    attempts: attempt,
                    last: failure,
                });
            }
            pause(policy.delay_after(attempt));
        }
    }

    /// [`Segmenter::segment`] followed by [`into_segments`].
    pub fn segment_indexed(&self, transcript: &str) -> Result<Vec<Segment>, SegmentationError> {
        self.segment(transcript).map(into_segments)
    }

    fn attempt(
        &self,
        request: &OracleRequest,
        transcript: &str,
    ) -> Result<Vec<String>, SegmentAttemptError> {
        let reply = self.oracle.complete(request)?;
        let statements: Vec<String> = parse_json_array(&reply)?;
        verify_round_trip(transcript, &statements)?;
        Ok(statements)
    }
}

/// Numbers statements from 0 in the given order; labels start unset.
pub fn into_segments(statements: Vec<String>) -> Vec<Segment> {
    statements
        .into_iter()
        .enumerate()
        .map(|(index, text)| Segment::new(index as u32, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_segments_assigns_sequential_indices() {
        let segments = into_segments(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(segments[0], Segment::new(0, "a"));
        assert_eq!(segments[1], Segment::new(1, "b"));
    }

    #[test]
    fn default_budget_is_five_attempts() {
        let policy = SegmenterConfig::default().retry_policy();
        assert_eq!(policy.max_attempts(), Some(5));
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
    }
}
