pub mod prompt;

use crate::document::Segment;
use crate::labels::{check_coverage, validate, CoverageGap, LabelEntry, LabelSet};
use crate::oracle::{
    parse_json_array, pause, FormatError, Oracle, OracleError, OracleRequest, RetryPolicy,
};
use crate::shared::EventLog;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

pub use prompt::{classification_request, indexed_statements, system_instructions};

pub const DEFAULT_HOME_LABEL: &str = "FC Bayern München";
pub const DEFAULT_NEUTRAL_LABEL: &str = "Neutral";
pub const DEFAULT_CLASSIFY_ATTEMPTS: u32 = 10;
pub const DEFAULT_CLASSIFY_RETRY_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_TRANSPORT_FAILURE_LIMIT: u32 = 5;
pub const DEFAULT_TRANSPORT_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model: String,
    pub home_label: String,
    pub neutral_label: String,
    /// Known personnel names, injected verbatim into the instructions.
    pub roster: String,
    /// `None` re-sends the batch until a fully valid reply arrives.
    pub max_attempts: Option<u32>,
    pub retry_delay: Duration,
    pub max_consecutive_transport_failures: u32,
    pub transport_backoff_base: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            home_label: DEFAULT_HOME_LABEL.to_string(),
            neutral_label: DEFAULT_NEUTRAL_LABEL.to_string(),
            roster: String::new(),
            max_attempts: Some(DEFAULT_CLASSIFY_ATTEMPTS),
            retry_delay: DEFAULT_CLASSIFY_RETRY_DELAY,
            max_consecutive_transport_failures: DEFAULT_TRANSPORT_FAILURE_LIMIT,
            transport_backoff_base: DEFAULT_TRANSPORT_BACKOFF,
        }
    }
}

/// Why one classification batch was refused. Every variant triggers a
/// resend of the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchRejection {
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("{} labels outside the allowed set", .0.len())]
    InvalidLabels(Vec<LabelEntry>),
    #[error("reply does not cover the statement indices: {0}")]
    Coverage(CoverageGap),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("document has no segments to classify")]
    NoSegments,
    #[error("document has no opponent name")]
    MissingOpponent,
    #[error("classification gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: BatchRejection },
    #[error("oracle unreachable after {failures} consecutive failures: {last}")]
    OracleUnavailable { failures: u32, last: OracleError },
}

/// Assigns every segment of a document one of its three labels.
///
/// The whole document goes out as a single batch. A reply is only accepted
/// when it parses, every label is a member of the document's label set, and
/// it labels each input index exactly once; otherwise the identical request
/// is sent again.
#[derive(Debug, Clone)]
pub struct Classifier<O> {
    oracle: O,
    config: ClassifierConfig,
    log: EventLog,
}

impl<O: Oracle> Classifier<O> {
    pub fn new(oracle: O, config: ClassifierConfig) -> Self {
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

    pub fn label_set_for(&self, opponent: &str) -> LabelSet {
        LabelSet::new(
            self.config.home_label.as_str(),
            opponent,
            self.config.neutral_label.as_str(),
        )
    }

    pub fn request_for(&self, segments: &[Segment], labels: &LabelSet) -> OracleRequest {
        classification_request(&self.config.model, labels, &self.config.roster, segments)
    }

    pub fn classify(
        &self,
        segments: &[Segment],
        opponent: &str,
    ) -> Result<Vec<Segment>, ClassificationError> {
        if segments.is_empty() {
            return Err(ClassificationError::NoSegments);
        }
        if opponent.trim().is_empty() {
            return Err(ClassificationError::MissingOpponent);
        }

        let labels = self.label_set_for(opponent);
        let request = self.request_for(segments, &labels);
        let expected: Vec<u32> = segments.iter().map(|segment| segment.index).collect();
        let entries = self.obtain_valid_batch(&request, &labels, &expected)?;
        Ok(merge_labels(segments, &entries))
    }

    fn obtain_valid_batch(
        &self,
        request: &OracleRequest,
        labels: &LabelSet,
        expected: &[u32],
    ) -> Result<Vec<LabelEntry>, ClassificationError> {
        let policy = RetryPolicy::fixed(self.config.max_attempts, self.config.retry_delay);
        let transport_policy = RetryPolicy::exponential(
            self.config.max_consecutive_transport_failures,
            self.config.transport_backoff_base,
        );
        let mut attempt = 0_u32;
        let mut consecutive_transport = 0_u32;

        loop {
            attempt += 1;
            let rejection = match self.attempt(request, labels, expected) {
                Ok(entries) => {
                    self.log.info(
                        "classify.accepted",
                        &[
                            ("attempt", json!(attempt)),
                            ("opponent", json!(labels.opponent())),
                            ("statements", json!(entries.len())),
                        ],
                    );
                    return Ok(entries);
                }
                Err(rejection) => rejection,
            };

            self.log.warn(
                "classify.attempt_failed",
                &attempt_fields(attempt, &rejection),
            );

            let delay = if let BatchRejection::Oracle(err) = &rejection {
                consecutive_transport += 1;
                if !transport_policy.allows_another(consecutive_transport) {
                    self.log.error(
                        "classify.exhausted",
                        &[
                            ("attempts", json!(attempt)),
                            ("reason", json!(err.to_string())),
                        ],
                    );
                    return Err(ClassificationError::OracleUnavailable {
                        failures: consecutive_transport,
                        last: err.clone(),
                    });
                }
                transport_policy.delay_after(consecutive_transport)
            } else {
                consecutive_transport = 0;
                policy.delay_after(attempt)
            };

            if !policy.allows_another(attempt) {
                self.log.error(
                    "classify.exhausted",
                    &[
                        ("attempts", json!(attempt)),
                        ("reason", json!(rejection.to_string())),
                    ],
                );
                return Err(ClassificationError::Exhausted {
                    attempts: attempt,
                    last: rejection,
                });
            }
            pause(delay);
        }
    }

    fn attempt(
        &self,
        request: &OracleRequest,
        labels: &LabelSet,
        expected: &[u32],
    ) -> Result<Vec<LabelEntry>, BatchRejection> {
        let reply = self.oracle.complete(request)?;
        let entries: Vec<LabelEntry> = parse_json_array(&reply)?;
        let report = validate(&entries, labels);
        if !report.is_valid() {
            return Err(BatchRejection::InvalidLabels(report.invalid));
        }
        check_coverage(&entries, expected).map_err(BatchRejection::Coverage)?;
        Ok(entries)
    }
}

fn attempt_fields(attempt: u32, rejection: &BatchRejection) -> Vec<(&'static str, Value)> {
    let mut fields = vec![
        ("attempt", json!(attempt)),
        ("reason", json!(rejection.to_string())),
    ];
    if let BatchRejection::InvalidLabels(invalid) = rejection {
        fields.push((
            "invalid",
            Value::Array(
                invalid
                    .iter()
                    .map(|entry| json!({"index": entry.index, "label": entry.label}))
                    .collect(),
            ),
        ));
    }
    fields
}

/// Copies each entry's trimmed label onto the segment with the same index.
pub fn merge_labels(segments: &[Segment], entries: &[LabelEntry]) -> Vec<Segment> {
    let by_index: BTreeMap<u32, &str> = entries
        .iter()
        .map(|entry| (entry.index, entry.label.trim()))
        .collect();
    segments
        .iter()
        .map(|segment| {
            let mut merged = segment.clone();
            if let Some(label) = by_index.get(&segment.index) {
                merged.label = Some((*label).to_string());
            }
            merged
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_matches_by_index_not_position() {
        let segments = vec![Segment::new(0, "a"), Segment::new(1, "b")];
        let entries = vec![
            LabelEntry::new(1, " Neutral "),
            LabelEntry::new(0, "FC Bayern München"),
        ];
        let merged = merge_labels(&segments, &entries);
        assert_eq!(merged[0].label.as_deref(), Some("FC Bayern München"));
        assert_eq!(merged[1].label.as_deref(), Some("Neutral"));
        assert_eq!(merged[1].text, "b");
    }

    #[test]
    fn invalid_label_details_are_logged_fields() {
        let rejection = BatchRejection::InvalidLabels(vec![LabelEntry::new(1, "Werder")]);
        let fields = attempt_fields(2, &rejection);
        assert_eq!(fields[1].1, json!("1 labels outside the allowed set"));
        assert_eq!(fields[2].1, json!([{"index": 1, "label": "Werder"}]));
    }
}
