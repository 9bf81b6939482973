use super::CorpusError;
use crate::classifier::ClassificationError;
use crate::document::{read_document, write_document, Document, Segment};
use crate::segmenter::SegmentationError;
use crate::shared::EventLog;
use serde_json::json;
use std::path::{Path, PathBuf};

pub type SegmentFn<'a> = dyn FnMut(&str) -> Result<Vec<Segment>, SegmentationError> + 'a;
pub type ClassifyFn<'a> =
    dyn FnMut(&[Segment], &str) -> Result<Vec<Segment>, ClassificationError> + 'a;

#[derive(Debug, Clone)]
pub enum JobInput {
    /// A document built from a spreadsheet row, still carrying its raw
    /// transcript.
    Row {
        document: Box<Document>,
        transcript: String,
    },
    /// A previously persisted document.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct DocumentJob {
    /// Output file name, unique per document.
    pub name: String,
    pub input: JobInput,
}

#[derive(Debug, Clone)]
pub struct WalkerConfig {
    pub output_dir: PathBuf,
    /// Where segmented-but-unlabeled documents are kept between stages. A row
    /// whose segmented document already exists here is not segmented again.
    pub segmented_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDocument {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub written: Vec<String>,
    pub skipped_existing: Vec<String>,
    pub failed: Vec<FailedDocument>,
}

impl WalkReport {
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "written={} skipped_existing={} failed={}",
            self.written.len(),
            self.skipped_existing.len(),
            self.failed.len()
        )];
        for failed in &self.failed {
            lines.push(format!("failed {}: {}", failed.name, failed.reason));
        }
        lines
    }
}

enum Outcome {
    Written,
    SkippedExisting,
    Failed(String),
}

/// Drives documents one at a time through segmentation, classification and
/// persistence.
///
/// A document that fails segmentation or classification is recorded in the
/// report and the walk moves on. A failed write aborts the walk.
#[derive(Debug, Clone)]
pub struct CorpusWalker {
    config: WalkerConfig,
    log: EventLog,
}

impl CorpusWalker {
    pub fn new(config: WalkerConfig) -> Self {
        Self {
            config,
            log: EventLog::disabled(),
        }
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.config.output_dir.join(name)
    }

    /// Segments (where needed), classifies and writes every job.
    pub fn run<S, C>(
        &self,
        jobs: Vec<DocumentJob>,
        mut segment: S,
        mut classify: C,
    ) -> Result<WalkReport, CorpusError>
    where
        S: FnMut(&str) -> Result<Vec<Segment>, SegmentationError>,
        C: FnMut(&[Segment], &str) -> Result<Vec<Segment>, ClassificationError>,
    {
        let classify: &mut ClassifyFn<'_> = &mut classify;
        self.walk(jobs, &mut segment, Some(classify))
    }

    /// Segments and writes every job without classifying.
    pub fn run_segmentation<S>(
        &self,
        jobs: Vec<DocumentJob>,
        mut segment: S,
    ) -> Result<WalkReport, CorpusError>
    where
        S: FnMut(&str) -> Result<Vec<Segment>, SegmentationError>,
    {
        self.walk(jobs, &mut segment, None)
    }

    fn walk(
        &self,
        jobs: Vec<DocumentJob>,
        segment: &mut SegmentFn<'_>,
        mut classify: Option<&mut ClassifyFn<'_>>,
    ) -> Result<WalkReport, CorpusError> {
        let total = jobs.len();
        let mut report = WalkReport::default();

        for (position, job) in jobs.into_iter().enumerate() {
            let name = job.name.clone();
            match self.process(job, position + 1, total, segment, classify.as_deref_mut())? {
                Outcome::Written => report.written.push(name),
                Outcome::SkippedExisting => report.skipped_existing.push(name),
                Outcome::Failed(reason) => {
                    self.log.error(
                        "corpus.document_failed",
                        &[("document", json!(name)), ("reason", json!(reason))],
                    );
                    report.failed.push(FailedDocument { name, reason });
                }
            }
        }

        self.log.info(
            "corpus.finished",
            &[
                ("written", json!(report.written.len())),
                ("skipped_existing", json!(report.skipped_existing.len())),
                ("failed", json!(report.failed.len())),
            ],
        );
        Ok(report)
    }

    fn process(
        &self,
        job: DocumentJob,
        position: usize,
        total: usize,
        segment: &mut SegmentFn<'_>,
        classify: Option<&mut ClassifyFn<'_>>,
    ) -> Result<Outcome, CorpusError> {
        let output_path = self.output_path(&job.name);
        if output_path.exists() {
            self.log.info(
                "corpus.document_skipped_existing",
                &[
                    ("document", json!(job.name)),
                    ("position", json!(position)),
                    ("total", json!(total)),
                ],
            );
            return Ok(Outcome::SkippedExisting);
        }

        let (mut document, transcript) = match self.load(&job) {
            Ok(loaded) => loaded,
            Err(reason) => return Ok(Outcome::Failed(reason)),
        };
        self.log.info(
            "corpus.document_started",
            &[
                ("document", json!(job.name)),
                ("position", json!(position)),
                ("total", json!(total)),
                ("opponent", json!(document.opponent())),
                ("statements", json!(document.segments().len())),
            ],
        );

        if !document.is_segmented() {
            let Some(transcript) = transcript else {
                return Ok(Outcome::Failed(
                    "document has no segments and no transcript".to_string(),
                ));
            };
            match segment(&transcript) {
                Ok(segments) => document.set_segments(segments),
                Err(err) => return Ok(Outcome::Failed(err.to_string())),
            }
            if let Some(segmented_dir) = &self.config.segmented_dir {
                if segmented_dir != &self.config.output_dir {
                    self.persist(&segmented_dir.join(&job.name), &job.name, &document)?;
                }
            }
        }

        if let Some(classify) = classify {
            if !document.is_fully_labeled() {
                let opponent = document.opponent().to_string();
                match classify(document.segments(), &opponent) {
                    Ok(labeled) => document.set_segments(labeled),
                    Err(err) => return Ok(Outcome::Failed(err.to_string())),
                }
            }
        }

        self.persist(&output_path, &job.name, &document)?;
        Ok(Outcome::Written)
    }

    /// Resolves a job to its document plus, for rows, the raw transcript.
    /// A row whose segmented document was already persisted resumes from it.
    fn load(&self, job: &DocumentJob) -> Result<(Document, Option<String>), String> {
        match &job.input {
            JobInput::File(path) => read_document(path)
                .map(|document| (document, None))
                .map_err(|err| err.to_string()),
            JobInput::Row {
                document,
                transcript,
            } => {
                if let Some(segmented_dir) = &self.config.segmented_dir {
                    let existing = segmented_dir.join(&job.name);
                    if existing.exists() {
                        let resumed = read_document(&existing).map_err(|err| err.to_string())?;
                        if resumed.is_segmented() {
                            return Ok((resumed, Some(transcript.clone())));
                        }
                    }
                }
                Ok(((**document).clone(), Some(transcript.clone())))
            }
        }
    }

    fn persist(&self, path: &Path, name: &str, document: &Document) -> Result<(), CorpusError> {
        write_document(path, document).map_err(|source| CorpusError::Persist {
            document: name.to_string(),
            source,
        })?;
        self.log.info(
            "corpus.document_written",
            &[
                ("document", json!(name)),
                ("path", json!(path.display().to_string())),
            ],
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_failures_after_counts() {
        let report = WalkReport {
            written: vec!["a.json".to_string()],
            skipped_existing: Vec::new(),
            failed: vec![FailedDocument {
                name: "b.json".to_string(),
                reason: "transcript is empty".to_string(),
            }],
        };
        assert_eq!(
            report.summary_lines(),
            vec![
                "written=1 skipped_existing=0 failed=1".to_string(),
                "failed b.json: transcript is empty".to_string(),
            ]
        );
    }
}
