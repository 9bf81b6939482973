use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Append-only JSON-lines event sink.
///
/// Every event is written as one object carrying `timestamp`, `level`,
/// `event` and the caller's fields. With echo enabled the same event is also
/// mirrored to stderr as a single human-readable line. Write failures are
/// swallowed: logging never fails a pipeline stage.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    path: Option<PathBuf>,
    echo: bool,
}

impl EventLog {
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            echo: false,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&self, event: &str, fields: &[(&str, Value)]) {
        self.record(Level::Info, event, fields);
    }

    pub fn warn(&self, event: &str, fields: &[(&str, Value)]) {
        self.record(Level::Warn, event, fields);
    }

    pub fn error(&self, event: &str, fields: &[(&str, Value)]) {
        self.record(Level::Error, event, fields);
    }

    pub fn record(&self, level: Level, event: &str, fields: &[(&str, Value)]) {
        if self.echo {
            eprintln!("{}", render_echo_line(level, event, fields));
        }
        let Some(path) = &self.path else {
            return;
        };
        let _ = append_event_line(path, level, event, fields);
    }
}

fn append_event_line(
    path: &Path,
    level: Level,
    event: &str,
    fields: &[(&str, Value)],
) -> std::io::Result<()> {
    let mut payload = Map::new();
    payload.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    payload.insert("level".to_string(), Value::String(level.as_str().to_string()));
    payload.insert("event".to_string(), Value::String(event.to_string()));
    for (key, value) in fields {
        payload.insert((*key).to_string(), value.clone());
    }

    let line = serde_json::to_string(&payload)
        .map_err(|source| std::io::Error::other(source.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{line}")
}

fn render_echo_line(level: Level, event: &str, fields: &[(&str, Value)]) -> String {
    let mut line = format!("[{}] {event}", level.as_str());
    for (key, value) in fields {
        match value {
            Value::String(text) => line.push_str(&format!(" {key}={text}")),
            other => line.push_str(&format!(" {key}={other}")),
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn events_are_appended_as_json_lines() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("logs/pipeline.log");
        let log = EventLog::to_file(&path);

        log.info("corpus.document_started", &[("document", json!("a.json"))]);
        log.warn("segment.attempt_failed", &[("attempt", json!(2))]);

        let raw = fs::read_to_string(&path).expect("read log");
        let lines: Vec<Value> = raw
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "corpus.document_started");
        assert_eq!(lines[0]["document"], "a.json");
        assert_eq!(lines[1]["level"], "warn");
        assert_eq!(lines[1]["attempt"], 2);
        assert!(lines[1]["timestamp"].as_str().is_some());
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let log = EventLog::disabled();
        log.error("anything", &[]);
        assert!(log.path().is_none());
    }

    #[test]
    fn echo_line_renders_strings_without_quotes() {
        let line = render_echo_line(
            Level::Warn,
            "classify.attempt_failed",
            &[("attempt", json!(3)), ("reason", json!("bad label"))],
        );
        assert_eq!(line, "[warn] classify.attempt_failed attempt=3 reason=bad label");
    }
}
