use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One statement of a segmented transcript.
///
/// `index` is assigned in emission order and identifies the statement when
/// classification results are merged back. The label is persisted under the
/// `kontext` key and is absent until classification succeeds. Fields this
/// crate does not know about are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: u32,
    pub text: String,
    #[serde(rename = "kontext", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Segment {
    pub fn new(index: u32, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            label: None,
            extra: Map::new(),
        }
    }

    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub saison: Value,
    #[serde(default)]
    pub spieltag: Value,
    #[serde(default)]
    pub heim_auswaerts: Value,
    pub gegner: String,
    #[serde(default)]
    pub tabelle: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreline {
    #[serde(default)]
    pub bayern: Value,
    #[serde(default)]
    pub gegner: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Officials {
    #[serde(default)]
    pub schiedsrichter: Value,
    #[serde(default)]
    pub kommentator: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub transkript: Vec<Segment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The persisted per-match record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub meta: Meta,
    #[serde(default)]
    pub ergebnis: Scoreline,
    #[serde(default)]
    pub offizielle: Officials,
    #[serde(default)]
    pub content: Content,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn opponent(&self) -> &str {
        self.meta.gegner.trim()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.content.transkript
    }

    pub fn is_segmented(&self) -> bool {
        !self.content.transkript.is_empty()
    }

    pub fn is_fully_labeled(&self) -> bool {
        self.is_segmented() && self.content.transkript.iter().all(Segment::is_labeled)
    }

    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        self.content.transkript = segments;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> Value {
        json!({
            "meta": {
                "saison": "23/24",
                "spieltag": 3,
                "heim_auswaerts": "Heim",
                "gegner": "Werder Bremen",
                "tabelle": 1,
                "ballbesitz_bayern": 64
            },
            "ergebnis": {"bayern": 4, "gegner": 0},
            "offizielle": {"schiedsrichter": "Zwayer", "kommentator": "Réthy"},
            "content": {
                "transkript": [
                    {"index": 0, "text": "Anpfiff."},
                    {"index": 1, "text": "Tor!", "kontext": "FC Bayern München"}
                ]
            }
        })
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let doc: Document = serde_json::from_value(sample_json()).expect("parse");
        assert_eq!(doc.meta.extra.get("ballbesitz_bayern"), Some(&json!(64)));

        let back = serde_json::to_value(&doc).expect("serialize");
        assert_eq!(back, sample_json());
    }

    #[test]
    fn labels_read_from_kontext_key() {
        let doc: Document = serde_json::from_value(sample_json()).expect("parse");
        assert_eq!(doc.segments()[0].label, None);
        assert_eq!(
            doc.segments()[1].label.as_deref(),
            Some("FC Bayern München")
        );
        assert!(doc.is_segmented());
        assert!(!doc.is_fully_labeled());
    }

    #[test]
    fn unlabeled_segments_omit_kontext() {
        let value = serde_json::to_value(Segment::new(4, "Ecke.")).expect("serialize");
        assert_eq!(value, json!({"index": 4, "text": "Ecke."}));
    }
}
