use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The three permissible labels for one document: the home entity, that
/// document's opponent, and the neutral marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    home: String,
    opponent: String,
    neutral: String,
}

impl LabelSet {
    pub fn new(
        home: impl Into<String>,
        opponent: impl Into<String>,
        neutral: impl Into<String>,
    ) -> Self {
        Self {
            home: home.into().trim().to_string(),
            opponent: opponent.into().trim().to_string(),
            neutral: neutral.into().trim().to_string(),
        }
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn opponent(&self) -> &str {
        &self.opponent
    }

    pub fn neutral(&self) -> &str {
        &self.neutral
    }

    pub fn as_array(&self) -> [&str; 3] {
        [&self.home, &self.opponent, &self.neutral]
    }

    /// Exact membership after trimming; prefixes and substrings do not count.
    pub fn contains(&self, label: &str) -> bool {
        let label = label.trim();
        self.as_array().contains(&label)
    }
}

/// One `(index, label)` pair of a classification reply. The label may arrive
/// under `label` or `kontext`; non-string labels are kept as their JSON text
/// so they fail validation instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub index: u32,
    #[serde(alias = "kontext", default, deserialize_with = "lenient_label")]
    pub label: String,
}

impl LabelEntry {
    pub fn new(index: u32, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }
}

fn lenient_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub invalid: Vec<LabelEntry>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Collects every entry whose label is not a member of `allowed`.
pub fn validate(entries: &[LabelEntry], allowed: &LabelSet) -> ValidationReport {
    ValidationReport {
        invalid: entries
            .iter()
            .filter(|entry| !allowed.contains(&entry.label))
            .cloned()
            .collect(),
    }
}

/// Index-domain mismatch between a reply and the segments it classifies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageGap {
    pub missing: Vec<u32>,
    pub duplicated: Vec<u32>,
    pub unexpected: Vec<u32>,
}

impl fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing={:?}", self.missing));
        }
        if !self.duplicated.is_empty() {
            parts.push(format!("duplicated={:?}", self.duplicated));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("unexpected={:?}", self.unexpected));
        }
        f.write_str(&parts.join(" "))
    }
}

/// Requires the reply to label every expected index exactly once and nothing
/// else.
pub fn check_coverage(entries: &[LabelEntry], expected: &[u32]) -> Result<(), CoverageGap> {
    let expected: BTreeSet<u32> = expected.iter().copied().collect();
    let mut seen: BTreeMap<u32, usize> = BTreeMap::new();
    for entry in entries {
        *seen.entry(entry.index).or_default() += 1;
    }

    let gap = CoverageGap {
        missing: expected
            .iter()
            .filter(|index| !seen.contains_key(index))
            .copied()
            .collect(),
        duplicated: seen
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(index, _)| *index)
            .collect(),
        unexpected: seen
            .keys()
            .filter(|index| !expected.contains(index))
            .copied()
            .collect(),
    };

    if gap == CoverageGap::default() {
        Ok(())
    } else {
        Err(gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelSet {
        LabelSet::new("FC Bayern München", "Werder Bremen", "Neutral")
    }

    #[test]
    fn membership_is_exact_after_trim() {
        let set = labels();
        assert!(set.contains("Werder Bremen"));
        assert!(set.contains("  Neutral \n"));
        assert!(!set.contains("Werder"));
        assert!(!set.contains("FC Bayern"));
        assert!(!set.contains("neutral"));
        assert!(!set.contains(""));
    }

    #[test]
    fn validate_reports_each_invalid_entry_with_its_index() {
        let entries = vec![
            LabelEntry::new(0, "FC Bayern München"),
            LabelEntry::new(1, "Werder"),
            LabelEntry::new(2, "Neutral"),
            LabelEntry::new(3, "Bayern"),
        ];
        let report = validate(&entries, &labels());
        assert!(!report.is_valid());
        assert_eq!(
            report.invalid,
            vec![LabelEntry::new(1, "Werder"), LabelEntry::new(3, "Bayern")]
        );
    }

    #[test]
    fn entries_accept_kontext_key_and_non_string_labels() {
        let entries: Vec<LabelEntry> = serde_json::from_str(
            r#"[{"index": 0, "kontext": "Neutral"}, {"index": 1, "label": 7}, {"index": 2}]"#,
        )
        .expect("parse");
        assert_eq!(entries[0].label, "Neutral");
        assert_eq!(entries[1].label, "7");
        assert_eq!(entries[2].label, "");
        assert_eq!(validate(&entries, &labels()).invalid.len(), 2);
    }

    #[test]
    fn coverage_detects_missing_duplicate_and_unknown_indices() {
        let entries = vec![
            LabelEntry::new(0, "Neutral"),
            LabelEntry::new(0, "Neutral"),
            LabelEntry::new(5, "Neutral"),
        ];
        let gap = check_coverage(&entries, &[0, 1]).expect_err("gap");
        assert_eq!(gap.missing, vec![1]);
        assert_eq!(gap.duplicated, vec![0]);
        assert_eq!(gap.unexpected, vec![5]);
        assert_eq!(gap.to_string(), "missing=[1] duplicated=[0] unexpected=[5]");

        let complete = vec![LabelEntry::new(1, "Neutral"), LabelEntry::new(0, "Neutral")];
        assert!(check_coverage(&complete, &[0, 1]).is_ok());
    }
}
