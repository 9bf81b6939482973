use super::naming::display_cell;
use super::{Content, Document, DocumentError, Meta, Officials, Scoreline, Segment};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// One spreadsheet row, as exported to a JSON array of records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchRow {
    #[serde(rename = "Saison", default)]
    pub season: Value,
    #[serde(rename = "Spieltag", default)]
    pub matchday: Value,
    #[serde(rename = "Heim/Auswärts", default)]
    pub venue: Value,
    #[serde(rename = "Gegner", default)]
    pub opponent: Value,
    #[serde(rename = "Tabelle", default)]
    pub table_position: Value,
    #[serde(rename = "Tore Bayern", default)]
    pub home_goals: Value,
    #[serde(rename = "Tore Gegner", default)]
    pub opponent_goals: Value,
    #[serde(rename = "Schiedsrichter", default)]
    pub referee: Value,
    #[serde(rename = "Kommentator", default)]
    pub commentator: Value,
    #[serde(rename = "Transkript", default)]
    pub transcript: Value,
}

impl MatchRow {
    /// The trimmed transcript, or `None` when the cell is empty.
    pub fn transcript(&self) -> Option<&str> {
        self.transcript
            .as_str()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn opponent_name(&self) -> String {
        display_cell(&self.opponent)
    }
}

pub fn load_rows(path: &Path) -> Result<Vec<MatchRow>, DocumentError> {
    let raw = fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DocumentError::Parse {
        path: path.display().to_string(),
        source,
    })
}

impl Document {
    pub fn from_row(row: &MatchRow, segments: Vec<Segment>) -> Self {
        Self {
            meta: Meta {
                saison: row.season.clone(),
                spieltag: row.matchday.clone(),
                heim_auswaerts: row.venue.clone(),
                gegner: row.opponent_name(),
                tabelle: row.table_position.clone(),
                extra: Map::new(),
            },
            ergebnis: Scoreline {
                bayern: row.home_goals.clone(),
                gegner: row.opponent_goals.clone(),
                extra: Map::new(),
            },
            offizielle: Officials {
                schiedsrichter: row.referee.clone(),
                kommentator: row.commentator.clone(),
                extra: Map::new(),
            },
            content: Content {
                transkript: segments,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }
}
