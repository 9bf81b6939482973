use super::Meta;
use serde_json::Value;

/// Renders a spreadsheet cell the way it should appear in names and labels.
/// Whole-number floats lose their `.0`; `null` renders empty.
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(float) = number.as_f64().filter(|f| f.fract() == 0.0) {
                format!("{float:.0}")
            } else {
                number.to_string()
            }
        }
        other => other.to_string(),
    }
}

/// `{season}_S{matchday}_{opponent}.json`, e.g. `23-24_S3_werder_bremen.json`.
pub fn document_file_name(meta: &Meta) -> String {
    let season = display_cell(&meta.saison).replace('/', "-");
    let matchday = display_cell(&meta.spieltag);
    let opponent = meta.gegner.trim().to_lowercase().replace(' ', "_");
    format!("{season}_S{matchday}_{opponent}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn meta(saison: Value, spieltag: Value, gegner: &str) -> Meta {
        Meta {
            saison,
            spieltag,
            heim_auswaerts: Value::Null,
            gegner: gegner.to_string(),
            tabelle: Value::Null,
            extra: Map::new(),
        }
    }

    #[test]
    fn file_name_follows_season_matchday_opponent() {
        let meta = meta(json!("23/24"), json!(3), "Werder Bremen");
        assert_eq!(document_file_name(&meta), "23-24_S3_werder_bremen.json");
    }

    #[test]
    fn float_matchday_renders_as_integer() {
        let meta = meta(json!("24/25"), json!(17.0), "1. FC Union Berlin");
        assert_eq!(
            document_file_name(&meta),
            "24-25_S17_1._fc_union_berlin.json"
        );
    }

    #[test]
    fn display_cell_handles_scalars() {
        assert_eq!(display_cell(&json!(null)), "");
        assert_eq!(display_cell(&json!(" Heim ")), "Heim");
        assert_eq!(display_cell(&json!(2.5)), "2.5");
        assert_eq!(display_cell(&json!(true)), "true");
    }
}
