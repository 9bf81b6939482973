use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("reply contains no json array")]
    NoArray,
    #[error("reply is not the expected json array: {0}")]
    InvalidJson(String),
}

pub fn strip_code_fences(reply: &str) -> String {
    reply
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Returns the slice from the first `[` through the last `]`, if any.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses an oracle reply as a JSON array in two stages: the whole reply
/// (minus markdown fences) first, then the outermost bracket pair when the
/// model wrapped the array in prose.
pub fn parse_json_array<T: DeserializeOwned>(reply: &str) -> Result<Vec<T>, FormatError> {
    let cleaned = strip_code_fences(reply);
    if let Ok(items) = serde_json::from_str::<Vec<T>>(&cleaned) {
        return Ok(items);
    }

    let candidate = extract_json_array(&cleaned).ok_or(FormatError::NoArray)?;
    serde_json::from_str::<Vec<T>>(candidate)
        .map_err(|err| FormatError::InvalidJson(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let items: Vec<String> = parse_json_array(r#"["a", "b"]"#).expect("parse");
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn strips_markdown_fences() {
        let reply = "```json\n[\"eins\"]\n```";
        let items: Vec<String> = parse_json_array(reply).expect("parse");
        assert_eq!(items, vec!["eins"]);
    }

    #[test]
    fn falls_back_to_outermost_brackets() {
        let reply = "Hier ist die Liste:\n[\"Tor [VAR]\", \"Abpfiff\"]\nViel Erfolg!";
        let items: Vec<String> = parse_json_array(reply).expect("parse");
        assert_eq!(items, vec!["Tor [VAR]", "Abpfiff"]);
    }

    #[test]
    fn reply_without_brackets_is_no_array() {
        let err = parse_json_array::<String>("keine Liste").expect_err("no array");
        assert_eq!(err, FormatError::NoArray);

        let err = parse_json_array::<String>("] verkehrt [").expect_err("reversed");
        assert_eq!(err, FormatError::NoArray);
    }

    #[test]
    fn wrong_element_type_is_invalid_json() {
        let err = parse_json_array::<String>("[1, 2]").expect_err("numbers");
        assert!(matches!(err, FormatError::InvalidJson(_)));
    }
}
