use crate::document::Segment;
use crate::labels::LabelSet;
use crate::oracle::OracleRequest;
use serde_json::{json, Value};

pub fn system_instructions(labels: &LabelSet, roster: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("Du bist Experte für deutsche Fußball-Kommentare.\n\n");
    prompt.push_str(
        "Aufgabe: Bestimme für jede Aussage eines Spielberichts, welches Team sie betrifft.\n\n",
    );
    prompt.push_str("Erlaubte Antworten (exakt diese Schreibweise):\n");
    for label in labels.as_array() {
        prompt.push_str(&format!("- {label}\n"));
    }
    prompt.push_str(&format!(
        "\nPronomen und beschreibende Folgesätze übernehmen das Team der vorherigen Aussage.\n\
         Beispiele:\n\
         \x20 - 'Sané, 4. Minute, 1:0 Bayern.' -> {home}\n\
         \x20 - 'Ein perfekt herausgespielter Treffer.' -> {home}\n\n\
         Kriterien:\n\
         - Aktionen, Chancen und Tore -> das jeweilige Team\n\
         - Kommentare direkt im Anschluss -> dasselbe Team\n\
         - Beide Teams oder kein erkennbares Team -> {neutral}\n\n",
        home = labels.home(),
        neutral = labels.neutral(),
    ));
    if !roster.trim().is_empty() {
        prompt.push_str("Bekannte Spielernamen zur Zuordnung:\n");
        prompt.push_str(roster);
        prompt.push_str("\n\n");
    }
    prompt.push_str("Antwortformat:\n[{\"index\": <Nummer>, \"label\": <Antwort>}]\n\n");
    prompt.push_str("Nur das JSON-Array, keine Erklärungen oder Texte außerhalb davon.");
    prompt
}

pub fn indexed_statements(segments: &[Segment]) -> Value {
    Value::Array(
        segments
            .iter()
            .map(|segment| json!({"index": segment.index, "text": segment.text}))
            .collect(),
    )
}

pub fn classification_request(
    model: &str,
    labels: &LabelSet,
    roster: &str,
    segments: &[Segment],
) -> OracleRequest {
    OracleRequest {
        model: model.to_string(),
        system: system_instructions(labels, roster),
        user: format!(
            "Hier sind alle Aussagen aus dem Spielbericht gegen {}. \
             Analysiere sie und gib nur das JSON-Array zurück:\n\n{}",
            labels.opponent(),
            indexed_statements(segments)
        ),
    }
}
