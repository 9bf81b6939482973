use crate::oracle::OracleRequest;

pub const SEGMENTATION_RULES: &str = "\
Du zerlegst einen deutschen Fußball-Kommentartext in inhaltlich zusammenhängende Aussagen \
für eine spätere Sentimentanalyse.

Regeln:
- Eine Aussage umfasst 1 bis 3 Sätze; mehrere Sätze nur, wenn sie direkt zusammengehören \
(z.B. Aktion und Auflösung).
- Beginne eine neue Aussage bei einem neuen Fokus (anderes Team, anderer Spieler, \
Schiedsrichter, Publikum), bei einer neuen Aktion, bei einer neuen Bewertung und bei einem \
historischen Einschub.
- Trenne nicht, wenn ein Satz die direkte Auflösung oder Klarstellung der vorherigen Aktion ist.
- Satzzeichen, Zeilenumbrüche oder Ordinalzahlen allein sind kein Grund für einen Schnitt.
- Entferne, ergänze oder formuliere nichts um. Die Aussagen ergeben hintereinander gelesen \
exakt den Eingabetext.

Format: Antworte ausschließlich mit einem gültigen JSON-Array von Strings, ohne weiteren Text.";

pub fn segmentation_request(model: &str, transcript: &str) -> OracleRequest {
    OracleRequest {
        model: model.to_string(),
        system: SEGMENTATION_RULES.to_string(),
        user: format!("Text:\n\"\"\"{transcript}\"\"\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_embeds_raw_transcript_verbatim() {
        let request = segmentation_request("gpt-4o", "Anpfiff. 1:0!");
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.user, "Text:\n\"\"\"Anpfiff. 1:0!\"\"\"");
        assert!(request.system.contains("JSON-Array von Strings"));
    }
}
