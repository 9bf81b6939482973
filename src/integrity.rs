use sha2::{Digest, Sha256};
use std::fmt;

const STRIPPED_CHARS: [char; 4] = ['"', '[', ']', ','];

/// Reduces text to its comparison form: quoting and list punctuation
/// (`"`, `[`, `]`, `,`) and every whitespace character are removed.
///
/// Only used to decide content equality; never stored or displayed.
pub fn canonicalize(text: &str) -> String {
    text.chars()
        .filter(|c| !is_space(*c) && !STRIPPED_CHARS.contains(c))
        .collect()
}

/// Unicode whitespace plus the ASCII information separators U+001C..U+001F,
/// which regex `\s` also matches.
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// SHA-256 digest of a string's UTF-8 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let mut digest = [0_u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Self(digest)
    }

    pub fn to_hex(&self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut out = String::with_capacity(self.0.len() * 2);
        for byte in self.0 {
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0x0f) as usize] as char);
        }
        out
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

pub fn fingerprint(text: &str) -> Fingerprint {
    Fingerprint::of(text)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityMismatch {
    #[error("content lost: expected {expected} canonical characters, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("content altered: fingerprint {actual} differs from {expected}")]
    Fingerprint {
        expected: Fingerprint,
        actual: Fingerprint,
    },
}

/// Compares two already-canonicalized strings: character count first, then
/// fingerprint. Returns the shared fingerprint on success.
pub fn compare_canonical(expected: &str, actual: &str) -> Result<Fingerprint, IntegrityMismatch> {
    let expected_len = expected.chars().count();
    let actual_len = actual.chars().count();
    if expected_len != actual_len {
        return Err(IntegrityMismatch::Length {
            expected: expected_len,
            actual: actual_len,
        });
    }

    let expected_fp = Fingerprint::of(expected);
    let actual_fp = Fingerprint::of(actual);
    if expected_fp != actual_fp {
        return Err(IntegrityMismatch::Fingerprint {
            expected: expected_fp,
            actual: actual_fp,
        });
    }
    Ok(expected_fp)
}

/// Checks that `pieces`, concatenated in order without separator, carry
/// exactly the content of `original`.
pub fn verify_round_trip<S: AsRef<str>>(
    original: &str,
    pieces: &[S],
) -> Result<Fingerprint, IntegrityMismatch> {
    let joined: String = pieces.iter().map(AsRef::as_ref).collect();
    compare_canonical(&canonicalize(original), &canonicalize(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_drops_quotes_brackets_commas_and_whitespace() {
        assert_eq!(
            canonicalize("  \"Müller\", [links]\n\tvorbei. "),
            "Müllerlinksvorbei."
        );
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize(" \n\t "), "");
    }

    #[test]
    fn canonicalize_drops_information_separators_and_next_line() {
        assert_eq!(canonicalize("a\u{1c}b\u{85}c\u{1f}d\u{a0}e"), "abcde");
        assert_eq!(canonicalize("\u{1d}\u{1e}"), "");
    }

    #[test]
    fn canonicalize_keeps_other_punctuation() {
        assert_eq!(canonicalize("1:0 - Tor!"), "1:0-Tor!");
    }

    #[test]
    fn fingerprint_is_deterministic_sha256_hex() {
        let fp = fingerprint("");
        assert_eq!(
            fp.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fingerprint("abc"), fingerprint("abc"));
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
    }

    #[test]
    fn round_trip_accepts_reformatted_split() {
        let transcript = "Sané traf zum 1:0 für Bayern. Ein sehenswerter Abschluss.";
        let pieces = ["Sané traf zum 1:0 für Bayern.", " Ein sehenswerter Abschluss."];
        assert!(verify_round_trip(transcript, &pieces).is_ok());
    }

    #[test]
    fn round_trip_reports_length_before_fingerprint() {
        let err = verify_round_trip("Ein Tor.", &["Ein To."]).expect_err("shorter");
        assert_eq!(
            err,
            IntegrityMismatch::Length {
                expected: 7,
                actual: 6
            }
        );

        let err = verify_round_trip("Ein Tor.", &["Ein Tar."]).expect_err("altered");
        assert!(matches!(err, IntegrityMismatch::Fingerprint { .. }));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let err = compare_canonical("ä", "ab").expect_err("different lengths");
        assert_eq!(
            err,
            IntegrityMismatch::Length {
                expected: 1,
                actual: 2
            }
        );
    }
}
