//! Structural scanner: recovers text by exploiting well-known PDF byte
//! conventions without a real PDF parser.
//!
//! Producers routinely leave short literals in parentheses inside content
//! streams and store metadata values next to named keys. Collecting those
//! fragments recovers useful text without decompressing or tokenizing
//! content-stream operators.

use std::sync::LazyLock;

use regex::Regex;

use super::types::MIN_DIRECT_LEN;

/// Named metadata keys followed by a parenthesized value.
static METADATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"/(?:Producer|CreationDate|ModDate|Title|Author|Subject|Keywords|Creator)\s*\(([^)]+)\)",
    )
    .expect("invalid metadata pattern")
});

/// Raw content between stream/endstream markers.
static STREAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\bstream\r?\n?(.*?)endstream").expect("invalid stream pattern")
});

/// Any parenthesized literal of at least 3 characters.
static PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]{3,})\)").expect("invalid literal pattern"));

/// Scan a buffer for structural PDF tokens and return the space-joined
/// fragments, or `None` when nothing at all was found.
pub fn scan_structure(bytes: &[u8]) -> Option<String> {
    // Lossless single-byte decode: every byte becomes one char, so the
    // regexes see the raw layout and nothing can fail to decode.
    let working: String = bytes.iter().map(|&b| b as char).collect();

    let mut fragments: Vec<String> = Vec::new();

    for cap in METADATA_RE.captures_iter(&working) {
        fragments.push(cap[1].trim().to_string());
    }

    for cap in STREAM_RE.captures_iter(&working) {
        let body = cap[1].trim();
        if body.len() > MIN_DIRECT_LEN {
            fragments.push(body.to_string());
        }
    }

    for cap in PAREN_RE.captures_iter(&working) {
        let literal = &cap[1];
        if literal.chars().any(|c| c.is_alphabetic()) {
            fragments.push(literal.trim().to_string());
        }
    }

    let joined = fragments.join(" ");
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_body_recovered() {
        let buffer = b"%PDF-1.4\nstream\nPatient history: diabetes\nendstream\n";
        let recovered = scan_structure(buffer).unwrap();
        assert!(recovered.contains("Patient history: diabetes"));
    }

    #[test]
    fn short_stream_body_skipped() {
        // Body under the 20-char threshold contributes nothing, but the
        // scan itself still succeeds if other fragments exist.
        let buffer = b"stream\ntiny\nendstream (Radiology Dept)";
        let recovered = scan_structure(buffer).unwrap();
        assert!(!recovered.contains("tiny"));
        assert!(recovered.contains("Radiology Dept"));
    }

    #[test]
    fn metadata_values_recovered() {
        let buffer = b"/Title (Discharge Summary) /Author (Dr. Chen) /Producer (ScanStation 4)";
        let recovered = scan_structure(buffer).unwrap();
        assert!(recovered.contains("Discharge Summary"));
        assert!(recovered.contains("Dr. Chen"));
        assert!(recovered.contains("ScanStation 4"));
    }

    #[test]
    fn parenthesized_literals_need_a_letter() {
        // Numeric-only literals are coordinate noise, not text.
        let buffer = b"(123 456) (0.75) (chest x-ray)";
        let recovered = scan_structure(buffer).unwrap();
        assert!(recovered.contains("chest x-ray"));
        assert!(!recovered.contains("123 456"));
        assert!(!recovered.contains("0.75"));
    }

    #[test]
    fn nothing_structural_yields_none() {
        assert!(scan_structure(b"\x00\x01\x02\x03 no markers here").is_none());
        assert!(scan_structure(b"").is_none());
    }

    #[test]
    fn fragments_joined_in_order_found() {
        let buffer =
            b"/Title (MRI Report)\nstream\nFindings: small lesion left hemisphere\nendstream\n(reviewed)";
        let recovered = scan_structure(buffer).unwrap();
        let title = recovered.find("MRI Report").unwrap();
        let findings = recovered.find("Findings").unwrap();
        let reviewed = recovered.find("reviewed").unwrap();
        assert!(title < findings && findings < reviewed);
    }
}
