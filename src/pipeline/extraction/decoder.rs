//! Text decoder bank: best-effort character decoding for byte buffers that
//! claim to be documents but resist the primary extractor.
//!
//! A direct UTF-8 read is accepted when it yields more than a trivial amount
//! of text. Failing that, the same bytes are reinterpreted under an ordered
//! list of encodings, and each reinterpretation is sieved through an ordered
//! list of recognition patterns. The first combination whose matches add up
//! to a readable amount of text wins.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{MIN_DIRECT_LEN, MIN_PATTERN_LEN};

/// Candidate encodings, tried in order. The list mirrors what browsers
/// accept for legacy medical PDFs: latin1 and iso-8859-1 are the same
/// single-byte decode under two labels, kept separate so the priority
/// order stays explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Utf8,
    Latin1,
    Ascii,
    Iso8859_1,
    Windows1252,
}

const CANDIDATES: [Candidate; 5] = [
    Candidate::Utf8,
    Candidate::Latin1,
    Candidate::Ascii,
    Candidate::Iso8859_1,
    Candidate::Windows1252,
];

/// Recognition patterns, tried in order per encoding: contiguous printable
/// ASCII, alphanumeric-plus-punctuation runs, then any non-control run.
static RECOGNITION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"[\x20-\x7E]{4,}",
        r"[A-Za-z0-9 .,;:()/\-]{4,}",
        r"[^\x00-\x1F\x7F]{4,}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid recognition pattern"))
    .collect()
});

/// Recover readable text from a raw byte buffer, or `None` when no
/// encoding/pattern combination clears its threshold.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    // Straight decode first: valid UTF-8 with enough content is taken as-is.
    if let Ok(direct) = std::str::from_utf8(bytes) {
        if direct.trim().len() > MIN_DIRECT_LEN {
            return Some(direct.trim().to_string());
        }
    }

    for candidate in CANDIDATES {
        let Some(decoded) = decode_with(candidate, bytes) else {
            // Encoding cannot represent these bytes; skip, never fatal.
            continue;
        };
        for pattern in RECOGNITION_PATTERNS.iter() {
            let joined = pattern
                .find_iter(&decoded)
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if joined.trim().len() > MIN_PATTERN_LEN {
                return Some(joined.trim().to_string());
            }
        }
    }

    None
}

/// Decode under one candidate encoding. Returns `None` when the bytes are
/// not representable (invalid UTF-8, non-ASCII bytes for the ascii label,
/// unmapped windows-1252 code points).
fn decode_with(candidate: Candidate, bytes: &[u8]) -> Option<String> {
    match candidate {
        Candidate::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
        Candidate::Ascii => {
            if bytes.iter().all(|b| b.is_ascii()) {
                std::str::from_utf8(bytes).ok().map(str::to_string)
            } else {
                None
            }
        }
        // Single-byte identity decode: every byte maps to U+0000..U+00FF.
        Candidate::Latin1 | Candidate::Iso8859_1 => {
            Some(bytes.iter().map(|&b| b as char).collect())
        }
        Candidate::Windows1252 => encoding_rs::WINDOWS_1252
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|cow| cow.into_owned()),
    }
}
