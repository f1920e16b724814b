/// Sanitize recovered text before field mapping.
/// Strips control characters, trims lines, collapses blank lines,
/// preserves the punctuation clinical documents actually use.
pub fn sanitize_recovered_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(
                    c,
                    '.' | ','
                        | ';'
                        | ':'
                        | '-'
                        | '/'
                        | '('
                        | ')'
                        | '['
                        | ']'
                        | '+'
                        | '='
                        | '%'
                        | '#'
                        | '@'
                        | '&'
                        | '\''
                        | '"'
                        | '!'
                        | '?'
                        | '<'
                        | '>'
                        | '*'
                        | '_'
                        | '°'
                        | 'µ'
                )
        })
        .collect::<String>()
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        let raw = "Patient: John\x00Doe";
        let clean = sanitize_recovered_text(raw);
        assert!(!clean.contains('\x00'));
        assert!(clean.contains("John"));
    }

    #[test]
    fn strips_control_characters() {
        let raw = "Dose: 500mg\x01\x02\x03\nDOB: 1985-06-15";
        let clean = sanitize_recovered_text(raw);
        assert!(!clean.contains('\x01'));
        assert!(clean.contains("500mg"));
        assert!(clean.contains("1985-06-15"));
    }

    #[test]
    fn preserves_clinical_punctuation() {
        let raw = "Temp: 37.5°C, BP: 120/80 mmHg (elevated)";
        let clean = sanitize_recovered_text(raw);
        assert!(clean.contains("37.5°C"));
        assert!(clean.contains("120/80"));
        assert!(clean.contains("(elevated)"));
    }

    #[test]
    fn collapses_blank_lines() {
        let raw = "Line one\n\n\n\nLine two\n\n\nLine three";
        assert_eq!(sanitize_recovered_text(raw), "Line one\nLine two\nLine three");
    }

    #[test]
    fn trims_whitespace_per_line() {
        let raw = "  leading spaces  \n  trailing too  ";
        assert_eq!(sanitize_recovered_text(raw), "leading spaces\ntrailing too");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(sanitize_recovered_text(""), "");
    }

    #[test]
    fn only_control_chars_returns_empty() {
        assert_eq!(sanitize_recovered_text("\x00\x01\x02"), "");
    }
}
