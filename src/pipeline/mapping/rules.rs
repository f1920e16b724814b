//! Label-anchored extraction rules, kept as configuration data so the
//! mapping stays declarative and testable per field.

use std::sync::LazyLock;

use regex::Regex;

use super::fields::FieldKey;

/// One rule: a field, its candidate patterns in priority order, and which
/// capture group holds the value.
pub struct FieldRule {
    pub field: FieldKey,
    pub patterns: &'static [&'static str],
    pub group: usize,
}

/// The rule table. First matching pattern per field wins; fields without a
/// match fall back to their placeholder. `ReportContent` has no rule — it is
/// filled by the orchestrator (page summary) or left at its placeholder.
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: FieldKey::PatientName,
        patterns: &[
            r"(?m)Patient Name\s*:\s*([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
            r"(?m)Patient\s*:\s*([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
            r"(?m)Name\s*:\s*([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::Age,
        patterns: &[
            r"(?i)Age\s*:\s*(\d{1,3})",
            r"(?i)(\d{1,3})\s*years?\s*old",
            r"(?i)Age\s+(\d{1,3})",
            r"(?i)(\d{1,3})\s*Y/O",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::Sex,
        patterns: &[
            r"(?i)Sex\s*:\s*(Male|Female|M|F)\b",
            r"(?i)Gender\s*:\s*(Male|Female|M|F)\b",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::Dob,
        patterns: &[
            r"(?i)DOB\s*:\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
            r"(?i)Date of Birth\s*:\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
            r"(?i)Birth Date\s*:\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::ContactNumber,
        patterns: &[
            r"(?i)Phone\s*:\s*(\+?[\d\-\(\)\s]{7,})",
            r"(?i)Contact\s*:\s*(\+?[\d\-\(\)\s]{7,})",
            r"(?i)Mobile\s*:\s*(\+?[\d\-\(\)\s]{7,})",
            r"(?i)Number\s*:\s*(\+?[\d\-\(\)\s]{7,})",
            r"(\d{3}[-.\s]?\d{3}[-.\s]?\d{4})",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::PatientId,
        patterns: &[
            r"(?i)Patient ID\s*:\s*([A-Za-z0-9\-_]+)",
            r"(?i)Patient Number\s*:\s*([A-Za-z0-9\-_]+)",
            r"(?m)\bID\s*:\s*([A-Za-z0-9\-_]+)",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::NationalHealthId,
        patterns: &[
            r"(?i)National Health ID\s*:\s*([A-Za-z0-9\-_]{6,})",
            r"(?i)ABHA(?:\s+ID)?\s*:\s*([A-Za-z0-9\-_]{6,})",
            r"(?i)Health ID\s*:\s*([A-Za-z0-9\-_]{6,})",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::PreviousCondition,
        patterns: &[
            r"(?im)^.*Previous Conditions?\s*:?\s*(.+)$",
            r"(?im)^.*Past Medical History\s*:?\s*(.+)$",
            r"(?im)^.*Medical History\s*:?\s*(.+)$",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::CurrentMedication,
        patterns: &[
            r"(?im)^.*Current Medications?\s*:?\s*(.+)$",
            r"(?im)^.*Medications?\s*:\s*(.+)$",
            r"(?im)^.*Current Treatment\s*:?\s*(.+)$",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::FamilyHistory,
        patterns: &[
            r"(?im)^.*Family History\s*:?\s*(.+)$",
            r"(?im)^.*Hereditary\s*:?\s*(.+)$",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::KnownAllergy,
        patterns: &[
            r"(?im)^.*Known Allerg(?:y|ies)\s*:?\s*(.+)$",
            r"(?im)^.*Allerg(?:y|ies)\s*:\s*(.+)$",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::ChiefComplaint,
        patterns: &[
            r"(?im)^.*Chief Complaint\s*:?\s*(.+)$",
            r"(?im)^.*Main Symptom\s*:?\s*(.+)$",
            r"(?im)^.*Primary Concern\s*:?\s*(.+)$",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::ReferringDoctor,
        patterns: &[
            r"(?im)^.*Referring (?:Doctor|Physician)\s*:?\s*(.+)$",
            r"(?im)^.*Referred by\s*:?\s*(.+)$",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::NeurologicalSymptom,
        patterns: &[
            r"(?im)^.*Neurologic(?:al)? Symptoms?\s*:?\s*(.+)$",
            r"(?im)^.*Neurologic(?:al)? Findings?\s*:?\s*(.+)$",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::TreatmentHistory,
        patterns: &[
            r"(?im)^.*Treatment History\s*:?\s*(.+)$",
            r"(?im)^.*(?:Prior|Previous) (?:Treatment|Therapy)\s*:?\s*(.+)$",
        ],
        group: 1,
    },
    FieldRule {
        field: FieldKey::SymptomProgression,
        patterns: &[
            r"(?im)^.*Symptom Progression\s*:?\s*(.+)$",
            r"(?im)^.*Progression\s*:\s*(.+)$",
        ],
        group: 1,
    },
];

/// A rule with its patterns compiled once.
pub struct CompiledRule {
    pub field: FieldKey,
    pub regexes: Vec<Regex>,
    pub group: usize,
}

pub static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    FIELD_RULES
        .iter()
        .map(|rule| CompiledRule {
            field: rule.field,
            regexes: rule
                .patterns
                .iter()
                .map(|p| Regex::new(p).expect("invalid field rule pattern"))
                .collect(),
            group: rule.group,
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rule_patterns_compile() {
        assert!(!COMPILED_RULES.is_empty());
        for rule in COMPILED_RULES.iter() {
            assert!(!rule.regexes.is_empty());
            assert_eq!(rule.group, 1);
        }
    }

    #[test]
    fn one_rule_per_field_except_report_content() {
        let mut seen = Vec::new();
        for rule in FIELD_RULES {
            assert!(!seen.contains(&rule.field), "duplicate rule for {:?}", rule.field);
            seen.push(rule.field);
        }
        assert_eq!(seen.len(), 16);
        assert!(!seen.contains(&FieldKey::ReportContent));
    }

    #[test]
    fn age_rule_matches_years_old_phrasing() {
        let rule = COMPILED_RULES.iter().find(|r| r.field == FieldKey::Age).unwrap();
        let caps = rule.regexes[1].captures("patient is 57 years old").unwrap();
        assert_eq!(&caps[1], "57");
    }

    #[test]
    fn phone_rule_matches_bare_number() {
        let rule = COMPILED_RULES
            .iter()
            .find(|r| r.field == FieldKey::ContactNumber)
            .unwrap();
        let caps = rule.regexes.last().unwrap().captures("call 555-867-5309 today").unwrap();
        assert_eq!(&caps[1], "555-867-5309");
    }
}
