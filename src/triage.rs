//! Priority triage: a pure function over a patient's age and free-text
//! fields, used for list sorting and highlighting on the doctor side.
//!
//! The age threshold and keyword list are presentation-layer business rules
//! with no clinical validation behind them, so they live in a config value
//! rather than the code path.

use serde::{Deserialize, Serialize};

/// Tunable triage rules. Defaults match the intake workflow's historical
/// behavior: elderly at 65, and a short list of red-flag keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    pub elderly_age: u32,
    pub keywords: Vec<String>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            elderly_age: 65,
            keywords: [
                "critical",
                "stroke",
                "severe",
                "emergency",
                "icu",
                "urgent",
                "unstable",
                "life-threatening",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// The record shape the classifier reads. Callers resolve whether age comes
/// from the patient record or a nested intake before building this.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriageInput<'a> {
    /// Explicit stored flag; takes precedence over recomputation.
    pub preset: Option<bool>,
    pub age: Option<&'a str>,
    pub chief_complaint: Option<&'a str>,
    pub previous_condition: Option<&'a str>,
}

/// Derived, never stored; recomputed on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityAssessment {
    pub high_priority: bool,
    pub reason: String,
}

/// Assess a patient record. Pure and deterministic: identical input always
/// yields the identical `(flag, reason)` pair.
pub fn assess(input: TriageInput<'_>, config: &TriageConfig) -> PriorityAssessment {
    let computed = heuristic_reason(input, config);
    let high_priority = input.preset.unwrap_or(computed.is_some());

    let reason = if high_priority {
        // Pre-set flags without a matching heuristic still need a label.
        computed.unwrap_or_else(|| "High risk".to_string())
    } else {
        String::new()
    };

    PriorityAssessment {
        high_priority,
        reason,
    }
}

fn heuristic_reason(input: TriageInput<'_>, config: &TriageConfig) -> Option<String> {
    let age = input
        .age
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(0);
    if age >= config.elderly_age {
        return Some(format!("Elderly (Age {age})"));
    }

    // First matching keyword in the first matching field wins.
    let fields = [
        ("Chief Complaint", input.chief_complaint),
        ("Previous Condition", input.previous_condition),
    ];
    for (label, value) in fields {
        let Some(text) = value else { continue };
        let lowered = text.to_lowercase();
        for keyword in &config.keywords {
            if lowered.contains(&keyword.to_lowercase()) {
                return Some(format!("{label}: {}", capitalize(keyword)));
            }
        }
    }

    None
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> TriageConfig {
        TriageConfig::default()
    }

    #[test]
    fn age_at_threshold_is_high_priority() {
        let result = assess(
            TriageInput {
                age: Some("65"),
                ..Default::default()
            },
            &cfg(),
        );
        assert!(result.high_priority);
        assert_eq!(result.reason, "Elderly (Age 65)");
    }

    #[test]
    fn age_below_threshold_without_keywords_is_not() {
        let result = assess(
            TriageInput {
                age: Some("64"),
                chief_complaint: Some("routine follow-up"),
                previous_condition: Some("none"),
                ..Default::default()
            },
            &cfg(),
        );
        assert!(!result.high_priority);
        assert!(result.reason.is_empty());
    }

    #[test]
    fn keyword_in_chief_complaint_flags() {
        let result = assess(
            TriageInput {
                age: Some("30"),
                chief_complaint: Some("acute stroke symptoms"),
                ..Default::default()
            },
            &cfg(),
        );
        assert!(result.high_priority);
        assert_eq!(result.reason, "Chief Complaint: Stroke");
    }

    #[test]
    fn chief_complaint_checked_before_previous_condition() {
        let result = assess(
            TriageInput {
                age: Some("40"),
                chief_complaint: Some("urgent re-evaluation"),
                previous_condition: Some("severe asthma"),
                ..Default::default()
            },
            &cfg(),
        );
        // Both fields match; the first field wins even though "severe"
        // comes earlier in the keyword list.
        assert_eq!(result.reason, "Chief Complaint: Urgent");
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let result = assess(
            TriageInput {
                age: Some("50"),
                previous_condition: Some("admitted to ICU last year"),
                ..Default::default()
            },
            &cfg(),
        );
        assert!(result.high_priority);
        assert_eq!(result.reason, "Previous Condition: Icu");
    }

    #[test]
    fn unparseable_age_defaults_to_zero() {
        let result = assess(
            TriageInput {
                age: Some("unknown"),
                ..Default::default()
            },
            &cfg(),
        );
        assert!(!result.high_priority);
    }

    #[test]
    fn preset_flag_overrides_heuristic() {
        let flagged = assess(
            TriageInput {
                preset: Some(true),
                age: Some("30"),
                ..Default::default()
            },
            &cfg(),
        );
        assert!(flagged.high_priority);
        assert_eq!(flagged.reason, "High risk");

        let cleared = assess(
            TriageInput {
                preset: Some(false),
                age: Some("80"),
                ..Default::default()
            },
            &cfg(),
        );
        assert!(!cleared.high_priority);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let input = TriageInput {
            age: Some("70"),
            chief_complaint: Some("severe dizziness"),
            ..Default::default()
        };
        assert_eq!(assess(input, &cfg()), assess(input, &cfg()));
    }

    #[test]
    fn custom_config_changes_threshold() {
        let config = TriageConfig {
            elderly_age: 50,
            keywords: vec!["collapse".into()],
        };
        let result = assess(
            TriageInput {
                age: Some("55"),
                ..Default::default()
            },
            &config,
        );
        assert!(result.high_priority);
        assert_eq!(result.reason, "Elderly (Age 55)");

        let keyword_only = assess(
            TriageInput {
                age: Some("20"),
                chief_complaint: Some("sudden collapse at home"),
                ..Default::default()
            },
            &config,
        );
        assert_eq!(keyword_only.reason, "Chief Complaint: Collapse");
    }
}
