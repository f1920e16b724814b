//! Field mapper: total mapping from recovered text onto the fixed intake
//! schema. Every field independently takes its first matching rule's
//! capture, trimmed, or the field's placeholder. The output never omits a
//! key, so the intake form renders deterministically no matter how badly
//! extraction went.

pub mod fields;
pub mod rules;

pub use fields::{FieldKey, IntakeFieldSet};

use rules::COMPILED_RULES;

/// Longest value we keep for a single mapped field. Narrative captures can
/// swallow the rest of a run-on line; the form fields are not the place for
/// whole paragraphs.
const MAX_FIELD_LEN: usize = 300;

/// Map recovered text onto the intake schema.
pub fn map_text(text: &str) -> IntakeFieldSet {
    let mut mapped = IntakeFieldSet::placeholders();

    for rule in COMPILED_RULES.iter() {
        for regex in &rule.regexes {
            if let Some(caps) = regex.captures(text) {
                if let Some(value) = caps.get(rule.group) {
                    let trimmed = value.as_str().trim();
                    if !trimmed.is_empty() {
                        let clipped: String = trimmed.chars().take(MAX_FIELD_LEN).collect();
                        let finished = match rule.field {
                            FieldKey::Dob => normalize_dob(&clipped),
                            _ => clipped,
                        };
                        mapped.set(rule.field, finished);
                        break;
                    }
                }
            }
        }
    }

    mapped
}

/// Normalize a captured M/D/Y-ish date to YYYY-MM-DD. Two-digit years pivot
/// at 50 (49 -> 2049, 50 -> 1950). Unparseable input is kept verbatim
/// rather than dropped: a wrong-format date still beats a placeholder.
fn normalize_dob(raw: &str) -> String {
    let parts: Vec<&str> = raw.split(['/', '-']).collect();
    if parts.len() != 3 {
        return raw.to_string();
    }
    let (month, day, mut year) = match (
        parts[0].parse::<u32>(),
        parts[1].parse::<u32>(),
        parts[2].parse::<u32>(),
    ) {
        (Ok(m), Ok(d), Ok(y)) => (m, d, y),
        _ => return raw.to_string(),
    };
    if parts[2].len() == 2 {
        year += if year < 50 { 2000 } else { 1900 };
    }
    format!("{year:04}-{month:02}-{day:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPORT: &str = "\
Patient Name: Jane Doe
Age: 42
Sex: Female
DOB: 06/15/85
Phone: 555-123-4567
Patient ID: PAT-2024-0042
ABHA ID: ABHA123456789
Previous Condition: hypertension, type 2 diabetes
Current Medication: metformin 500mg twice daily
Family History: father had heart disease
Known Allergies: penicillin
Chief Complaint: severe headache for three days
Referring Doctor: Dr. Emily Rodriguez
Neurological Symptoms: photophobia, mild dizziness
Treatment History: OTC analgesics with minimal relief
Symptom Progression: worsening since onset";

    #[test]
    fn full_report_maps_every_labelled_field() {
        let mapped = map_text(SAMPLE_REPORT);
        assert_eq!(mapped.patient_name, "Jane Doe");
        assert_eq!(mapped.age, "42");
        assert_eq!(mapped.sex, "Female");
        assert_eq!(mapped.dob, "1985-06-15");
        assert_eq!(mapped.contact_number, "555-123-4567");
        assert_eq!(mapped.patient_id, "PAT-2024-0042");
        assert_eq!(mapped.national_health_id, "ABHA123456789");
        assert_eq!(mapped.previous_condition, "hypertension, type 2 diabetes");
        assert_eq!(mapped.current_medication, "metformin 500mg twice daily");
        assert_eq!(mapped.family_history, "father had heart disease");
        assert_eq!(mapped.known_allergy, "penicillin");
        assert_eq!(mapped.chief_complaint, "severe headache for three days");
        assert_eq!(mapped.referring_doctor, "Dr. Emily Rodriguez");
        assert_eq!(mapped.neurological_symptom, "photophobia, mild dizziness");
        assert_eq!(mapped.treatment_history, "OTC analgesics with minimal relief");
        assert_eq!(mapped.symptom_progression, "worsening since onset");
        // 16 labelled fields extracted; report content stays at placeholder.
        assert_eq!(mapped.meaningful_count(), 16);
    }

    #[test]
    fn empty_text_yields_pure_placeholders() {
        let mapped = map_text("");
        assert_eq!(mapped, IntakeFieldSet::placeholders());
        assert_eq!(mapped.meaningful_count(), 0);
    }

    #[test]
    fn unlabelled_prose_yields_placeholders_not_garbage() {
        let mapped = map_text("general prose with no recognizable intake labels whatsoever");
        for key in FieldKey::ALL {
            assert!(!mapped.get(key).is_empty());
        }
        assert_eq!(mapped.meaningful_count(), 0);
    }

    #[test]
    fn every_field_populated_even_on_partial_match() {
        let mapped = map_text("Age: 64");
        assert_eq!(mapped.age, "64");
        for key in FieldKey::ALL {
            assert!(!mapped.get(key).is_empty(), "{key:?} left empty");
        }
        assert_eq!(mapped.meaningful_count(), 1);
    }

    #[test]
    fn age_from_years_old_phrasing() {
        let mapped = map_text("The patient is 57 years old and presents for follow-up.");
        assert_eq!(mapped.age, "57");
    }

    #[test]
    fn dob_two_digit_year_pivots() {
        assert_eq!(normalize_dob("06/15/85"), "1985-06-15");
        assert_eq!(normalize_dob("1/2/03"), "2003-01-02");
    }

    #[test]
    fn dob_four_digit_year_reordered() {
        assert_eq!(normalize_dob("06/15/1985"), "1985-06-15");
        assert_eq!(normalize_dob("6-15-1985"), "1985-06-15");
    }

    #[test]
    fn dob_garbage_kept_verbatim() {
        assert_eq!(normalize_dob("not-a-date"), "not-a-date");
        assert_eq!(normalize_dob("15/85"), "15/85");
    }

    #[test]
    fn first_pattern_wins_per_field() {
        // Both "Patient Name:" and "Name:" appear; the more specific
        // pattern is listed first and must win.
        let mapped = map_text("Patient Name: Alice Smith\nName: Bob Jones");
        assert_eq!(mapped.patient_name, "Alice Smith");
    }

    #[test]
    fn overlong_capture_is_clipped() {
        let long_tail = "x".repeat(600);
        let mapped = map_text(&format!("Chief Complaint: {long_tail}"));
        assert_eq!(mapped.chief_complaint.len(), 300);
    }
}
