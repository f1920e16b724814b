use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered patient. `patient_ref` is the human-facing identifier
/// receptionists hand out and doctors search by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub patient_ref: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,
    pub known_allergies: Option<String>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub family_history: Option<String>,
    pub registered_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Patient {
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Generate a unique human-facing patient identifier,
/// e.g. `PAT-20250806-4F2A91C3`.
pub fn generate_patient_ref() -> String {
    format!(
        "PAT-{}-{}",
        Utc::now().format("%Y%m%d"),
        short_unique_suffix()
    )
}

pub(crate) fn short_unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_ref_shape() {
        let r = generate_patient_ref();
        assert!(r.starts_with("PAT-"));
        let parts: Vec<&str> = r.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn patient_refs_are_unique() {
        assert_ne!(generate_patient_ref(), generate_patient_ref());
    }

    #[test]
    fn full_name_handles_missing_last_name() {
        let mut p = sample();
        assert_eq!(p.full_name(), "John Doe");
        p.last_name.clear();
        assert_eq!(p.full_name(), "John");
    }

    fn sample() -> Patient {
        Patient {
            id: Uuid::new_v4(),
            patient_ref: generate_patient_ref(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            gender: "Male".into(),
            phone: None,
            email: None,
            address: None,
            blood_group: None,
            known_allergies: None,
            medical_history: None,
            current_medications: None,
            family_history: None,
            registered_by: Uuid::new_v4(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}
