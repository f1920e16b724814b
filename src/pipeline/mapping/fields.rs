use serde::{Deserialize, Serialize};

/// The fixed intake schema. Every field always carries a value once mapping
/// completes: either a real extracted string or that field's placeholder.
/// Keeping this a plain struct (not a map) makes the total-coverage
/// invariant a type-level fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeFieldSet {
    pub patient_name: String,
    pub age: String,
    pub sex: String,
    pub dob: String,
    pub contact_number: String,
    pub patient_id: String,
    pub national_health_id: String,
    pub previous_condition: String,
    pub current_medication: String,
    pub family_history: String,
    pub known_allergy: String,
    pub chief_complaint: String,
    pub referring_doctor: String,
    pub neurological_symptom: String,
    pub treatment_history: String,
    pub symptom_progression: String,
    pub report_content: String,
}

/// Keys of the intake schema, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    PatientName,
    Age,
    Sex,
    Dob,
    ContactNumber,
    PatientId,
    NationalHealthId,
    PreviousCondition,
    CurrentMedication,
    FamilyHistory,
    KnownAllergy,
    ChiefComplaint,
    ReferringDoctor,
    NeurologicalSymptom,
    TreatmentHistory,
    SymptomProgression,
    ReportContent,
}

impl FieldKey {
    pub const ALL: [FieldKey; 17] = [
        FieldKey::PatientName,
        FieldKey::Age,
        FieldKey::Sex,
        FieldKey::Dob,
        FieldKey::ContactNumber,
        FieldKey::PatientId,
        FieldKey::NationalHealthId,
        FieldKey::PreviousCondition,
        FieldKey::CurrentMedication,
        FieldKey::FamilyHistory,
        FieldKey::KnownAllergy,
        FieldKey::ChiefComplaint,
        FieldKey::ReferringDoctor,
        FieldKey::NeurologicalSymptom,
        FieldKey::TreatmentHistory,
        FieldKey::SymptomProgression,
        FieldKey::ReportContent,
    ];

    /// Fixed placeholder inserted when nothing was extracted for the field.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::PatientName => "Patient name not found",
            Self::Age => "Age not specified",
            Self::Sex => "Sex not specified",
            Self::Dob => "Date of birth not specified",
            Self::ContactNumber => "Contact number not available",
            Self::PatientId => "Patient ID not assigned",
            Self::NationalHealthId => "National health ID not provided",
            Self::PreviousCondition => "No previous conditions reported",
            Self::CurrentMedication => "No current medication reported",
            Self::FamilyHistory => "No family history reported",
            Self::KnownAllergy => "No known allergies reported",
            Self::ChiefComplaint => "Chief complaint not specified",
            Self::ReferringDoctor => "Referring doctor not specified",
            Self::NeurologicalSymptom => "No neurological symptoms reported",
            Self::TreatmentHistory => "No treatment history reported",
            Self::SymptomProgression => "Symptom progression not specified",
            Self::ReportContent => "Report uploaded",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PatientName => "Patient Name",
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::Dob => "Date of Birth",
            Self::ContactNumber => "Contact Number",
            Self::PatientId => "Patient ID",
            Self::NationalHealthId => "National Health ID",
            Self::PreviousCondition => "Previous Condition",
            Self::CurrentMedication => "Current Medication",
            Self::FamilyHistory => "Family History",
            Self::KnownAllergy => "Known Allergy",
            Self::ChiefComplaint => "Chief Complaint",
            Self::ReferringDoctor => "Referring Doctor",
            Self::NeurologicalSymptom => "Neurological Symptom",
            Self::TreatmentHistory => "Treatment History",
            Self::SymptomProgression => "Symptom Progression",
            Self::ReportContent => "Report Content",
        }
    }
}

impl IntakeFieldSet {
    /// A field set holding every field's placeholder. This is the terminal
    /// state of total extraction failure: still a fully fillable form.
    pub fn placeholders() -> Self {
        let mut fields = Self {
            patient_name: String::new(),
            age: String::new(),
            sex: String::new(),
            dob: String::new(),
            contact_number: String::new(),
            patient_id: String::new(),
            national_health_id: String::new(),
            previous_condition: String::new(),
            current_medication: String::new(),
            family_history: String::new(),
            known_allergy: String::new(),
            chief_complaint: String::new(),
            referring_doctor: String::new(),
            neurological_symptom: String::new(),
            treatment_history: String::new(),
            symptom_progression: String::new(),
            report_content: String::new(),
        };
        for key in FieldKey::ALL {
            fields.set(key, key.placeholder().to_string());
        }
        fields
    }

    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::PatientName => &self.patient_name,
            FieldKey::Age => &self.age,
            FieldKey::Sex => &self.sex,
            FieldKey::Dob => &self.dob,
            FieldKey::ContactNumber => &self.contact_number,
            FieldKey::PatientId => &self.patient_id,
            FieldKey::NationalHealthId => &self.national_health_id,
            FieldKey::PreviousCondition => &self.previous_condition,
            FieldKey::CurrentMedication => &self.current_medication,
            FieldKey::FamilyHistory => &self.family_history,
            FieldKey::KnownAllergy => &self.known_allergy,
            FieldKey::ChiefComplaint => &self.chief_complaint,
            FieldKey::ReferringDoctor => &self.referring_doctor,
            FieldKey::NeurologicalSymptom => &self.neurological_symptom,
            FieldKey::TreatmentHistory => &self.treatment_history,
            FieldKey::SymptomProgression => &self.symptom_progression,
            FieldKey::ReportContent => &self.report_content,
        }
    }

    pub fn set(&mut self, key: FieldKey, value: String) {
        match key {
            FieldKey::PatientName => self.patient_name = value,
            FieldKey::Age => self.age = value,
            FieldKey::Sex => self.sex = value,
            FieldKey::Dob => self.dob = value,
            FieldKey::ContactNumber => self.contact_number = value,
            FieldKey::PatientId => self.patient_id = value,
            FieldKey::NationalHealthId => self.national_health_id = value,
            FieldKey::PreviousCondition => self.previous_condition = value,
            FieldKey::CurrentMedication => self.current_medication = value,
            FieldKey::FamilyHistory => self.family_history = value,
            FieldKey::KnownAllergy => self.known_allergy = value,
            FieldKey::ChiefComplaint => self.chief_complaint = value,
            FieldKey::ReferringDoctor => self.referring_doctor = value,
            FieldKey::NeurologicalSymptom => self.neurological_symptom = value,
            FieldKey::TreatmentHistory => self.treatment_history = value,
            FieldKey::SymptomProgression => self.symptom_progression = value,
            FieldKey::ReportContent => self.report_content = value,
        }
    }

    /// Count fields whose value differs from every known placeholder.
    /// Drives the "N meaningful fields extracted" indicator.
    pub fn meaningful_count(&self) -> usize {
        FieldKey::ALL
            .iter()
            .filter(|key| {
                let value = self.get(**key);
                !FieldKey::ALL.iter().any(|k| k.placeholder() == value)
            })
            .count()
    }
}

impl Default for IntakeFieldSet {
    fn default() -> Self {
        Self::placeholders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_cover_all_seventeen_fields() {
        let fields = IntakeFieldSet::placeholders();
        for key in FieldKey::ALL {
            assert_eq!(fields.get(key), key.placeholder());
            assert!(!fields.get(key).is_empty());
        }
        assert_eq!(FieldKey::ALL.len(), 17);
    }

    #[test]
    fn placeholders_are_unique_per_field() {
        let mut seen = std::collections::HashSet::new();
        for key in FieldKey::ALL {
            assert!(seen.insert(key.placeholder()), "duplicate: {}", key.placeholder());
        }
    }

    #[test]
    fn meaningful_count_zero_for_pure_placeholders() {
        assert_eq!(IntakeFieldSet::placeholders().meaningful_count(), 0);
    }

    #[test]
    fn meaningful_count_tracks_real_values() {
        let mut fields = IntakeFieldSet::placeholders();
        fields.set(FieldKey::PatientName, "Jane Doe".into());
        fields.set(FieldKey::Age, "42".into());
        assert_eq!(fields.meaningful_count(), 2);
    }

    #[test]
    fn value_matching_another_fields_placeholder_not_meaningful() {
        // A captured value that happens to equal some placeholder string is
        // still counted as unextracted.
        let mut fields = IntakeFieldSet::placeholders();
        fields.set(FieldKey::ReportContent, FieldKey::Age.placeholder().into());
        assert_eq!(fields.meaningful_count(), 0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(IntakeFieldSet::placeholders()).unwrap();
        assert!(json.get("patientName").is_some());
        assert!(json.get("nationalHealthId").is_some());
        assert!(json.get("reportContent").is_some());
        assert_eq!(json.as_object().unwrap().len(), 17);
    }
}
