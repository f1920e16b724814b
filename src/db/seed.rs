//! First-run seeding: the authorized staff roster plus one sample patient
//! so a fresh install has something to log into and search for.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use super::repository::{count_users, insert_intake, insert_patient, insert_user};
use super::DatabaseError;
use crate::auth::hash_password;
use crate::models::{
    generate_patient_ref, Patient, PatientIntake, Role, User,
};

struct SeedUser {
    email: &'static str,
    full_name: &'static str,
    role: Role,
    specialty: Option<&'static str>,
    department: &'static str,
    password: &'static str,
}

const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        email: "reception@hospital.com",
        full_name: "Alex Parker",
        role: Role::Receptionist,
        specialty: None,
        department: "Front Desk",
        password: "reception2024",
    },
    SeedUser {
        email: "dr.smith@hospital.com",
        full_name: "Dr. John Smith",
        role: Role::Doctor,
        specialty: Some("Radiology"),
        department: "Radiology Department",
        password: "Smith2024!",
    },
    SeedUser {
        email: "dr.johnson@hospital.com",
        full_name: "Dr. Sarah Johnson",
        role: Role::Doctor,
        specialty: Some("Neurology"),
        department: "Neurology Department",
        password: "Johnson2024!",
    },
    SeedUser {
        email: "dr.williams@hospital.com",
        full_name: "Dr. Michael Williams",
        role: Role::Doctor,
        specialty: Some("Oncology"),
        department: "Oncology Department",
        password: "Williams2024!",
    },
    SeedUser {
        email: "dr.davis@hospital.com",
        full_name: "Dr. Robert Davis",
        role: Role::Doctor,
        specialty: Some("Emergency Medicine"),
        department: "Emergency Department",
        password: "Davis2024!",
    },
];

/// Populate an empty database. A database with any user at all is left
/// untouched.
pub fn seed_if_empty(conn: &Connection) -> Result<bool, DatabaseError> {
    if count_users(conn)? > 0 {
        return Ok(false);
    }

    let now = Utc::now().naive_utc();
    let mut receptionist_id = None;

    for seed in SEED_USERS {
        let user = User {
            id: Uuid::new_v4(),
            email: seed.email.into(),
            full_name: seed.full_name.into(),
            password_hash: hash_password(seed.password)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            role: seed.role,
            specialty: seed.specialty.map(str::to_string),
            department: Some(seed.department.into()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        if seed.role == Role::Receptionist {
            receptionist_id = Some(user.id);
        }
        insert_user(conn, &user)?;
    }

    let registered_by = receptionist_id.expect("seed roster includes a receptionist");

    let patient = Patient {
        id: Uuid::new_v4(),
        patient_ref: generate_patient_ref(),
        first_name: "John".into(),
        last_name: "Doe".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
        gender: "Male".into(),
        phone: Some("+1-555-0123".into()),
        email: Some("john.doe@email.com".into()),
        address: Some("123 Main St, Anytown".into()),
        blood_group: Some("O+".into()),
        known_allergies: Some("Penicillin".into()),
        medical_history: Some("Hypertension, Diabetes Type 2".into()),
        current_medications: Some("Metformin 500mg twice daily, Lisinopril 10mg daily".into()),
        family_history: Some("Father had heart disease, mother has diabetes".into()),
        registered_by,
        created_at: now,
        updated_at: now,
    };
    insert_patient(conn, &patient)?;

    let intake = PatientIntake {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        age: Some("38".into()),
        sex: Some("Male".into()),
        dob: NaiveDate::from_ymd_opt(1985, 6, 15),
        contact_number: Some("+1-555-0123".into()),
        national_health_id: Some("NH123456789".into()),
        previous_condition: Some("Hypertension, Diabetes Type 2, appendectomy (2010)".into()),
        current_medication: Some("Metformin 500mg twice daily, Lisinopril 10mg daily".into()),
        family_history: Some("Father had heart disease and passed away at 65".into()),
        known_allergy: Some("Penicillin (severe reaction), sulfa drugs (mild rash)".into()),
        chief_complaint: Some(
            "Severe headache for the past 3 days with nausea and light sensitivity".into(),
        ),
        referring_doctor: Some("Dr. Emily Rodriguez".into()),
        neurological_symptom: Some("Severe headache, nausea, photophobia, mild dizziness".into()),
        treatment_history: Some("OTC pain relievers with minimal relief".into()),
        symptom_progression: Some("Progressively worse since onset three days ago".into()),
        report_content: Some(
            "Patient presents with severe headache of 3 days duration; neurological \
             examination needed to rule out serious conditions."
                .into(),
        ),
        report_file: None,
        extracted_data: None,
        assigned_doctor_id: None,
        high_priority: None,
        created_by: registered_by,
        created_at: now,
        updated_at: now,
    };
    insert_intake(conn, &intake)?;

    tracing::info!(
        users = SEED_USERS.len(),
        patient_ref = %patient.patient_ref,
        "seeded empty database"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{get_user_by_email, list_active_doctors, search_patients};
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn seeds_empty_database_once() {
        let conn = open_memory_database().unwrap();
        assert!(seed_if_empty(&conn).unwrap());
        assert!(!seed_if_empty(&conn).unwrap());
        assert_eq!(count_users(&conn).unwrap(), SEED_USERS.len() as i64);
    }

    #[test]
    fn seeded_credentials_verify() {
        let conn = open_memory_database().unwrap();
        seed_if_empty(&conn).unwrap();
        let doctor = get_user_by_email(&conn, "dr.johnson@hospital.com")
            .unwrap()
            .unwrap();
        assert!(crate::auth::verify_password("Johnson2024!", &doctor.password_hash));
        assert_eq!(doctor.role, Role::Doctor);
    }

    #[test]
    fn seeded_patient_is_searchable() {
        let conn = open_memory_database().unwrap();
        seed_if_empty(&conn).unwrap();
        let (found, total) = search_patients(&conn, "Doe", 1, 10).unwrap();
        assert_eq!(total, 1);
        assert!(found[0].patient_ref.starts_with("PAT-"));
    }

    #[test]
    fn seeded_roster_has_doctors() {
        let conn = open_memory_database().unwrap();
        seed_if_empty(&conn).unwrap();
        let doctors = list_active_doctors(&conn).unwrap();
        assert_eq!(doctors.len(), 4);
    }
}
