use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    Doctor => "doctor",
    Receptionist => "receptionist",
});

str_enum!(ReportStatus {
    Pending => "pending",
    AiProcessed => "ai_processed",
    DoctorReviewed => "doctor_reviewed",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trip() {
        for (variant, s) in [(Role::Doctor, "doctor"), (Role::Receptionist, "receptionist")] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Role::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn report_status_round_trip() {
        for (variant, s) in [
            (ReportStatus::Pending, "pending"),
            (ReportStatus::AiProcessed, "ai_processed"),
            (ReportStatus::DoctorReviewed, "doctor_reviewed"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ReportStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn unknown_value_rejected() {
        assert!(Role::from_str("admin").is_err());
        assert!(ReportStatus::from_str("archived").is_err());
    }
}
