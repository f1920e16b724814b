//! Shared state and extension types for the API layer.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{PublicUser, Role, User};
use crate::pipeline::extraction::DocumentExtractor;
use crate::services::narrative::NarrativeClient;
use crate::services::segmentation::SegmentationClient;

/// Shared context for all routes and middleware: configuration, the
/// database connection, the extraction pipeline, and the external service
/// clients.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub db: Arc<Mutex<Connection>>,
    pub extractor: Arc<DocumentExtractor>,
    pub segmentation: Arc<SegmentationClient>,
    pub narrative: Arc<NarrativeClient>,
}

impl ApiContext {
    pub fn new(config: AppConfig, db: Connection) -> Self {
        let segmentation = SegmentationClient::new(
            &config.segmentation_url,
            config.service_timeout_secs,
        );
        let narrative = NarrativeClient::new(
            &config.llm_url,
            &config.llm_model,
            config.service_timeout_secs,
        );
        Self {
            config: Arc::new(config),
            db: Arc::new(Mutex::new(db)),
            extractor: Arc::new(DocumentExtractor::new()),
            segmentation: Arc::new(segmentation),
            narrative: Arc::new(narrative),
        }
    }
}

/// Authenticated user context, injected into request extensions by the
/// auth middleware after session validation.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub specialty: Option<String>,
    pub department: Option<String>,
}

impl AuthedUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            specialty: user.specialty.clone(),
            department: user.department.clone(),
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role.as_str().to_string(),
            specialty: self.specialty.clone(),
            department: self.department.clone(),
        }
    }
}
