//! Signature records (append-only)

use crate::core::models::SignatureType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub signature_type: SignatureType,
    /// Encoded signature image or hash supplied by the client
    pub signature_data: String,
    pub comments: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub signed_at: DateTime<Utc>,
}

impl Signature {
    pub fn new(
        document_id: Uuid,
        user_id: Uuid,
        signature_type: SignatureType,
        signature_data: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            user_id,
            signature_type,
            signature_data,
            comments: None,
            ip_address: None,
            user_agent: None,
            signed_at: Utc::now(),
        }
    }
}
