//! Document status

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    AuthorReview,
    AuthorSigned,
    VerifierReview,
    VerifierSigned,
    ValidatorReview,
    Approved,
    Archived,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 8] = [
        DocumentStatus::Draft,
        DocumentStatus::AuthorReview,
        DocumentStatus::AuthorSigned,
        DocumentStatus::VerifierReview,
        DocumentStatus::VerifierSigned,
        DocumentStatus::ValidatorReview,
        DocumentStatus::Approved,
        DocumentStatus::Archived,
    ];

    /// Position along the forward-only lifecycle
    pub fn rank(&self) -> u8 {
        match self {
            DocumentStatus::Draft => 0,
            DocumentStatus::AuthorReview => 1,
            DocumentStatus::AuthorSigned => 2,
            DocumentStatus::VerifierReview => 3,
            DocumentStatus::VerifierSigned => 4,
            DocumentStatus::ValidatorReview => 5,
            DocumentStatus::Approved => 6,
            DocumentStatus::Archived => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::AuthorReview => "author_review",
            DocumentStatus::AuthorSigned => "author_signed",
            DocumentStatus::VerifierReview => "verifier_review",
            DocumentStatus::VerifierSigned => "verifier_signed",
            DocumentStatus::ValidatorReview => "validator_review",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid document status: {}", s))
    }
}
