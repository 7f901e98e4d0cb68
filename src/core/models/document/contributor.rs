//! Contributor teams

use crate::utils::error::{DocflowError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contributor partition of a document; also an invitation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Authors,
    Verifiers,
    Validators,
}

impl Team {
    pub const ALL: [Team; 3] = [Team::Authors, Team::Verifiers, Team::Validators];

    /// Signature a member of this team produces
    pub fn signature_type(&self) -> SignatureType {
        match self {
            Team::Authors => SignatureType::Author,
            Team::Verifiers => SignatureType::Verifier,
            Team::Validators => SignatureType::Validator,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Authors => "authors",
            Team::Verifiers => "verifiers",
            Team::Validators => "validators",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Team::ALL
            .into_iter()
            .find(|team| team.as_str() == s)
            .ok_or_else(|| format!("Invalid team: {}", s))
    }
}

/// Kind of signature a contributor applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureType {
    Author,
    Verifier,
    Validator,
}

impl SignatureType {
    pub fn team(&self) -> Team {
        match self {
            SignatureType::Author => Team::Authors,
            SignatureType::Verifier => Team::Verifiers,
            SignatureType::Validator => Team::Validators,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureType::Author => "author",
            SignatureType::Verifier => "verifier",
            SignatureType::Validator => "validator",
        }
    }
}

impl std::fmt::Display for SignatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SignatureType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "author" => Ok(SignatureType::Author),
            "verifier" => Ok(SignatureType::Verifier),
            "validator" => Ok(SignatureType::Validator),
            _ => Err(format!("Invalid signature type: {}", s)),
        }
    }
}

/// Signing progress of a single contributor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributorStatus {
    /// Joined while the document is still being written
    Joined,
    /// Published; signature expected
    Pending,
    Signed,
}

/// A user listed in one of the document teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub user_id: Uuid,
    pub name: String,
    /// Role title shown on the document
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    pub status: ContributorStatus,
    pub signature_date: Option<DateTime<Utc>>,
    pub invited_at: DateTime<Utc>,
}

impl Contributor {
    pub fn new(user_id: Uuid, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            title: title.into(),
            department: String::new(),
            status: ContributorStatus::Joined,
            signature_date: None,
            invited_at: Utc::now(),
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_status(mut self, status: ContributorStatus) -> Self {
        self.status = status;
        self
    }
}

/// The three disjoint contributor lists of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contributors {
    #[serde(default)]
    pub authors: Vec<Contributor>,
    #[serde(default)]
    pub verifiers: Vec<Contributor>,
    #[serde(default)]
    pub validators: Vec<Contributor>,
}

impl Contributors {
    pub fn team(&self, team: Team) -> &[Contributor] {
        match team {
            Team::Authors => &self.authors,
            Team::Verifiers => &self.verifiers,
            Team::Validators => &self.validators,
        }
    }

    fn team_mut(&mut self, team: Team) -> &mut Vec<Contributor> {
        match team {
            Team::Authors => &mut self.authors,
            Team::Verifiers => &mut self.verifiers,
            Team::Validators => &mut self.validators,
        }
    }

    fn all_mut(&mut self) -> impl Iterator<Item = &mut Contributor> {
        self.authors
            .iter_mut()
            .chain(self.verifiers.iter_mut())
            .chain(self.validators.iter_mut())
    }

    /// Team the user belongs to, if any
    pub fn team_of(&self, user_id: Uuid) -> Option<Team> {
        Team::ALL
            .into_iter()
            .find(|team| self.team(*team).iter().any(|c| c.user_id == user_id))
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.team_of(user_id).is_some()
    }

    pub fn find(&self, user_id: Uuid) -> Option<&Contributor> {
        Team::ALL
            .into_iter()
            .flat_map(|team| self.team(team).iter())
            .find(|c| c.user_id == user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.verifiers.is_empty() && self.validators.is_empty()
    }

    pub fn len(&self) -> usize {
        self.authors.len() + self.verifiers.len() + self.validators.len()
    }

    pub fn user_ids(&self) -> Vec<Uuid> {
        Team::ALL
            .into_iter()
            .flat_map(|team| self.team(team).iter().map(|c| c.user_id))
            .collect()
    }

    /// Add a contributor, keeping teams disjoint and entries unique
    pub fn add(&mut self, team: Team, contributor: Contributor) -> Result<()> {
        if let Some(existing) = self.team_of(contributor.user_id) {
            return Err(if existing == team {
                DocflowError::conflict(format!("User is already in the {} team", team))
            } else {
                DocflowError::conflict(format!(
                    "User already belongs to the {} team of this document",
                    existing
                ))
            });
        }
        self.team_mut(team).push(contributor);
        Ok(())
    }

    /// Remove a user from whichever team lists them
    pub fn remove(&mut self, user_id: Uuid) -> bool {
        let before = self.len();
        for team in Team::ALL {
            self.team_mut(team).retain(|c| c.user_id != user_id);
        }
        before != self.len()
    }

    /// Check that no user appears twice across the three lists
    pub fn check_disjoint(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for user_id in self.user_ids() {
            if !seen.insert(user_id) {
                return Err(DocflowError::validation(format!(
                    "User {} appears in more than one contributor team",
                    user_id
                )));
            }
        }
        Ok(())
    }

    /// Every member of a non-empty team has signed
    pub fn team_fully_signed(&self, team: Team) -> bool {
        let members = self.team(team);
        !members.is_empty()
            && members
                .iter()
                .all(|c| c.status == ContributorStatus::Signed)
    }

    /// Mark the user's entry as signed
    pub fn mark_signed(&mut self, user_id: Uuid, at: DateTime<Utc>) -> bool {
        match self.all_mut().find(|c| c.user_id == user_id) {
            Some(contributor) => {
                contributor.status = ContributorStatus::Signed;
                contributor.signature_date = Some(at);
                true
            }
            None => false,
        }
    }

    /// Publishing turns every joined contributor into a pending signer
    pub fn request_signatures(&mut self) {
        for contributor in self.all_mut() {
            if contributor.status == ContributorStatus::Joined {
                contributor.status = ContributorStatus::Pending;
            }
        }
    }

    /// Fresh copy for a duplicated draft: nobody has signed yet
    pub fn reset_for_draft(&self) -> Self {
        let mut copy = self.clone();
        for contributor in copy.all_mut() {
            contributor.status = ContributorStatus::Joined;
            contributor.signature_date = None;
        }
        copy
    }
}
