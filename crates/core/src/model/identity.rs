use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("first name cannot be empty")]
    EmptyFirstName,

    #[error("last name cannot be empty")]
    EmptyLastName,

    #[error("unknown organization: {0}")]
    UnknownOrganization(String),
}

//
// ─── ORGANIZATION ──────────────────────────────────────────────────────────────
//

/// The closed set of organizations a learner can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Organization {
    #[serde(rename = "C2S")]
    C2s,
    #[serde(rename = "JCC")]
    Jcc,
}

impl Organization {
    pub const ALL: [Organization; 2] = [Organization::C2s, Organization::Jcc];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Organization::C2s => "C2S",
            Organization::Jcc => "JCC",
        }
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Organization {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Organization::ALL
            .into_iter()
            .find(|org| org.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| IdentityError::UnknownOrganization(trimmed.to_owned()))
    }
}

//
// ─── IDENTITY ──────────────────────────────────────────────────────────────────
//

/// Learner identity captured once at session start.
///
/// Names are stored trimmed and are guaranteed non-empty. There is no mutating
/// API: a new identity means a new session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    first_name: String,
    last_name: String,
    organization: Organization,
}

impl Identity {
    /// Validate raw form input into an identity.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::EmptyFirstName` / `EmptyLastName` when a name is
    /// blank after trimming.
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        organization: Organization,
    ) -> Result<Self, IdentityError> {
        let first_name = first_name.as_ref().trim();
        if first_name.is_empty() {
            return Err(IdentityError::EmptyFirstName);
        }
        let last_name = last_name.as_ref().trim();
        if last_name.is_empty() {
            return Err(IdentityError::EmptyLastName);
        }

        Ok(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            organization,
        })
    }

    /// Validate raw form input where the organization is still free text.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if any field fails validation.
    pub fn parse(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        organization: &str,
    ) -> Result<Self, IdentityError> {
        let organization = organization.parse::<Organization>()?;
        Self::new(first_name, last_name, organization)
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn organization(&self) -> Organization {
        self.organization
    }

    /// "First Last", as printed on reports and footers.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
