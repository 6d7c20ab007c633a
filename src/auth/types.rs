//! Core identity types for the Bepawa marketplace
//!
//! - `Role`: the closed set of account kinds
//! - `IdentityRecord`: a stored profile plus its credential hash
//! - `Identity`: the session view of a record, credential removed
//! - `NewIdentity`: registration input
//! - `SessionState`: logged out or logged in

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account kind. Serialized in lowercase (`"retail"`, `"lab"`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Marketplace operator
    Admin,
    /// Private customer
    Individual,
    /// Retail pharmacy
    Retail,
    /// Wholesale business supplying retailers
    Wholesale,
    /// Diagnostic laboratory
    Lab,
}

impl Role {
    /// Get all roles for iteration
    pub fn all() -> &'static [Role] {
        &[
            Role::Admin,
            Role::Individual,
            Role::Retail,
            Role::Wholesale,
            Role::Lab,
        ]
    }

    /// Whether a fresh registration with this role starts approved
    pub fn auto_approved(&self) -> bool {
        matches!(self, Role::Admin | Role::Individual)
    }

    /// Whether this role may log in while its approval flag is false.
    ///
    /// Registration already approves these roles; the check is kept at
    /// login too so that records seeded or edited by hand still pass.
    pub fn bypasses_approval_gate(&self) -> bool {
        matches!(self, Role::Admin | Role::Individual)
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Individual => "Individual",
            Role::Retail => "Retail Pharmacy",
            Role::Wholesale => "Wholesale Business",
            Role::Lab => "Diagnostic Lab",
        }
    }

    /// Serialized identifier, also used as the dashboard path segment
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Individual => "individual",
            Role::Retail => "retail",
            Role::Wholesale => "wholesale",
            Role::Lab => "lab",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "individual" => Ok(Role::Individual),
            "retail" | "pharmacy" => Ok(Role::Retail),
            "wholesale" => Ok(Role::Wholesale),
            "lab" | "laboratory" => Ok(Role::Lab),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Role-specific optional attributes.
///
/// Every field is optional; absent fields are omitted from the stored JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Pharmacy or laboratory operating license
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    /// Company registration number (wholesale, retail)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_registration: Option<String>,
    /// Tax identification number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pharmacist_in_charge: Option<String>,
    /// Test categories offered by a lab
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specializations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

/// A stored account: profile plus credential
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub id: String,
    /// Unique, compared case-insensitively
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    /// Argon2 PHC string
    pub password_hash: String,
    #[serde(default)]
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Normalised form used for email uniqueness: trimmed, Unicode lowercase
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl IdentityRecord {
    /// Case-insensitive email comparison
    pub fn email_matches(&self, email: &str) -> bool {
        email_key(&self.email) == email_key(email)
    }

    /// Session view of this record, credential removed
    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            is_approved: self.is_approved,
            created_at: self.created_at,
            profile: self.profile.clone(),
        }
    }
}

/// The logged-in identity. Same shape as `IdentityRecord` without the credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: Profile,
}

impl From<IdentityRecord> for Identity {
    fn from(record: IdentityRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            role: record.role,
            is_approved: record.is_approved,
            created_at: record.created_at,
            profile: record.profile,
        }
    }
}

impl Identity {
    /// Name for greetings, falling back to the email's local part
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.email.split('@').next().unwrap_or(&self.email)
        } else {
            &self.name
        }
    }
}

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIdentity {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    pub password: String,
    #[serde(flatten, default)]
    pub profile: Profile,
}

impl NewIdentity {
    pub fn new(email: impl Into<String>, role: Role, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: String::new(),
            role,
            password: password.into(),
            profile: Profile::default(),
        }
    }

    /// Builder method: set display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method: set role attributes
    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }
}

/// Session state machine
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::LoggedOut => None,
            SessionState::LoggedIn(identity) => Some(identity),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IdentityRecord {
        IdentityRecord {
            id: "42".to_string(),
            email: "Owner@Pharma.com".to_string(),
            name: "Corner Pharmacy".to_string(),
            role: Role::Retail,
            password_hash: "$argon2id$placeholder".to_string(),
            is_approved: false,
            created_at: Utc::now(),
            profile: Profile {
                license_number: Some("PH-1001".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Retail).unwrap(), "\"retail\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"wholesale\"").unwrap(),
            Role::Wholesale
        );
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("laboratory".parse::<Role>().unwrap(), Role::Lab);
        assert!("doctor".parse::<Role>().is_err());
    }

    #[test]
    fn test_auto_approval_roles() {
        assert!(Role::Admin.auto_approved());
        assert!(Role::Individual.auto_approved());
        assert!(!Role::Retail.auto_approved());
        assert!(!Role::Wholesale.auto_approved());
        assert!(!Role::Lab.auto_approved());
    }

    #[test]
    fn test_email_matches_case_insensitive() {
        let r = record();
        assert!(r.email_matches("owner@pharma.com"));
        assert!(r.email_matches(" OWNER@PHARMA.COM "));
        assert!(!r.email_matches("other@pharma.com"));
    }

    #[test]
    fn test_email_matches_folds_non_ascii_case() {
        let mut r = record();
        r.email = "JOSÉ@x.com".to_string();
        assert!(r.email_matches("josé@x.com"));
        assert_eq!(email_key(" ÅSA@Apotek.se "), "åsa@apotek.se");
    }

    #[test]
    fn test_record_json_is_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["isApproved"], false);
        assert_eq!(json["licenseNumber"], "PH-1001");
        assert!(json.get("passwordHash").is_some());
        assert!(json.get("address").is_none());
        assert!(json.get("specializations").is_none());
    }

    #[test]
    fn test_identity_has_no_credential() {
        let identity = record().to_identity();
        let json = serde_json::to_value(&identity).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(identity.email, "Owner@Pharma.com");
        assert_eq!(identity.profile.license_number.as_deref(), Some("PH-1001"));
    }

    #[test]
    fn test_display_name_fallback() {
        let mut identity = record().to_identity();
        identity.name.clear();
        assert_eq!(identity.display_name(), "Owner");
    }

    #[test]
    fn test_session_state() {
        let state = SessionState::default();
        assert!(!state.is_logged_in());
        assert!(state.identity().is_none());

        let state = SessionState::LoggedIn(record().into());
        assert!(state.is_logged_in());
        assert_eq!(state.identity().unwrap().id, "42");
    }
}
