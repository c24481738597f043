use serde::{Deserialize, Serialize};

/// What a signed-in user may do. Decided once, at login, from the credential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Recruiter,
}

/// A stored login. Never exposes the hash in responses.
#[derive(Debug, Clone)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// The identity attached to a session after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedInUser {
    pub username: String,
    pub role: Role,
}

impl SignedInUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
