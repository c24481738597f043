use std::collections::HashMap;

use anyhow::Result;

use crate::models::user::{Credential, Role, SignedInUser};

/// Accounts provisioned at startup, all with the configured seed password.
pub const SEED_ACCOUNTS: [(&str, Role); 3] = [
    ("admin", Role::Admin),
    ("krishnakanth", Role::Recruiter),
    ("manish", Role::Recruiter),
];

/// username → bcrypt hash + role.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, Credential>,
}

impl CredentialStore {
    /// Hashes the seed password once per seeded account.
    pub fn seeded(password: &str, cost: u32) -> Result<Self> {
        let mut store = Self::default();
        for (username, role) in SEED_ACCOUNTS {
            store.add(username, password, role, cost)?;
        }
        Ok(store)
    }

    /// Adds or replaces a user. The password is stored only as a bcrypt hash.
    pub fn add(&mut self, username: &str, password: &str, role: Role, cost: u32) -> Result<()> {
        let password_hash = bcrypt::hash(password, cost)?;
        self.insert(Credential {
            username: username.to_string(),
            password_hash,
            role,
        });
        Ok(())
    }

    pub fn insert(&mut self, credential: Credential) {
        self.users.insert(credential.username.clone(), credential);
    }

    pub fn get(&self, username: &str) -> Option<&Credential> {
        self.users.get(username)
    }

    pub fn usernames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.users.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Checks a plaintext password against a stored credential. A malformed hash
/// counts as a mismatch.
pub fn verify(credential: &Credential, password: &str) -> Option<SignedInUser> {
    match bcrypt::verify(password, &credential.password_hash) {
        Ok(true) => Some(SignedInUser {
            username: credential.username.clone(),
            role: credential.role,
        }),
        Ok(false) => None,
        Err(e) => {
            tracing::error!(
                "Stored hash for '{}' could not be checked: {e}",
                credential.username
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST: u32 = 4;

    #[test]
    fn test_seeded_accounts_verify_exact_password_only() {
        let store = CredentialStore::seeded("password123", COST).unwrap();

        for (username, role) in SEED_ACCOUNTS {
            let credential = store.get(username).unwrap();
            assert_ne!(credential.password_hash, "password123");

            let user = verify(credential, "password123").unwrap();
            assert_eq!(user.username, username);
            assert_eq!(user.role, role);

            assert!(verify(credential, "password124").is_none());
            assert!(verify(credential, "").is_none());
            assert!(verify(credential, "Password123").is_none());
        }
    }

    #[test]
    fn test_only_admin_is_seeded_as_admin() {
        let store = CredentialStore::seeded("pw", COST).unwrap();
        assert_eq!(store.get("admin").unwrap().role, Role::Admin);
        assert_eq!(store.get("manish").unwrap().role, Role::Recruiter);
        assert_eq!(store.usernames(), vec!["admin", "krishnakanth", "manish"]);
    }

    #[test]
    fn test_add_replaces_existing_user() {
        let mut store = CredentialStore::default();
        store.add("sam", "first", Role::Recruiter, COST).unwrap();
        store.add("sam", "second", Role::Admin, COST).unwrap();

        let credential = store.get("sam").unwrap();
        assert!(verify(credential, "first").is_none());
        assert_eq!(verify(credential, "second").unwrap().role, Role::Admin);
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        let credential = Credential {
            username: "x".to_string(),
            password_hash: "not-a-bcrypt-hash".to_string(),
            role: Role::Recruiter,
        };
        assert!(verify(&credential, "anything").is_none());
    }
}
