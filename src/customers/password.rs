use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use tracing::error;

use crate::config::PasswordConfig;

/// Decides how a submitted password becomes a stored credential.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    hashed_prefixes: Vec<String>,
}

impl PasswordPolicy {
    pub fn new(config: &PasswordConfig) -> Self {
        Self {
            hashed_prefixes: config.hashed_prefixes.clone(),
        }
    }

    /// True when `value` is already in hashed-credential format.
    pub fn is_hashed(&self, value: &str) -> bool {
        self.hashed_prefixes
            .iter()
            .any(|prefix| value.starts_with(prefix.as_str()))
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Credential to store for a submitted password. Values that are already
    /// hashed pass through so they are never hashed twice.
    pub fn credential_for(&self, submitted: &str) -> anyhow::Result<String> {
        if self.is_hashed(submitted) {
            Ok(submitted.to_string())
        } else {
            self.hash(submitted)
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(&PasswordConfig::default())
    }
}

#[cfg(test)]
pub(crate) fn verify_password(plain: &str, hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_against_plaintext() {
        let policy = PasswordPolicy::default();
        let hash = policy.hash("Secur3P@ssw0rd!").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Secur3P@ssw0rd!", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn own_output_is_recognized_as_hashed() {
        let policy = PasswordPolicy::default();
        let hash = policy.hash("plaintext123").unwrap();
        assert!(policy.is_hashed(&hash));
        assert!(!policy.is_hashed("plaintext123"));
    }

    #[test]
    fn legacy_bcrypt_values_pass_through() {
        let policy = PasswordPolicy::default();
        let legacy = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";
        assert_eq!(policy.credential_for(legacy).unwrap(), legacy);
    }

    #[test]
    fn plaintext_is_hashed_with_fresh_salt() {
        let policy = PasswordPolicy::default();
        let a = policy.credential_for("plaintext123").unwrap();
        let b = policy.credential_for("plaintext123").unwrap();
        assert_ne!(a, "plaintext123");
        assert_ne!(a, b);
        assert!(verify_password("plaintext123", &a));
        assert!(verify_password("plaintext123", &b));
    }

    #[test]
    fn prefixes_follow_configuration() {
        let policy = PasswordPolicy::new(&PasswordConfig {
            hashed_prefixes: vec!["$scrypt$".into()],
        });
        assert!(policy.is_hashed("$scrypt$ln=16,r=8,p=1$abc"));
        assert!(!policy.is_hashed("$2a$10$abc"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
    }
}
