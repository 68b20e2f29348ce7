//! Password hashing and verification with Argon2id.
//!
//! Hashing runs on the blocking thread pool so request workers never stall
//! on the deliberately slow key derivation.

use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use super::AuthError;

/// Salted, adaptive one-way hashing of vendor passwords.
///
/// Verification against an unknown account runs against a dummy hash built
/// with the same parameters, so a missing email costs as much time as a
/// wrong password.
#[derive(Clone)]
pub struct PasswordVerifier {
    argon2: Argon2<'static>,
    dummy_hash: Arc<str>,
}

impl PasswordVerifier {
    /// Verifier with the Argon2 default work factor.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the dummy hash cannot be derived.
    pub fn new() -> Result<Self, AuthError> {
        Self::with_params(Params::default())
    }

    /// Verifier with explicit Argon2id parameters.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the dummy hash cannot be derived.
    pub fn with_params(params: Params) -> Result<Self, AuthError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut filler = [0u8; 32];
        OsRng.fill_bytes(&mut filler);
        let dummy_hash = hash_with(&argon2, &hex::encode(filler))?;

        Ok(Self {
            argon2,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// Smallest parameters Argon2 accepts, for fast test suites.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the dummy hash cannot be derived.
    pub fn insecure_fast() -> Result<Self, AuthError> {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).map_err(|_| AuthError::PasswordHash)?;
        Self::with_params(params)
    }

    /// Hash a plaintext password into a PHC string.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails or the worker panics.
    pub async fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let argon2 = self.argon2.clone();
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || hash_with(&argon2, &plaintext))
            .await
            .map_err(|_| AuthError::PasswordHash)?
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// `stored` is `None` when no account matched; the comparison still runs
    /// (against the dummy hash) and reports `false`. A mismatch is a normal
    /// negative result, not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` only if the blocking worker fails.
    pub async fn verify(&self, plaintext: &str, stored: Option<&str>) -> Result<bool, AuthError> {
        let argon2 = self.argon2.clone();
        let plaintext = plaintext.to_owned();
        let account_exists = stored.is_some();
        let target = stored.map_or_else(|| self.dummy_hash.to_string(), str::to_owned);

        let matched = tokio::task::spawn_blocking(move || {
            PasswordHash::new(&target)
                .map(|parsed| argon2.verify_password(plaintext.as_bytes(), &parsed).is_ok())
                .unwrap_or(false)
        })
        .await
        .map_err(|_| AuthError::PasswordHash)?;

        Ok(matched && account_exists)
    }
}

fn hash_with(argon2: &Argon2<'_>, plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}
