// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy for band, user and admin principals.

use thiserror::Error;

/// bcrypt silently ignores input past this many bytes.
const BCRYPT_MAX_BYTES: usize = 72;

/// Identities shorter than this are not checked for containment.
const MIN_IDENTITY_LEN: usize = 4;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password exceeds what bcrypt will hash.
    #[error("Password must be at most {max_bytes} bytes long")]
    TooLong { max_bytes: usize },

    /// Password mixes too few character classes.
    #[error(
        "Password must mix at least {required} of: uppercase letters, lowercase letters, digits, symbols (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password contains the principal's own name.
    #[error("Password must not contain the {field}")]
    ContainsIdentity { field: &'static str },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Password policy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum password length, in characters.
    pub min_length: usize,
    /// Minimum number of character classes (out of 4).
    pub min_classes: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            min_classes: 3,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password against the policy.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to validate
    /// * `confirmation` - The password confirmation
    /// * `username` - The principal's username
    /// * `display_name` - The principal's display name
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        username: &str,
        display_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        if password.len() > BCRYPT_MAX_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max_bytes: BCRYPT_MAX_BYTES,
            });
        }

        let found: usize = character_classes(password);
        if found < self.min_classes {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_classes,
                found,
            });
        }

        let lowered: String = password.to_lowercase();
        for (field, identity) in [("username", username), ("display name", display_name)] {
            let identity: String = identity.trim().to_lowercase();
            if identity.chars().count() >= MIN_IDENTITY_LEN && lowered.contains(&identity) {
                return Err(PasswordPolicyError::ContainsIdentity { field });
            }
        }

        Ok(())
    }
}

/// Counts the distinct character classes present in `password`.
///
/// Anything that is not a letter or digit (including whitespace) counts
/// as a symbol.
pub(crate) fn character_classes(password: &str) -> usize {
    let mut seen: [bool; 4] = [false; 4];

    for c in password.chars() {
        let class: usize = if c.is_uppercase() {
            0
        } else if c.is_lowercase() {
            1
        } else if c.is_numeric() {
            2
        } else {
            3
        };
        seen[class] = true;
    }

    seen.iter().filter(|present| **present).count()
}
