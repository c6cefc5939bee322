//! Admin session and identity.
//!
//! A fixed, non-configurable credential set gates the admin surface. The
//! session lives only in memory for the process lifetime; it is deliberately
//! not persisted, so a restart always lands on the login screen.

use std::sync::Mutex;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::types::UserRole;

struct Credential {
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: UserRole,
}

const CREDENTIALS: &[Credential] = &[
    Credential {
        email: "admin@photography.co.il",
        password: "admin123",
        name: "Studio Admin",
        role: UserRole::Admin,
    },
    Credential {
        email: "editor@photography.co.il",
        password: "editor123",
        name: "Studio Editor",
        role: UserRole::Editor,
    },
];

/// The identity stored for an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub name: String,
    pub role: UserRole,
}

/// In-memory session store for the admin area.
#[derive(Default)]
pub struct SessionService {
    current: Mutex<Option<AuthenticatedUser>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the supplied credentials and open a session on success.
    ///
    /// Returns `false` on any mismatch without revealing which field was
    /// wrong; every candidate is checked in constant time regardless of
    /// earlier matches.
    pub fn login(&self, email: &str, password: &str) -> bool {
        let mut matched: Option<AuthenticatedUser> = None;
        for credential in CREDENTIALS {
            let email_ok = digests_equal(email, credential.email);
            let password_ok = digests_equal(password, credential.password);
            if email_ok && password_ok && matched.is_none() {
                matched = Some(AuthenticatedUser {
                    name: credential.name.to_string(),
                    role: credential.role,
                });
            }
        }

        match matched {
            Some(user) => {
                *lock(&self.current) = Some(user);
                true
            }
            None => false,
        }
    }

    /// Close the session; a no-op when nobody is logged in.
    pub fn logout(&self) {
        *lock(&self.current) = None;
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.current).is_some()
    }

    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        lock(&self.current).clone()
    }
}

/// Compare two secrets by their fixed-width digests so the comparison cost
/// does not depend on either length or a shared prefix.
fn digests_equal(supplied: &str, expected: &str) -> bool {
    let supplied = hash_secret(supplied);
    let expected = hash_secret(expected);
    supplied.ct_eq(&expected).unwrap_u8() == 1
}

fn hash_secret(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_credentials_leave_the_session_closed() {
        let sessions = SessionService::new();
        assert!(!sessions.login("admin@photography.co.il", "wrong"));
        assert!(!sessions.login("nobody@example.com", "admin123"));
        assert!(!sessions.is_authenticated());
        assert_eq!(sessions.current_user(), None);
    }

    #[test]
    fn valid_credentials_open_a_named_session() {
        let sessions = SessionService::new();
        assert!(sessions.login("admin@photography.co.il", "admin123"));
        assert!(sessions.is_authenticated());

        let user = sessions.current_user().expect("authenticated user");
        assert!(!user.name.is_empty());
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn editor_account_gets_the_editor_role() {
        let sessions = SessionService::new();
        assert!(sessions.login("editor@photography.co.il", "editor123"));
        assert_eq!(
            sessions.current_user().map(|user| user.role),
            Some(UserRole::Editor)
        );
    }

    #[test]
    fn logout_clears_the_session() {
        let sessions = SessionService::new();
        sessions.login("admin@photography.co.il", "admin123");
        sessions.logout();
        assert!(!sessions.is_authenticated());
        // Logging out twice is harmless.
        sessions.logout();
    }

    #[test]
    fn mixed_account_fields_do_not_authenticate() {
        let sessions = SessionService::new();
        assert!(!sessions.login("admin@photography.co.il", "editor123"));
        assert!(!sessions.is_authenticated());
    }
}
