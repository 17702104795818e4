//! Identity provider stub. The exchange always succeeds after a simulated
//! delay; no credential is verified. A production replacement would return
//! `AuthError` kinds from the same signatures.

use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::models::User;

const SIMULATED_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication rejected: {0}")]
    Rejected(String),
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Exchange credentials for a session identity. An empty email falls back
/// to the demo account.
pub fn authenticate(credentials: &Credentials) -> Result<User, AuthError> {
    thread::sleep(SIMULATED_DELAY);

    let email = credentials.email.trim();
    let email = if email.is_empty() { "demo@example.com" } else { email };
    let name = email.split('@').next().unwrap_or("Demo User").to_string();

    Ok(User {
        uid: uid_from_email(email),
        email: Some(email.to_string()),
        display_name: Some(name.clone()),
        photo_url: Some(format!("https://ui-avatars.com/api/?name={}", name)),
    })
}

/// Simulated federated sign-in
pub fn authenticate_google() -> Result<User, AuthError> {
    thread::sleep(SIMULATED_DELAY);

    Ok(User {
        uid: "user-google-explorer".to_string(),
        email: Some("google.user@gmail.com".to_string()),
        display_name: Some("Google Explorer".to_string()),
        photo_url: Some(
            "https://ui-avatars.com/api/?name=Google+Explorer&background=4285F4&color=fff"
                .to_string(),
        ),
    })
}

/// Deterministic uid so the same email always maps to the same store keys,
/// and different emails never collide.
fn uid_from_email(email: &str) -> String {
    let slug: String = email
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("user-{}", slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_email_always_yields_the_same_uid() {
        assert_eq!(uid_from_email("Pat@Example.com"), uid_from_email("pat@example.com"));
        assert_ne!(uid_from_email("pat@example.com"), uid_from_email("sam@example.com"));
    }

    #[test]
    fn authenticate_always_succeeds() {
        let user = authenticate(&Credentials {
            email: "pat@example.com".into(),
            password: "anything".into(),
        })
        .unwrap();
        assert_eq!(user.uid, "user-pat-example-com");
        assert_eq!(user.display_name.as_deref(), Some("pat"));
        assert!(user.photo_url.is_some());
    }

    #[test]
    fn blank_email_falls_back_to_the_demo_account() {
        let user = authenticate(&Credentials::default()).unwrap();
        assert_eq!(user.email.as_deref(), Some("demo@example.com"));
        assert_eq!(user.display_name.as_deref(), Some("demo"));
    }

    #[test]
    fn google_sign_in_is_a_fixed_identity() {
        let user = authenticate_google().unwrap();
        assert_eq!(user.uid, "user-google-explorer");
    }
}
