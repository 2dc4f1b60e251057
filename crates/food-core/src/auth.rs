//! # Authentication State
//!
//! User/session types and the state holder that tracks who is signed in.
//! The holder is owned by the application root and passed to whoever needs
//! it; all backend calls go through an [`AuthProvider`].

use crate::error::{FoodError, FoodResult};
use crate::provider::AuthProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Sign-up form
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    /// Reject empty fields before calling the backend
    pub fn validate(&self) -> FoodResult<()> {
        if self.name.trim().is_empty() {
            return Err(FoodError::InvalidRequest("name is required".to_string()));
        }
        Credentials::new(self.email.clone(), self.password.clone()).validate()
    }
}

/// Sign-in form
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reject empty fields before calling the backend
    pub fn validate(&self) -> FoodResult<()> {
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(FoodError::InvalidRequest(
                "a valid email is required".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(FoodError::InvalidRequest("password is required".to_string()));
        }
        Ok(())
    }
}

/// A signed-in user's profile document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Profile document id
    pub id: String,

    /// Backing account id
    pub account_id: String,

    pub name: String,

    pub email: String,

    /// Avatar image URL
    #[serde(default)]
    pub avatar: String,
}

/// An authenticated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,

    pub user_id: String,

    /// Token presented on later requests
    #[serde(skip_serializing)]
    pub secret: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check if the session has not expired
    pub fn is_active(&self) -> bool {
        self.expires_at.map(|exp| exp > Utc::now()).unwrap_or(true)
    }
}

/// Who is signed in right now
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<UserProfile>,
    #[serde(skip)]
    pub session: Option<Session>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark as signed in
    pub fn set_user(&mut self, user: UserProfile) {
        self.user = Some(user);
        self.is_authenticated = true;
    }

    /// Forget user and session
    pub fn reset(&mut self) {
        self.user = None;
        self.session = None;
        self.is_authenticated = false;
    }

    /// Re-validate the stored session against the backend.
    ///
    /// On success the profile is stored; when there is no session, the
    /// session is rejected, or the call fails, the state is cleared.
    /// Loading is always off afterwards.
    pub async fn fetch_authenticated_user(&mut self, provider: &dyn AuthProvider) {
        self.is_loading = true;

        let result = match self.session.as_ref() {
            Some(session) if session.is_active() => provider.current_user(session).await,
            _ => Ok(None),
        };

        match result {
            Ok(Some(user)) => self.set_user(user),
            Ok(None) => self.reset(),
            Err(e) => {
                warn!("Error fetching authenticated user: {}", e);
                self.reset();
            }
        }

        self.is_loading = false;
    }

    /// Sign in and load the profile
    pub async fn sign_in(
        &mut self,
        provider: &dyn AuthProvider,
        credentials: &Credentials,
    ) -> FoodResult<UserProfile> {
        credentials.validate()?;
        let session = provider.create_session(credentials).await?;
        info!("Session created for user {}", session.user_id);
        self.session = Some(session);

        self.fetch_authenticated_user(provider).await;
        self.user
            .clone()
            .ok_or_else(|| FoodError::Unauthorized("no profile for this account".to_string()))
    }

    /// Register, then sign in with the same credentials
    pub async fn sign_up(
        &mut self,
        provider: &dyn AuthProvider,
        account: &NewAccount,
    ) -> FoodResult<UserProfile> {
        account.validate()?;
        let profile = provider.create_account(account).await?;
        info!("Account created: {}", profile.account_id);

        let credentials = Credentials::new(account.email.clone(), account.password.clone());
        self.sign_in(provider, &credentials).await
    }

    /// End the session; local state is cleared even if the backend call fails
    pub async fn sign_out(&mut self, provider: &dyn AuthProvider) -> FoodResult<()> {
        let result = match self.session.as_ref() {
            Some(session) => provider.delete_session(session).await,
            None => Ok(()),
        };
        self.reset();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeAuth {
        reject_sessions: AtomicBool,
        fail: bool,
    }

    impl FakeAuth {
        fn new() -> Self {
            Self {
                reject_sessions: AtomicBool::new(false),
                fail: false,
            }
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: "doc-1".into(),
            account_id: "acc-1".into(),
            name: "Sam Lee".into(),
            email: "sam@example.com".into(),
            avatar: String::new(),
        }
    }

    #[async_trait]
    impl AuthProvider for FakeAuth {
        async fn create_account(&self, _account: &NewAccount) -> FoodResult<UserProfile> {
            Ok(profile())
        }

        async fn create_session(&self, credentials: &Credentials) -> FoodResult<Session> {
            if credentials.password != "hunter22" {
                return Err(FoodError::Unauthorized("Invalid credentials".into()));
            }
            Ok(Session {
                id: "sess-1".into(),
                user_id: "acc-1".into(),
                secret: "s3cret".into(),
                expires_at: None,
            })
        }

        async fn current_user(&self, _session: &Session) -> FoodResult<Option<UserProfile>> {
            if self.fail {
                return Err(FoodError::NetworkError("offline".into()));
            }
            if self.reject_sessions.load(Ordering::SeqCst) {
                return Ok(None);
            }
            Ok(Some(profile()))
        }

        async fn delete_session(&self, _session: &Session) -> FoodResult<()> {
            Ok(())
        }

        fn provider_name(&self) -> &'static str {
            "fake"
        }
    }

    #[tokio::test]
    async fn test_sign_in_sets_user() {
        let provider = FakeAuth::new();
        let mut state = AuthState::new();

        let user = state
            .sign_in(&provider, &Credentials::new("sam@example.com", "hunter22"))
            .await
            .unwrap();

        assert_eq!(user.name, "Sam Lee");
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert!(state.session.is_some());
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let provider = FakeAuth::new();
        let mut state = AuthState::new();

        let err = state
            .sign_in(&provider, &Credentials::new("sam@example.com", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, FoodError::Unauthorized(_)));
        assert!(!state.is_authenticated);

        let err = state
            .sign_in(&provider, &Credentials::new("not-an-email", "hunter22"))
            .await
            .unwrap_err();
        assert!(matches!(err, FoodError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_fetch_without_session_clears_state() {
        let provider = FakeAuth::new();
        let mut state = AuthState::new();
        state.set_user(profile());

        state.fetch_authenticated_user(&provider).await;

        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_rejected_session_clears_state() {
        let provider = FakeAuth::new();
        let mut state = AuthState::new();
        state
            .sign_in(&provider, &Credentials::new("sam@example.com", "hunter22"))
            .await
            .unwrap();

        provider.reject_sessions.store(true, Ordering::SeqCst);
        state.fetch_authenticated_user(&provider).await;

        assert!(!state.is_authenticated);
        assert!(state.session.is_none());
    }

    #[tokio::test]
    async fn test_backend_error_clears_state() {
        let provider = FakeAuth {
            reject_sessions: AtomicBool::new(false),
            fail: true,
        };
        let mut state = AuthState::new();
        state.session = Some(Session {
            id: "sess-1".into(),
            user_id: "acc-1".into(),
            secret: "s3cret".into(),
            expires_at: None,
        });

        state.fetch_authenticated_user(&provider).await;
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_out() {
        let provider = FakeAuth::new();
        let mut state = AuthState::new();
        let account = NewAccount {
            name: "Sam Lee".into(),
            email: "sam@example.com".into(),
            password: "hunter22".into(),
        };

        state.sign_up(&provider, &account).await.unwrap();
        assert!(state.is_authenticated);

        state.sign_out(&provider).await.unwrap();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[test]
    fn test_new_account_validation() {
        let account = NewAccount {
            name: " ".into(),
            email: "sam@example.com".into(),
            password: "x".into(),
        };
        assert!(account.validate().is_err());
    }

    #[test]
    fn test_session_expiry() {
        let expired = Session {
            id: "s".into(),
            user_id: "u".into(),
            secret: "x".into(),
            expires_at: Some(Utc::now() - chrono::Duration::hours(1)),
        };
        assert!(!expired.is_active());
    }
}
