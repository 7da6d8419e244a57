//! # Auth context
//!
//! The bearer token is the only process-wide state. It is set on login, read
//! by every outgoing request and never expired by the console itself.

use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::error::{Result, ValidationError};
use crate::models::{Credentials, Token};
use crate::traits::{AdminApi, TokenStore};

pub struct AuthContext {
    store: Arc<dyn TokenStore>,
    token: RwLock<Option<Token>>,
}

impl AuthContext {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store, token: RwLock::new(None) }
    }

    /// Loads a previously persisted token. Returns whether one was found.
    pub async fn restore(&self) -> Result<bool> {
        let token = self.store.load().await?;
        let found = token.is_some();
        self.set(token);
        Ok(found)
    }

    pub fn token(&self) -> Option<Token> {
        self.token.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub async fn login(&self, api: &dyn AdminApi, credentials: &Credentials) -> Result<()> {
        if credentials.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }
        if credentials.password.expose_secret().is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }
        let token = api.login(credentials).await?;
        self.store.save(&token).await?;
        self.set(Some(token));
        log::info!("operator {} logged in", credentials.email);
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.store.clear().await?;
        self.set(None);
        log::info!("operator logged out");
        Ok(())
    }

    fn set(&self, token: Option<Token>) {
        *self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }
}

/// Outcome of gating an authenticated screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow(Token),
    RedirectToLogin,
}

pub struct RouteGuard;

impl RouteGuard {
    pub const LOGIN_PATH: &'static str = "/login";

    pub fn check(auth: &AuthContext) -> GuardOutcome {
        match auth.token() {
            Some(token) => GuardOutcome::Allow(token),
            None => GuardOutcome::RedirectToLogin,
        }
    }
}

/// Non-persistent store; the token is lost on restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Token>>,
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<Token>> {
        Ok(self.token.lock().unwrap_or_else(|p| p.into_inner()).clone())
    }

    async fn save(&self, token: &Token) -> Result<()> {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::traits::MockAdminApi;
    use secrecy::SecretString;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials { email: email.into(), password: SecretString::from(password.to_string()) }
    }

    #[tokio::test]
    async fn login_persists_and_guard_allows() {
        let store = Arc::new(MemoryTokenStore::default());
        let auth = AuthContext::new(store.clone());
        assert_eq!(RouteGuard::check(&auth), GuardOutcome::RedirectToLogin);

        let mut api = MockAdminApi::new();
        api.expect_login()
            .withf(|c| c.email == "admin@dittotrip.site" && c.password.expose_secret() == "pw")
            .times(1)
            .returning(|_| Ok(Token::parse("abc").unwrap()));

        auth.login(&api, &credentials("admin@dittotrip.site", "pw")).await.unwrap();
        assert_eq!(RouteGuard::check(&auth), GuardOutcome::Allow(Token::parse("abc").unwrap()));
        assert_eq!(store.load().await.unwrap().unwrap().as_str(), "abc");

        // A fresh context over the same store picks the token back up.
        let restored = AuthContext::new(store);
        assert!(restored.restore().await.unwrap());
        assert!(restored.is_authenticated());
    }

    #[tokio::test]
    async fn failed_login_keeps_logged_out() {
        let auth = AuthContext::new(Arc::new(MemoryTokenStore::default()));
        let mut api = MockAdminApi::new();
        api.expect_login()
            .returning(|_| Err(AppError::Unauthorized("bad credentials".into())));

        let err = auth.login(&api, &credentials("a@b.c", "wrong")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(auth.token().is_none());
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_request() {
        let auth = AuthContext::new(Arc::new(MemoryTokenStore::default()));
        let api = MockAdminApi::new();
        let err = auth.login(&api, &credentials(" ", "pw")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::MissingField("email"))));
    }

    #[tokio::test]
    async fn logout_clears_store_and_cache() {
        let store = Arc::new(MemoryTokenStore::default());
        store.save(&Token::parse("t").unwrap()).await.unwrap();
        let auth = AuthContext::new(store.clone());
        auth.restore().await.unwrap();

        auth.logout().await.unwrap();
        assert!(!auth.is_authenticated());
        assert!(store.load().await.unwrap().is_none());
    }
}
