//! # Appwrite Accounts
//!
//! Sign-up, sign-in and profile lookup.
//!
//! A user is two records: the Appwrite account (credentials) and a profile
//! document in the users collection linked through `accountid`.

use crate::client::{query, unique_id, AppwriteClient, ApiResponse, DocumentList, PROVIDER};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use food_core::{AuthProvider, Credentials, FoodError, FoodResult, NewAccount, Session, UserProfile};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Auth provider backed by the Appwrite Account API
#[derive(Debug, Clone)]
pub struct AppwriteAuth {
    client: AppwriteClient,
}

impl AppwriteAuth {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn users_path(&self) -> String {
        let config = self.client.config();
        config.documents_path(&config.user_collection_id)
    }

    /// Initials avatar for a new profile
    pub fn initials_avatar_url(&self, name: &str) -> String {
        let config = self.client.config();
        match Url::parse(&config.url("/avatars/initials")) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("name", name)
                    .append_pair("project", &config.project_id);
                url.to_string()
            }
            Err(_) => String::new(),
        }
    }

    /// Session token from the response body, or from the fallback cookie
    /// header when the body omits it (client-side requests)
    fn session_secret(&self, body_secret: &str, response: &ApiResponse) -> Option<String> {
        if !body_secret.is_empty() {
            return Some(body_secret.to_string());
        }

        let cookie_name = format!("a_session_{}", self.client.config().project_id);
        response
            .headers
            .get("X-Fallback-Cookies")
            .and_then(|v| v.to_str().ok())
            .and_then(|raw| serde_json::from_str::<HashMap<String, String>>(raw).ok())
            .and_then(|cookies| cookies.get(&cookie_name).cloned())
    }

    async fn profile_for_account(&self, account_id: &str, secret: Option<&str>) -> FoodResult<Option<UserProfile>> {
        let request = self
            .client
            .request(Method::GET, &self.users_path(), secret)
            .query(&[("queries[]", query::equal("accountid", account_id))]);
        let list: DocumentList<UserDocument> = self.client.send_json(request).await?;

        Ok(list.documents.into_iter().next().map(UserProfile::from))
    }
}

#[async_trait]
impl AuthProvider for AppwriteAuth {
    #[instrument(skip(self, account), fields(email = %account.email))]
    async fn create_account(&self, account: &NewAccount) -> FoodResult<UserProfile> {
        let request = self.client.request(Method::POST, "/account", None).json(&json!({
            "userId": unique_id(),
            "email": account.email,
            "password": account.password,
            "name": account.name,
        }));
        let created: AccountResponse = self.client.send_json(request).await?;
        info!("Created Appwrite account: id={}", created.id);

        let request = self
            .client
            .request(Method::POST, &self.users_path(), None)
            .json(&json!({
                "documentId": unique_id(),
                "data": {
                    "email": account.email,
                    "name": account.name,
                    "accountid": created.id,
                    "avatar": self.initials_avatar_url(&account.name),
                }
            }));
        let profile: UserDocument = self.client.send_json(request).await?;

        Ok(profile.into())
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn create_session(&self, credentials: &Credentials) -> FoodResult<Session> {
        let request = self
            .client
            .request(Method::POST, "/account/sessions/email", None)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }));
        let response = self.client.execute(request).await?;
        response.ensure_success()?;

        let session: SessionResponse = serde_json::from_str(&response.body).map_err(|e| {
            FoodError::Serialization(format!("Failed to parse Appwrite session: {}", e))
        })?;

        let secret = self
            .session_secret(&session.secret, &response)
            .ok_or_else(|| FoodError::ProviderError {
                provider: PROVIDER.to_string(),
                message: "session created without a token".to_string(),
            })?;

        Ok(Session {
            id: session.id,
            user_id: session.user_id,
            secret,
            expires_at: session.expire,
        })
    }

    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn current_user(&self, session: &Session) -> FoodResult<Option<UserProfile>> {
        let request = self
            .client
            .request(Method::GET, "/account", Some(&session.secret));
        let response = self.client.execute(request).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let account: AccountResponse = response.json()?;

        let profile = self
            .profile_for_account(&account.id, Some(&session.secret))
            .await?;
        if profile.is_none() {
            warn!("No profile document for account {}", account.id);
        }
        Ok(profile)
    }

    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn delete_session(&self, session: &Session) -> FoodResult<()> {
        let request = self.client.request(
            Method::DELETE,
            "/account/sessions/current",
            Some(&session.secret),
        );
        let response = self.client.execute(request).await?;

        // An already-expired session is as good as deleted
        if response.status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        response.ensure_success()
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Appwrite API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(rename = "$id")]
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    #[serde(rename = "$id")]
    id: String,
    user_id: String,
    #[serde(default)]
    secret: String,
    #[serde(default)]
    expire: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct UserDocument {
    #[serde(rename = "$id")]
    id: String,
    accountid: String,
    name: String,
    email: String,
    #[serde(default)]
    avatar: String,
}

impl From<UserDocument> for UserProfile {
    fn from(doc: UserDocument) -> Self {
        UserProfile {
            id: doc.id,
            account_id: doc.accountid,
            name: doc.name,
            email: doc.email,
            avatar: doc.avatar,
        }
    }
}
