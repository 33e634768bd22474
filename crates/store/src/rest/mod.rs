//! REST implementation of the store contracts against a hosted
//! Supabase-style backend: GoTrue auth under `/auth/v1`, PostgREST rows
//! under `/rest/v1`.

mod records;

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quiz_core::model::{Competency, CompetencyId, Profile, ProgressEntry, Question, UserId};

use crate::repository::{
    AuthClient, AuthError, CompetencyRepository, Identity, ProfileRepository, ProgressRepository,
    QuestionRepository, Store, StoreError,
};
use records::{CompetencyRecord, ProfileRecord, ProgressRecord, QuestionRecord, ScorePatch};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Connection settings for the hosted store.
#[derive(Clone, Debug)]
pub struct RestConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl RestConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            anon_key: anon_key.into(),
        }
    }
}

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

/// Store client speaking the hosted REST API.
///
/// Holds the access token of the signed-in user; anonymous requests fall
/// back to the project key.
#[derive(Clone)]
pub struct RestStore {
    http: Client,
    config: RestConfig,
    access_token: Arc<RwLock<Option<String>>>,
}

impl RestStore {
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Aggregate this client behind the shared `Store` handle.
    #[must_use]
    pub fn store(&self) -> Store {
        Store {
            auth: Arc::new(self.clone()),
            profiles: Arc::new(self.clone()),
            competencies: Arc::new(self.clone()),
            questions: Arc::new(self.clone()),
            progress: Arc::new(self.clone()),
        }
    }

    fn bearer(&self) -> String {
        self.access_token
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn remember_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.access_token.write() {
            *guard = token;
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url)
    }

    fn table_url(&self, table: &str, query: &str) -> String {
        format!("{}/rest/v1/{table}?{query}", self.config.base_url)
    }

    async fn fetch_rows<T>(&self, table: &str, query: &str) -> Result<Vec<T>, StoreError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(self.table_url(table, query))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(store_error_for_status(status));
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

fn store_error_for_status(status: StatusCode) -> StoreError {
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound,
        StatusCode::CONFLICT => StoreError::Conflict,
        other => StoreError::Connection(format!("unexpected status {other}")),
    }
}

//
// ─── AUTH WIRE TYPES ───────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
    user: Option<AuthUser>,
    // Bare-user payloads put the fields at the top level instead.
    id: Option<Uuid>,
    email: Option<String>,
}

impl SessionResponse {
    fn identity(self) -> Option<(Identity, Option<String>)> {
        let token = self.access_token;
        if let Some(user) = self.user {
            return Some((
                Identity {
                    user_id: UserId::new(user.id),
                    email: user.email.unwrap_or_default(),
                },
                token,
            ));
        }
        self.id.map(|id| {
            (
                Identity {
                    user_id: UserId::new(id),
                    email: self.email.unwrap_or_default(),
                },
                token,
            )
        })
    }
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(alias = "error_description", alias = "message")]
    msg: Option<String>,
}

async fn rejection_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<AuthErrorBody>().await {
        Ok(AuthErrorBody { msg: Some(msg) }) if !msg.is_empty() => msg,
        _ => format!("request rejected with status {status}"),
    }
}

//
// ─── AUTH CLIENT ───────────────────────────────────────────────────────────────
//

#[async_trait]
impl AuthClient for RestStore {
    async fn get_session(&self) -> Result<Option<Identity>, AuthError> {
        let has_token = self
            .access_token
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false);
        if !has_token {
            return Ok(None);
        }

        let response = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let user: AuthUser = response
                    .json()
                    .await
                    .map_err(|e| AuthError::Connection(e.to_string()))?;
                Ok(Some(Identity {
                    user_id: UserId::new(user.id),
                    email: user.email.unwrap_or_default(),
                }))
            }
            StatusCode::UNAUTHORIZED => {
                // Expired token: drop it and report no session.
                self.remember_token(None);
                Ok(None)
            }
            status => Err(AuthError::Connection(format!(
                "unexpected status {status}"
            ))),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let response = self
            .http
            .post(self.auth_url("token?grant_type=password"))
            .header("apikey", &self.config.anon_key)
            .json(&CredentialsRequest { email, password })
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Rejected(rejection_message(response).await));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        let (identity, token) = session
            .identity()
            .ok_or_else(|| AuthError::Connection("token response without a user".into()))?;
        self.remember_token(token);
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.config.anon_key)
            .json(&CredentialsRequest { email, password })
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = rejection_message(response).await;
            if message.to_lowercase().contains("already registered") {
                return Err(AuthError::DuplicateAccount);
            }
            return Err(AuthError::Rejected(message));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        let (identity, token) = session
            .identity()
            .ok_or_else(|| AuthError::Connection("signup response without a user".into()))?;
        self.remember_token(token);
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self.bearer();
        // Local session state is gone no matter what the backend says.
        self.remember_token(None);

        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "remote logout rejected");
        }
        Ok(())
    }
}

//
// ─── COLLECTION REPOSITORIES ───────────────────────────────────────────────────
//

#[async_trait]
impl ProfileRepository for RestStore {
    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, StoreError> {
        let query = format!("select=*&id=eq.{}&limit=1", id.value());
        let rows: Vec<ProfileRecord> = self.fetch_rows("profiles", &query).await?;
        rows.into_iter()
            .next()
            .map(|record| {
                record
                    .into_profile()
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.table_url("profiles", "select=id"))
            .header("apikey", &self.config.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer())
            .json(&ProfileRecord::from_profile(profile))
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(store_error_for_status(status))
        }
    }

    async fn update_score(&self, profile: &Profile) -> Result<(), StoreError> {
        let query = format!("id=eq.{}", profile.id().value());
        let response = self
            .http
            .patch(self.table_url("profiles", &query))
            .header("apikey", &self.config.anon_key)
            // Representation lets us distinguish "no row matched" from success.
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .json(&ScorePatch::from_profile(profile))
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(store_error_for_status(status));
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        if rows.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CompetencyRepository for RestStore {
    async fn list_competencies(&self) -> Result<Vec<Competency>, StoreError> {
        let rows: Vec<CompetencyRecord> =
            self.fetch_rows("competencies", "select=*&order=name.asc").await?;
        rows.into_iter()
            .map(|record| {
                record
                    .into_competency()
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl QuestionRepository for RestStore {
    async fn list_questions(
        &self,
        competency_id: CompetencyId,
    ) -> Result<Vec<Question>, StoreError> {
        let query = format!(
            "select=*&competency_id=eq.{}&order=level.asc",
            competency_id.value()
        );
        let rows: Vec<QuestionRecord> = self.fetch_rows("questions", &query).await?;
        rows.into_iter()
            .map(|record| {
                record
                    .into_question()
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl ProgressRepository for RestStore {
    async fn append_progress(&self, entry: &ProgressEntry) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.table_url("user_progress", "select=id"))
            .header("apikey", &self.config.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer())
            .json(&ProgressRecord::from_entry(entry))
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(store_error_for_status(status))
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_trims_trailing_slash() {
        let config = RestConfig::new("https://example.supabase.co/", "anon");
        assert_eq!(config.base_url, "https://example.supabase.co");
    }

    #[test]
    fn urls_compose_under_auth_and_rest_roots() {
        let store = RestStore::new(RestConfig::new("https://example.supabase.co", "anon"));
        assert_eq!(
            store.auth_url("signup"),
            "https://example.supabase.co/auth/v1/signup"
        );
        assert_eq!(
            store.table_url("questions", "select=*"),
            "https://example.supabase.co/rest/v1/questions?select=*"
        );
    }

    #[test]
    fn bearer_falls_back_to_anon_key() {
        let store = RestStore::new(RestConfig::new("https://example.supabase.co", "anon-key"));
        assert_eq!(store.bearer(), "anon-key");
        store.remember_token(Some("user-token".into()));
        assert_eq!(store.bearer(), "user-token");
    }

    #[test]
    fn session_response_handles_both_payload_shapes() {
        let nested: SessionResponse = serde_json::from_value(serde_json::json!({
            "access_token": "tok",
            "user": { "id": "8a5e7d90-0000-0000-0000-000000000001", "email": "a@b.c" }
        }))
        .unwrap();
        let (identity, token) = nested.identity().unwrap();
        assert_eq!(identity.email, "a@b.c");
        assert_eq!(token.as_deref(), Some("tok"));

        let bare: SessionResponse = serde_json::from_value(serde_json::json!({
            "id": "8a5e7d90-0000-0000-0000-000000000002",
            "email": "d@e.f"
        }))
        .unwrap();
        let (identity, token) = bare.identity().unwrap();
        assert_eq!(identity.email, "d@e.f");
        assert!(token.is_none());
    }

    #[test]
    fn status_mapping_covers_known_codes() {
        assert_eq!(
            store_error_for_status(StatusCode::NOT_FOUND),
            StoreError::NotFound
        );
        assert_eq!(
            store_error_for_status(StatusCode::CONFLICT),
            StoreError::Conflict
        );
        assert!(matches!(
            store_error_for_status(StatusCode::INTERNAL_SERVER_ERROR),
            StoreError::Connection(_)
        ));
    }
}
