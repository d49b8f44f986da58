// libs/calendar-cell/src/services/oauth.rs
use reqwest::{Client, Method};
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CalendarError, GoogleTokenResponse};

const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Google OAuth2 authorization-code flow for calendar read access. Offline
/// access with forced consent so a refresh token is issued every time.
pub struct GoogleOAuthService {
    http: Client,
    supabase: SupabaseClient,
    service_key: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_base_url: String,
    token_url: String,
    configured: bool,
}

impl GoogleOAuthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            supabase: SupabaseClient::new(config),
            service_key: config.supabase_service_role_key.clone(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri.clone(),
            auth_base_url: config.google_auth_base_url.clone(),
            token_url: config.google_token_url.clone(),
            configured: config.is_calendar_configured(),
        }
    }

    /// Authorization URL the professional is redirected to. The `state`
    /// parameter carries the initiating user and where to land afterwards,
    /// since Google calls back without a session.
    pub fn authorization_url(&self, user_id: &str, redirect_url: &str) -> Result<String, CalendarError> {
        if !self.configured {
            return Err(CalendarError::NotConfigured);
        }

        let state = format!("{}|{}", user_id, redirect_url);

        let url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent&state={}",
            self.auth_base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(CALENDAR_READONLY_SCOPE),
            urlencoding::encode(&state),
        );

        debug!("Built authorization URL for user {}", user_id);
        Ok(url)
    }

    /// Recover `(user_id, redirect_url)` from the state echoed by Google.
    pub fn parse_state(state: &str) -> Option<(String, String)> {
        state.split_once('|')
            .map(|(user_id, redirect_url)| (user_id.to_string(), redirect_url.to_string()))
    }

    /// Exchange the authorization code for tokens and keep the refresh token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, CalendarError> {
        if !self.configured {
            return Err(CalendarError::NotConfigured);
        }

        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| CalendarError::TokenExchangeFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CalendarError::TokenExchangeFailed(format!("{}: {}", status, body)));
        }

        let tokens: GoogleTokenResponse = response.json().await
            .map_err(|e| CalendarError::TokenExchangeFailed(e.to_string()))?;

        tokens.refresh_token
            .ok_or_else(|| CalendarError::TokenExchangeFailed("No refresh token in response".to_string()))
    }

    /// Upsert the refresh token, replacing whatever the user had stored.
    pub async fn store_refresh_token(
        &self,
        user_id: &str,
        refresh_token: &str,
    ) -> Result<(), CalendarError> {
        let token_data = json!({
            "user_id": user_id,
            "refresh_token": refresh_token
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("resolution=merge-duplicates,return=representation"),
        );

        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/gcal_tokens",
            Some(&self.service_key),
            Some(token_data),
            Some(headers),
        ).await.map_err(|e| CalendarError::DatabaseError(e.to_string()))?;

        info!("Stored calendar refresh token for user {}", user_id);
        Ok(())
    }
}
