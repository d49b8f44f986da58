// libs/calendar-cell/src/services/events.rs
use chrono::Utc;
use reqwest::{Client, Method};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    CalendarError, CalendarEvent, CalendarToken, GoogleEventsResponse, GoogleTokenResponse,
};

const MAX_EVENTS: u32 = 50;

pub struct CalendarEventsService {
    http: Client,
    supabase: SupabaseClient,
    service_key: String,
    client_id: String,
    client_secret: String,
    token_url: String,
    calendar_base_url: String,
}

impl CalendarEventsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            supabase: SupabaseClient::new(config),
            service_key: config.supabase_service_role_key.clone(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            token_url: config.google_token_url.clone(),
            calendar_base_url: config.google_calendar_base_url.clone(),
        }
    }

    /// Upcoming events for the dashboard widget. Best-effort: every failure
    /// mode (no stored token, exchange failure, provider error) degrades to
    /// an empty list so the caller never sees an error status.
    pub async fn upcoming_events(&self, user_id: &str) -> Vec<CalendarEvent> {
        match self.fetch_upcoming_events(user_id).await {
            Ok(events) => events,
            Err(e) => {
                warn!("Calendar events unavailable for user {}: {}", user_id, e);
                Vec::new()
            }
        }
    }

    async fn fetch_upcoming_events(&self, user_id: &str) -> Result<Vec<CalendarEvent>, CalendarError> {
        let refresh_token = self.load_refresh_token(user_id).await?;
        let access_token = self.exchange_refresh_token(&refresh_token).await?;
        self.list_events(&access_token).await
    }

    async fn load_refresh_token(&self, user_id: &str) -> Result<String, CalendarError> {
        let path = format!(
            "/rest/v1/gcal_tokens?user_id=eq.{}",
            urlencoding::encode(user_id)
        );

        let result: Vec<CalendarToken> = self.supabase.request(
            Method::GET,
            &path,
            Some(&self.service_key),
            None,
        ).await.map_err(|e| CalendarError::DatabaseError(e.to_string()))?;

        result.into_iter().next()
            .map(|token| token.refresh_token)
            .ok_or(CalendarError::NotConnected)
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<String, CalendarError> {
        let params = [
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
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

        tokens.access_token
            .ok_or_else(|| CalendarError::TokenExchangeFailed("No access token in response".to_string()))
    }

    async fn list_events(&self, access_token: &str) -> Result<Vec<CalendarEvent>, CalendarError> {
        let time_min = Utc::now().to_rfc3339();
        let url = format!(
            "{}/calendars/primary/events?maxResults={}&singleEvents=true&orderBy=startTime&timeMin={}",
            self.calendar_base_url,
            MAX_EVENTS,
            urlencoding::encode(&time_min),
        );

        debug!("Fetching upcoming calendar events");

        let response = self.http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| CalendarError::ProviderError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CalendarError::ProviderError(format!("{}: {}", status, body)));
        }

        let events: GoogleEventsResponse = response.json().await
            .map_err(|e| CalendarError::ProviderError(format!("Failed to parse events: {}", e)))?;

        Ok(events.items)
    }
}
