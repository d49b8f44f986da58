// libs/booking-cell/src/services/catalog.rs
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{BookingError, Service};

pub struct CatalogService {
    supabase: SupabaseClient,
    service_key: String,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            service_key: config.supabase_service_role_key.clone(),
        }
    }

    /// Services a professional exposes on their public booking page.
    pub async fn list_bookable_services(
        &self,
        professional_id: &str,
    ) -> Result<Vec<Service>, BookingError> {
        debug!("Listing bookable services for professional {}", professional_id);

        let path = format!(
            "/rest/v1/services?user_id=eq.{}&auto_agenda_enabled=eq.true&order=name.asc",
            urlencoding::encode(professional_id)
        );

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(&self.service_key),
            None,
        ).await.map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        let services: Vec<Service> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Service>, _>>()
            .map_err(|e| BookingError::DatabaseError(format!("Failed to parse services: {}", e)))?;

        Ok(services)
    }
}
