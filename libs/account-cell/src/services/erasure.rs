// libs/account-cell/src/services/erasure.rs
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::AccountError;

pub struct AccountErasureService {
    supabase: SupabaseClient,
    service_key: String,
}

impl AccountErasureService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            service_key: config.supabase_service_role_key.clone(),
        }
    }

    /// Erase everything the user owns, then the authentication identity.
    ///
    /// The seven dependent deletions are dispatched together and jointly
    /// awaited; individual failures are logged and do not stop the identity
    /// deletion, so partial erasure is possible. Erasing an account with no
    /// data succeeds the same way.
    pub async fn erase_account(&self, user: &User) -> Result<(), AccountError> {
        info!("Erasing account data for user {}", user.id);

        let uid = urlencoding::encode(&user.id).into_owned();
        let key = Some(self.service_key.as_str());

        let gcal_tokens_path = format!("/rest/v1/gcal_tokens?user_id=eq.{}", uid);
        let appointments_path = format!("/rest/v1/appointments?user_id=eq.{}", uid);
        let patients_path = format!("/rest/v1/patients?user_id=eq.{}", uid);
        let services_path = format!("/rest/v1/services?user_id=eq.{}", uid);
        let whatsapp_messages_path =
            format!("/rest/v1/whatsapp_messages?or=(profile_id.eq.{},recipient_id.eq.{})", uid, uid);
        let user_integrations_path = format!("/rest/v1/user_integrations?user_id=eq.{}", uid);
        let profiles_path = format!("/rest/v1/profiles?id=eq.{}", uid);

        let results = tokio::join!(
            self.supabase.delete(&gcal_tokens_path, key),
            self.supabase.delete(&appointments_path, key),
            self.supabase.delete(&patients_path, key),
            self.supabase.delete(&services_path, key),
            self.supabase.delete(&whatsapp_messages_path, key),
            self.supabase.delete(&user_integrations_path, key),
            self.supabase.delete(&profiles_path, key),
        );

        let tables = [
            "gcal_tokens", "appointments", "patients", "services",
            "whatsapp_messages", "user_integrations", "profiles",
        ];
        let outcomes = [
            &results.0, &results.1, &results.2, &results.3,
            &results.4, &results.5, &results.6,
        ];
        for (table, outcome) in tables.iter().zip(outcomes) {
            if let Err(e) = outcome {
                warn!("Deletion from {} failed for user {}: {}", table, user.id, e);
            }
        }

        self.delete_identity(&user.id).await?;

        info!("Account {} erased", user.id);
        Ok(())
    }

    async fn delete_identity(&self, user_id: &str) -> Result<(), AccountError> {
        let path = format!("/auth/v1/admin/users/{}", user_id);

        self.supabase.delete(&path, Some(&self.service_key)).await
            .map_err(|e| AccountError::IdentityDeletionFailed(e.to_string()))
    }
}
