// libs/booking-cell/src/services/booking.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookingConfirmation, BookingError,
    Patient,
};

pub struct BookingService {
    supabase: SupabaseClient,
    service_key: String,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            service_key: config.supabase_service_role_key.clone(),
        }
    }

    /// Create a patient row, then an appointment row referencing it, in that
    /// order. The two inserts are NOT atomic: if the appointment insert fails
    /// the patient row stays behind, and the caller only sees the generic
    /// `CreateFailed` either way.
    pub async fn create_booking(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        info!("Creating booking for professional {} (service {})",
              request.professional_id, request.service_id);

        let patient = self.insert_patient(&request).await?;
        let appointment = self.insert_appointment(&request, patient.id).await?;

        info!("Booking created: appointment {} for patient {}", appointment.id, patient.id);
        Ok(BookingConfirmation { appointment_id: appointment.id })
    }

    async fn insert_patient(&self, request: &BookAppointmentRequest) -> Result<Patient, BookingError> {
        let patient_data = json!({
            "user_id": request.professional_id,
            "full_name": request.patient_name,
            "phone": request.patient_phone,
            "email": request.patient_email,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/patients",
            Some(&self.service_key),
            Some(patient_data),
            Some(headers),
        ).await.map_err(|e| {
            warn!("Patient insert failed: {}", e);
            BookingError::CreateFailed
        })?;

        result.first()
            .and_then(|row| serde_json::from_value::<Patient>(row.clone()).ok())
            .ok_or(BookingError::CreateFailed)
    }

    async fn insert_appointment(
        &self,
        request: &BookAppointmentRequest,
        patient_id: Uuid,
    ) -> Result<Appointment, BookingError> {
        // Date and time arrive as caller-supplied strings and are concatenated
        // as-is; a malformed combination is handed to the gateway unvalidated.
        let appointment_datetime = format!("{}T{}:00", request.appointment_date, request.appointment_time);

        let appointment_data = json!({
            "user_id": request.professional_id,
            "patient_id": patient_id,
            "service_id": request.service_id,
            "appointment_datetime": appointment_datetime,
            "notes": request.notes,
            "status": AppointmentStatus::Scheduled.to_string(),
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            Some(&self.service_key),
            Some(appointment_data),
            Some(headers),
        ).await.map_err(|e| {
            warn!("Appointment insert failed: {}", e);
            BookingError::CreateFailed
        })?;

        result.first()
            .and_then(|row| serde_json::from_value::<Appointment>(row.clone()).ok())
            .ok_or(BookingError::CreateFailed)
    }
}
