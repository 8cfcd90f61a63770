//! Provider listing and appointment creation

use booking_client::agent::{AgentError, BookingAgent};
use booking_client::types::{Appointment, Provider};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Booking error types
#[derive(Debug, Error)]
pub enum BookingError {
    /// Agent error
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),
}

impl BookingError {
    /// Message the screens show when appointment creation fails
    pub fn user_message(&self) -> &'static str {
        "An error occurred while creating the appointment, please try again"
    }
}

/// Result type for booking operations
pub type Result<T> = std::result::Result<T, BookingError>;

/// Booking service for the dashboard and appointment screens
pub struct BookingService {
    agent: Arc<BookingAgent>,
}

impl BookingService {
    /// Create a booking service over the given agent
    pub fn new(agent: Arc<BookingAgent>) -> Self {
        Self { agent }
    }

    /// List the providers a user can book with
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Agent` when the listing cannot be
    /// fetched; the screen decides how to surface it.
    pub async fn list_providers(&self) -> Result<Vec<Provider>> {
        let providers = self.agent.list_providers().await?;
        tracing::debug!(count = providers.len(), "providers listed");
        Ok(providers)
    }

    /// Book an appointment starting at the given instant
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Agent` when the service rejects the
    /// submission. The submission is never repeated automatically.
    pub async fn create_appointment(
        &self,
        provider_id: &str,
        start: DateTime<Utc>,
    ) -> Result<Appointment> {
        let appointment = self.agent.create_appointment(provider_id, start).await?;
        tracing::info!(
            appointment = %appointment.id,
            provider = provider_id,
            "appointment created"
        );
        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(url: &str) -> BookingService {
        BookingService::new(Arc::new(BookingAgent::new(url)))
    }

    #[tokio::test]
    async fn test_list_providers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": "2", "name": "Bruno" }
            ])))
            .mount(&server)
            .await;

        let providers = service(&server.uri()).list_providers().await.unwrap();

        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name, "Bruno");
    }

    #[tokio::test]
    async fn test_list_providers_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/providers"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "status": "error",
                "message": "Bad request"
            })))
            .mount(&server)
            .await;

        let result = service(&server.uri()).list_providers().await;

        assert!(matches!(result, Err(BookingError::Agent(_))));
    }

    #[tokio::test]
    async fn test_create_appointment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/appointments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "ap-1",
                "provider_id": "2",
                "date": "2026-03-10T13:00:00Z"
            })))
            .mount(&server)
            .await;

        let start = Utc.with_ymd_and_hms(2026, 3, 10, 13, 0, 0).unwrap();
        let appointment = service(&server.uri())
            .create_appointment("2", start)
            .await
            .unwrap();

        assert_eq!(appointment.id, "ap-1");
        assert_eq!(appointment.date, start);
    }

    #[tokio::test]
    async fn test_creation_failure_has_a_user_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/appointments"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "status": "error",
                "message": "This appointment is already booked"
            })))
            .mount(&server)
            .await;

        let start = Utc.with_ymd_and_hms(2026, 3, 10, 13, 0, 0).unwrap();
        let error = service(&server.uri())
            .create_appointment("2", start)
            .await
            .unwrap_err();

        assert_eq!(
            error.user_message(),
            "An error occurred while creating the appointment, please try again"
        );
    }
}
