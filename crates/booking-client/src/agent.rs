//! Typed client for the booking service
//!
//! `BookingAgent` wraps the REST transport with one method per endpoint
//! the app consumes, plus management of the bearer credential. It holds
//! no session state of its own; the session manager owns that and tells
//! the agent which credential to use.

use crate::rest::{RestClient, RestClientConfig, RestError, RestRequest};
use crate::types::{
    Appointment, AvailabilitySlot, CreateAppointmentRequest, ProfileUpdateRequest, Provider,
    RegisterRequest, SessionRequest, SessionResponse, User,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Idempotent GET endpoints retry transient failures this many times.
const READ_RETRIES: usize = 2;

/// Agent error types
#[derive(Debug, Error)]
pub enum AgentError {
    /// Transport or service error
    #[error("Request failed: {0}")]
    Rest(#[from] RestError),

    /// The session endpoint rejected the credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Client-side failure building or encoding a request
    #[error("Service error: {0}")]
    Service(String),
}

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Typed API surface over the booking service
///
/// # Examples
/// ```no_run
/// use booking_client::agent::BookingAgent;
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let agent = BookingAgent::new("https://api.clipbook.app");
///
///     let session = agent.create_session("a@b.com", "secret").await?;
///     agent.set_credential(Some(&session.token));
///
///     let providers = agent.list_providers().await?;
///     println!("{} providers", providers.len());
///     Ok(())
/// }
/// ```
pub struct BookingAgent {
    client: RestClient,
}

impl BookingAgent {
    /// Create an agent for the given service URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(RestClientConfig::new(base_url))
    }

    /// Create an agent with a custom client configuration
    pub fn with_config(config: RestClientConfig) -> Self {
        Self {
            client: RestClient::new(config),
        }
    }

    /// Get the service base URL
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Replace the bearer credential on the underlying client
    ///
    /// Every writer replaces the value wholesale; requests read it at
    /// call time.
    pub fn set_credential(&self, token: Option<&str>) {
        self.client.set_bearer_token(token);
    }

    /// Get the current bearer credential, if any
    pub fn credential(&self) -> Option<String> {
        self.client.bearer_token()
    }

    /// Whether a credential is currently set
    pub fn has_credential(&self) -> bool {
        self.client.bearer_token().is_some()
    }

    /// Authenticate against the session endpoint
    ///
    /// # Arguments
    ///
    /// * `email` - Account email
    /// * `password` - Account password
    ///
    /// # Errors
    ///
    /// - `AgentError::InvalidCredentials` - The service rejected the pair
    /// - `AgentError::Rest` - Transport failure or other service error
    ///
    /// The credential slot is not touched here; callers decide whether a
    /// returned token becomes current.
    pub async fn create_session(&self, email: &str, password: &str) -> Result<SessionResponse> {
        let request = SessionRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let rest_request = RestRequest::post("sessions")
            .json_body(&request)
            .map_err(|e| AgentError::Service(e.to_string()))?;

        match self.client.execute::<SessionResponse>(rest_request).await {
            Ok(response) => Ok(response.data),
            Err(e) if e.status() == 401 => Err(AgentError::InvalidCredentials),
            Err(e) => Err(AgentError::Rest(e)),
        }
    }

    /// Create a new account
    ///
    /// Registration does not authenticate; the caller signs in
    /// afterwards with the same credentials.
    pub async fn register_account(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let rest_request = RestRequest::post("users")
            .json_body(&request)
            .map_err(|e| AgentError::Service(e.to_string()))?;

        let response = self.client.execute::<User>(rest_request).await?;
        Ok(response.data)
    }

    /// List all bookable providers
    pub async fn list_providers(&self) -> Result<Vec<Provider>> {
        let request = RestRequest::get("providers");
        let response = self
            .client
            .execute_with_retry::<Vec<Provider>>(request, READ_RETRIES)
            .await?;
        Ok(response.data)
    }

    /// Fetch a provider's availability for one calendar day
    ///
    /// `month` is 1-indexed, matching the service's query contract.
    pub async fn day_availability(
        &self,
        provider_id: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<Vec<AvailabilitySlot>> {
        let request = RestRequest::get(format!("providers/{}/day-availability", provider_id))
            .param("year", year.to_string())
            .param("month", month.to_string())
            .param("day", day.to_string());

        let response = self
            .client
            .execute_with_retry::<Vec<AvailabilitySlot>>(request, READ_RETRIES)
            .await?;
        Ok(response.data)
    }

    /// Book an appointment with a provider
    ///
    /// Never retried automatically; the server is the arbiter of slot
    /// conflicts and a duplicate submission would double-book.
    pub async fn create_appointment(
        &self,
        provider_id: &str,
        date: DateTime<Utc>,
    ) -> Result<Appointment> {
        let request = CreateAppointmentRequest {
            provider_id: provider_id.to_string(),
            date,
        };

        let rest_request = RestRequest::post("appointments")
            .json_body(&request)
            .map_err(|e| AgentError::Service(e.to_string()))?;

        let response = self.client.execute::<Appointment>(rest_request).await?;
        Ok(response.data)
    }

    /// Update the authenticated user's profile
    pub async fn update_profile(&self, update: &ProfileUpdateRequest) -> Result<User> {
        let rest_request = RestRequest::put("profile")
            .json_body(update)
            .map_err(|e| AgentError::Service(e.to_string()))?;

        let response = self.client.execute::<User>(rest_request).await?;
        Ok(response.data)
    }
}
