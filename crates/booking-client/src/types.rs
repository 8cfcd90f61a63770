//! Wire types for the Clipbook API
//!
//! These structs mirror the JSON bodies the booking service sends and
//! receives. Field names match the wire format directly, so no rename
//! attributes are needed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user of the app
///
/// Persisted as a single JSON value under the session user key, and
/// returned by the session, registration, and profile endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Avatar URL; empty when the user has not uploaded one
    #[serde(default)]
    pub avatar_url: String,
}

/// A bookable service professional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Stable provider identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Avatar URL; empty when the provider has not uploaded one
    #[serde(default)]
    pub avatar_url: String,
}

/// One bookable hour in a provider's day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    /// Hour of the day
    pub hour: u32,
    /// Whether the hour is still open
    pub available: bool,
}

/// A created appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Appointment identifier
    pub id: String,
    /// Provider the appointment is with
    pub provider_id: String,
    /// User who booked it, when the server includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Start of the appointment
    pub date: DateTime<Utc>,
}

/// Credentials sent to the session endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Response from the session endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionResponse {
    /// Opaque bearer token; never parsed client-side
    pub token: String,
    /// The authenticated user
    pub user: User,
}

/// Body for the registration endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Body for the profile update endpoint
///
/// The password block is only serialized when a password change was
/// requested; a plain name/email update omits all three fields.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdateRequest {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Current password, required when changing the password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    /// New password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// New password repeated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

/// Body for the appointment creation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CreateAppointmentRequest {
    /// Provider to book with
    pub provider_id: String,
    /// Appointment start
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_avatar_url_defaults_to_empty() {
        let json = r#"{"id":"1","name":"Ana","email":"a@b.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.avatar_url, "");
    }

    #[test]
    fn test_session_response_deserializes() {
        let json = r#"{
            "token": "abc",
            "user": {"id":"1","name":"Ana","email":"a@b.com","avatar_url":""}
        }"#;

        let response: SessionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.user.name, "Ana");
        assert_eq!(response.user.avatar_url, "");
    }

    #[test]
    fn test_availability_slot_list() {
        let json = r#"[{"hour":8,"available":true},{"hour":9,"available":false}]"#;
        let slots: Vec<AvailabilitySlot> = serde_json::from_str(json).unwrap();

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].hour, 8);
        assert!(slots[0].available);
        assert!(!slots[1].available);
    }

    #[test]
    fn test_create_appointment_request_shape() {
        let request = CreateAppointmentRequest {
            provider_id: "2".to_string(),
            date: Utc.with_ymd_and_hms(2026, 3, 10, 13, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["provider_id"], "2");
        assert_eq!(json["date"], "2026-03-10T13:00:00Z");
    }

    #[test]
    fn test_profile_update_omits_absent_password_block() {
        let request = ProfileUpdateRequest {
            name: "Ana".to_string(),
            email: "a@b.com".to_string(),
            old_password: None,
            password: None,
            password_confirmation: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(!object.contains_key("old_password"));
    }

    #[test]
    fn test_profile_update_includes_password_block() {
        let request = ProfileUpdateRequest {
            name: "Ana".to_string(),
            email: "a@b.com".to_string(),
            old_password: Some("old".to_string()),
            password: Some("newpass".to_string()),
            password_confirmation: Some("newpass".to_string()),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["old_password"], "old");
        assert_eq!(json["password"], "newpass");
        assert_eq!(json["password_confirmation"], "newpass");
    }

    #[test]
    fn test_appointment_accepts_missing_user_id() {
        let json = r#"{"id":"a1","provider_id":"2","date":"2026-03-10T13:00:00Z"}"#;
        let appointment: Appointment = serde_json::from_str(json).unwrap();

        assert_eq!(appointment.user_id, None);
        assert_eq!(appointment.date.timestamp(), 1773147600);
    }
}
