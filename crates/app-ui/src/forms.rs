//! Form state for the authentication and profile screens.
//!
//! Each screen that collects text input owns one of these form structs. A
//! submit first runs [`validate`](SignInForm::validate), which stores the
//! per-field messages from `app_core::validation` directly on the fields so
//! the screen can render an error border and message under each input.

use app_core::validation::{
    validate_profile, validate_sign_in, validate_sign_up, ValidationErrors,
};
use booking_client::User;
use serde::{Deserialize, Serialize};

use crate::theme::InputState;

// =============================================================================
// Form Fields
// =============================================================================

/// A single text field with its current value and validation error
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormField {
    /// Current text value
    #[serde(default)]
    pub value: String,
    /// Message from the last rejected submit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FormField {
    /// Create a field holding a value
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            error: None,
        }
    }

    /// Replace the value, clearing any stale error
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.error = None;
    }

    /// Whether the field holds any text
    pub fn is_filled(&self) -> bool {
        !self.value.is_empty()
    }

    /// Map the field to a visual input state.
    ///
    /// Focus wins over an error so the user sees the accent border while
    /// correcting the field.
    pub fn input_state(&self, focused: bool) -> InputState {
        if focused {
            InputState::Focused
        } else if self.error.is_some() {
            InputState::Errored
        } else {
            InputState::Idle
        }
    }
}

// =============================================================================
// Sign In Form
// =============================================================================

/// Credential form for the sign-in screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignInForm {
    /// Email address
    pub email: FormField,
    /// Password
    pub password: FormField,
}

impl SignInForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the form, storing per-field messages on failure
    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        self.clear_errors();
        if let Err(errors) = validate_sign_in(&self.email.value, &self.password.value) {
            self.email.error = errors.message_for("email").map(str::to_string);
            self.password.error = errors.message_for("password").map(str::to_string);
            return Err(errors);
        }
        Ok(())
    }

    /// Clear all field errors
    pub fn clear_errors(&mut self) {
        self.email.error = None;
        self.password.error = None;
    }
}

// =============================================================================
// Sign Up Form
// =============================================================================

/// Registration form for the sign-up screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignUpForm {
    /// Display name
    pub name: FormField,
    /// Email address
    pub email: FormField,
    /// Password
    pub password: FormField,
}

impl SignUpForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the form, storing per-field messages on failure
    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        self.clear_errors();
        if let Err(errors) =
            validate_sign_up(&self.name.value, &self.email.value, &self.password.value)
        {
            self.name.error = errors.message_for("name").map(str::to_string);
            self.email.error = errors.message_for("email").map(str::to_string);
            self.password.error = errors.message_for("password").map(str::to_string);
            return Err(errors);
        }
        Ok(())
    }

    /// Clear all field errors
    pub fn clear_errors(&mut self) {
        self.name.error = None;
        self.email.error = None;
        self.password.error = None;
    }
}

// =============================================================================
// Profile Form
// =============================================================================

/// Profile editing form.
///
/// The password fields stay empty unless the user is changing their
/// password; filling any one of them brings all three under validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    /// Display name
    pub name: FormField,
    /// Email address
    pub email: FormField,
    /// Current password
    pub old_password: FormField,
    /// New password
    pub password: FormField,
    /// New password confirmation
    pub password_confirmation: FormField,
}

impl ProfileForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a form pre-filled with the user's current profile
    pub fn for_user(user: &User) -> Self {
        Self {
            name: FormField::with_value(&user.name),
            email: FormField::with_value(&user.email),
            ..Self::default()
        }
    }

    /// Whether the user has started a password change
    pub fn is_changing_password(&self) -> bool {
        self.old_password.is_filled()
            || self.password.is_filled()
            || self.password_confirmation.is_filled()
    }

    /// Validate the form, storing per-field messages on failure
    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        self.clear_errors();
        if let Err(errors) = validate_profile(
            &self.name.value,
            &self.email.value,
            &self.old_password.value,
            &self.password.value,
            &self.password_confirmation.value,
        ) {
            self.name.error = errors.message_for("name").map(str::to_string);
            self.email.error = errors.message_for("email").map(str::to_string);
            self.old_password.error = errors.message_for("old_password").map(str::to_string);
            self.password.error = errors.message_for("password").map(str::to_string);
            self.password_confirmation.error = errors
                .message_for("password_confirmation")
                .map(str::to_string);
            return Err(errors);
        }
        Ok(())
    }

    /// Clear all field errors
    pub fn clear_errors(&mut self) {
        self.name.error = None;
        self.email.error = None;
        self.old_password.error = None;
        self.password.error = None;
        self.password_confirmation.error = None;
    }
}
