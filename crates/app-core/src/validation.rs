//! Form validation for the sign-in, sign-up, and profile screens
//!
//! Validators check every rule and report all failures together, so a
//! form can mark each offending field in one pass instead of stopping
//! at the first problem.

use regex::Regex;
use std::sync::OnceLock;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// A single failed rule, tied to the form field it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name, e.g. "email"
    pub field: String,
    /// Human-readable message for that field
    pub message: String,
}

/// All rule failures for one form submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// All failures, in field order of the form
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Number of failed rules
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no rule failed
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first message recorded for a field, if any
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn email_is_valid(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_REGEX.get_or_init(|| {
        // One @, no whitespace, and a dot somewhere in the domain
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
    });

    re.is_match(email)
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.is_empty() {
        errors.push("email", "E-mail is required");
    } else if !email_is_valid(email) {
        errors.push("email", "Enter a valid e-mail");
    }
}

/// Validate the sign-in form
///
/// # Errors
///
/// Returns every failed rule keyed by field name.
pub fn validate_sign_in(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_email(&mut errors, email);
    if password.is_empty() {
        errors.push("password", "Password is required");
    }

    errors.into_result()
}

/// Validate the sign-up form
///
/// # Errors
///
/// Returns every failed rule keyed by field name.
pub fn validate_sign_up(name: &str, email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if name.is_empty() {
        errors.push("name", "Name is required");
    }
    check_email(&mut errors, email);
    if password.len() < MIN_PASSWORD_LEN {
        errors.push("password", "Password must be at least 6 characters");
    }

    errors.into_result()
}

/// Validate the profile form
///
/// The three password fields are a unit: all empty means no password
/// change, and filling any of them brings the whole block under the
/// password rules.
///
/// # Errors
///
/// Returns every failed rule keyed by field name.
pub fn validate_profile(
    name: &str,
    email: &str,
    old_password: &str,
    password: &str,
    password_confirmation: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if name.is_empty() {
        errors.push("name", "Name is required");
    }
    check_email(&mut errors, email);

    let changing_password =
        !old_password.is_empty() || !password.is_empty() || !password_confirmation.is_empty();
    if changing_password {
        if old_password.is_empty() {
            errors.push("old_password", "Current password is required");
        }
        if password.len() < MIN_PASSWORD_LEN {
            errors.push("password", "Password must be at least 6 characters");
        }
        if password_confirmation != password {
            errors.push("password_confirmation", "Password confirmation does not match");
        }
    }

    errors.into_result()
}
