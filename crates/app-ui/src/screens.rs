//! Screen flows for Clipbook.
//!
//! Each screen is a plain state holder the rendering layer reads from and
//! drives. Screens own their form or selection state, call into the
//! `app_core` services for anything remote, and hand back a [`Route`] when
//! an action moves the user somewhere else.

use std::sync::Arc;

use app_core::auth::{AuthError, AuthService};
use app_core::booking::{BookingError, BookingService};
use app_core::profile::{ProfileError, ProfileService};
use app_state::availability::{
    AvailabilityAggregator, AvailabilityError, AvailabilitySource, DaySchedule,
};
use booking_client::session::Session;
use booking_client::{Provider, User};
use chrono::{NaiveDate, TimeZone, Utc};
use thiserror::Error;

use crate::forms::{ProfileForm, SignInForm, SignUpForm};
use crate::navigation::Route;

// =============================================================================
// Sign In Screen
// =============================================================================

/// Credential entry screen
#[derive(Debug, Clone, Default)]
pub struct SignInScreen {
    /// Form state
    pub form: SignInForm,
}

impl SignInScreen {
    /// Create the screen with an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the form and sign in.
    ///
    /// Validation failures land on the form fields before the error is
    /// returned; nothing touches the network in that case.
    pub async fn submit(&mut self, auth: &AuthService) -> Result<Session, AuthError> {
        self.form.validate()?;
        auth.sign_in(&self.form.email.value, &self.form.password.value)
            .await
    }

    /// User-facing message for a failed submit
    pub fn error_message(error: &AuthError) -> String {
        match error {
            AuthError::Validation(errors) => errors.to_string(),
            _ => "An error occurred while signing in, check your credentials".to_string(),
        }
    }
}

// =============================================================================
// Sign Up Screen
// =============================================================================

/// Account registration screen
#[derive(Debug, Clone, Default)]
pub struct SignUpScreen {
    /// Form state
    pub form: SignUpForm,
}

impl SignUpScreen {
    /// Create the screen with an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the form and register the account.
    ///
    /// Registration does not sign the user in; on success the flow returns
    /// to the sign-in screen.
    pub async fn submit(&mut self, auth: &AuthService) -> Result<Route, AuthError> {
        self.form.validate()?;
        auth.sign_up(
            &self.form.name.value,
            &self.form.email.value,
            &self.form.password.value,
        )
        .await?;
        Ok(Route::SignIn)
    }

    /// Message shown after a successful registration
    pub fn success_message() -> &'static str {
        "Registration complete! You can now sign in."
    }

    /// User-facing message for a failed submit
    pub fn error_message(error: &AuthError) -> String {
        match error {
            AuthError::Validation(errors) => errors.to_string(),
            _ => "An error occurred while registering, please try again".to_string(),
        }
    }
}

// =============================================================================
// Dashboard Screen
// =============================================================================

/// Provider listing screen shown after sign-in
#[derive(Debug, Clone, Default)]
pub struct DashboardScreen {
    providers: Vec<Provider>,
}

impl DashboardScreen {
    /// Working days shown under every provider
    pub const SCHEDULE_DAYS: &'static str = "Monday to Friday";

    /// Working hours shown under every provider
    pub const SCHEDULE_HOURS: &'static str = "8am to 6pm";

    /// Create the screen with an empty provider list
    pub fn new() -> Self {
        Self::default()
    }

    /// Two-line header greeting
    pub fn greeting(user: &User) -> String {
        format!("Welcome,\n{}", user.name)
    }

    /// Fetch the provider list
    pub async fn load(&mut self, service: &BookingService) -> Result<(), BookingError> {
        self.providers = service.list_providers().await?;
        Ok(())
    }

    /// Providers loaded so far
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Route for tapping a provider card
    pub fn select_provider(&self, provider_id: &str) -> Route {
        Route::CreateAppointment {
            provider_id: provider_id.to_string(),
        }
    }

    /// Route for tapping the header avatar
    pub fn profile_route(&self) -> Route {
        Route::Profile
    }
}

// =============================================================================
// Create Appointment Screen
// =============================================================================

/// Errors surfaced while creating an appointment
#[derive(Debug, Error)]
pub enum CreateAppointmentError {
    /// Confirm was pressed before an hour was chosen
    #[error("No time slot selected")]
    NoHourSelected,

    /// Availability could not be loaded
    #[error("Availability error: {0}")]
    Availability(#[from] AvailabilityError),

    /// The booking submission failed
    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),
}

impl CreateAppointmentError {
    /// Message suitable for an alert dialog
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoHourSelected => "Select a time slot before booking",
            Self::Availability(_) => "Could not load the available times, please try again",
            Self::Booking(error) => error.user_message(),
        }
    }
}

/// Date and time selection screen for booking with a provider.
///
/// The screen arrives with a provider already chosen (from the dashboard)
/// but shows the full provider strip so the user can switch. Day
/// availability reloads whenever the provider or date selection changes.
pub struct CreateAppointmentScreen {
    providers: Vec<Provider>,
    selected_provider: String,
    aggregator: AvailabilityAggregator,
}

impl CreateAppointmentScreen {
    /// Create the screen focused on a provider and date.
    ///
    /// Call [`refresh`](Self::refresh) afterwards to load the initial
    /// availability.
    pub fn new(
        source: Arc<dyn AvailabilitySource>,
        provider_id: impl Into<String>,
        initial_date: NaiveDate,
    ) -> Self {
        Self {
            providers: Vec::new(),
            selected_provider: provider_id.into(),
            aggregator: AvailabilityAggregator::new(source, initial_date),
        }
    }

    /// Fetch the provider strip
    pub async fn load_providers(
        &mut self,
        service: &BookingService,
    ) -> Result<(), BookingError> {
        self.providers = service.list_providers().await?;
        Ok(())
    }

    /// Providers for the horizontal strip
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Currently selected provider id
    pub fn selected_provider(&self) -> &str {
        &self.selected_provider
    }

    /// Whether a strip entry is the selected one
    pub fn is_selected(&self, provider_id: &str) -> bool {
        self.selected_provider == provider_id
    }

    /// Load availability for the current selection if it is stale.
    ///
    /// Returns whether a fetch actually happened.
    pub async fn refresh(&self) -> Result<bool, CreateAppointmentError> {
        let date = self.aggregator.date();
        let fetched = self
            .aggregator
            .on_selection_changed(&self.selected_provider, date)
            .await?;
        Ok(fetched)
    }

    /// Switch to another provider, reloading availability as needed
    pub async fn select_provider(
        &mut self,
        provider_id: &str,
    ) -> Result<bool, CreateAppointmentError> {
        self.selected_provider = provider_id.to_string();
        self.refresh().await
    }

    /// Switch to another date, reloading availability as needed
    pub async fn select_date(&mut self, date: NaiveDate) -> Result<bool, CreateAppointmentError> {
        let fetched = self
            .aggregator
            .on_selection_changed(&self.selected_provider, date)
            .await?;
        Ok(fetched)
    }

    /// Record the tapped hour button
    pub fn select_hour(&self, hour: u32) {
        self.aggregator.select_hour(hour);
    }

    /// The hour currently highlighted, if any
    pub fn selected_hour(&self) -> Option<u32> {
        self.aggregator.selected_hour()
    }

    /// The date the schedule is showing
    pub fn date(&self) -> NaiveDate {
        self.aggregator.date()
    }

    /// Morning and afternoon slot buckets
    pub fn schedule(&self) -> DaySchedule {
        self.aggregator.schedule()
    }

    /// Submit the booking and hand back the confirmation route.
    ///
    /// Screen state is left untouched on failure so the user can retry.
    pub async fn confirm(
        &self,
        service: &BookingService,
    ) -> Result<Route, CreateAppointmentError> {
        let start = self
            .aggregator
            .booked_start()
            .ok_or(CreateAppointmentError::NoHourSelected)?;
        let appointment = service
            .create_appointment(&self.selected_provider, start)
            .await?;
        Ok(Route::AppointmentCreated {
            date: appointment.date.timestamp_millis(),
        })
    }
}

// =============================================================================
// Appointment Created Screen
// =============================================================================

/// Confirmation screen shown after a successful booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentCreatedScreen {
    date: i64,
}

impl AppointmentCreatedScreen {
    /// Create the screen for a booked start instant (epoch milliseconds)
    pub fn new(date: i64) -> Self {
        Self { date }
    }

    /// Build the screen from its route, if it is the confirmation route
    pub fn from_route(route: &Route) -> Option<Self> {
        match route {
            Route::AppointmentCreated { date } => Some(Self::new(*date)),
            _ => None,
        }
    }

    /// Headline over the check mark
    pub fn title(&self) -> &'static str {
        "Booking complete"
    }

    /// Human-readable booked instant, e.g.
    /// "Tuesday, March 10, 2026 at 13:00h".
    ///
    /// Returns `None` when the carried timestamp is outside the
    /// representable range.
    pub fn description(&self) -> Option<String> {
        Utc.timestamp_millis_opt(self.date)
            .single()
            .map(|date| date.format("%A, %B %-d, %Y at %H:%Mh").to_string())
    }

    /// Dismiss the confirmation, returning to a fresh dashboard stack
    pub fn ok(&self) -> Route {
        Route::Dashboard
    }
}

// =============================================================================
// Profile Screen
// =============================================================================

/// Profile editing screen
#[derive(Debug, Clone)]
pub struct ProfileScreen {
    /// Form state, pre-filled with the current profile
    pub form: ProfileForm,
}

impl ProfileScreen {
    /// Create the screen for the signed-in user
    pub fn new(user: &User) -> Self {
        Self {
            form: ProfileForm::for_user(user),
        }
    }

    /// Validate the form and push the update.
    ///
    /// Returns the refreshed user on success; the session keeps its token.
    pub async fn submit(&mut self, profile: &ProfileService) -> Result<User, ProfileError> {
        self.form.validate()?;
        profile
            .update(
                &self.form.name.value,
                &self.form.email.value,
                &self.form.old_password.value,
                &self.form.password.value,
                &self.form.password_confirmation.value,
            )
            .await
    }
}
