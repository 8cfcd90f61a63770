//! User interface layer for Clipbook
//!
//! This crate glues the booking services to the screens: form state,
//! navigation routing, the dark theme, and the screen flows themselves.
//!
//! # Modules
//!
//! - [`theme`] - Dark theme colors and component styling
//! - [`forms`] - Form state bound to the validation rules
//! - [`navigation`] - Routes, the navigation stack, and path matching
//! - [`screens`] - Application screens
//!
//! # Example
//!
//! ```rust
//! use app_ui::navigation::{NavigationState, Route};
//! use app_ui::theme::dark_theme;
//!
//! let theme = dark_theme();
//! assert!(theme.is_dark());
//!
//! let mut nav = NavigationState::new();
//! nav.reset_for_session(true);
//! assert_eq!(nav.current_route(), &Route::Dashboard);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod forms;
pub mod navigation;
pub mod screens;
pub mod theme;

// Re-export commonly used types
pub use forms::{FormField, ProfileForm, SignInForm, SignUpForm};
pub use navigation::{NavigationStack, NavigationState, Route, Router, StackEntry};
pub use screens::{
    AppointmentCreatedScreen, CreateAppointmentScreen, DashboardScreen, ProfileScreen,
    SignInScreen, SignUpScreen,
};
pub use theme::{dark_theme, Theme};
