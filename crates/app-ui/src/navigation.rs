//! Navigation system for Clipbook
//!
//! Routes are plain data, so screens hand them around and tests compare
//! them directly. A single stack backs the whole app; session changes
//! re-root it between the auth flow and the booked-in flow. Deep links
//! resolve through [`Router`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters captured from a path or query string
pub type RouteParams = HashMap<String, String>;

// =============================================================================
// Route Definitions
// =============================================================================

/// Every screen the app can show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", content = "params")]
pub enum Route {
    // Auth flow
    /// Sign-in screen
    SignIn,
    /// Account creation screen
    SignUp,

    // App flow
    /// Provider list and greeting
    Dashboard,
    /// Pick a day and hour with one provider
    CreateAppointment {
        /// Provider being booked
        provider_id: String,
    },
    /// Booking confirmation
    AppointmentCreated {
        /// Booked start instant as epoch milliseconds
        date: i64,
    },
    /// Profile editing
    Profile,

    // Error
    /// Not found
    NotFound,
}

impl Default for Route {
    fn default() -> Self {
        Route::SignIn
    }
}

impl Route {
    /// Path form of the route, suitable for deep links
    pub fn to_path(&self) -> String {
        match self {
            Route::SignIn => "/sign-in".to_string(),
            Route::SignUp => "/sign-up".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::CreateAppointment { provider_id } => {
                format!("/appointments/new/{}", urlencoding::encode(provider_id))
            }
            Route::AppointmentCreated { date } => {
                format!("/appointments/created?date={}", date)
            }
            Route::Profile => "/profile".to_string(),
            Route::NotFound => "/not-found".to_string(),
        }
    }

    /// Whether the route sits behind the session gate
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::SignIn | Route::SignUp | Route::NotFound)
    }

    /// Human-readable title for headers and logs
    pub fn title(&self) -> &'static str {
        match self {
            Route::SignIn => "Sign In",
            Route::SignUp => "Sign Up",
            Route::Dashboard => "Dashboard",
            Route::CreateAppointment { .. } => "Hairdressers",
            Route::AppointmentCreated { .. } => "Appointment Created",
            Route::Profile => "My Profile",
            Route::NotFound => "Not Found",
        }
    }
}

// =============================================================================
// Navigation Stack
// =============================================================================

/// One stack entry with a stable identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    /// The route
    pub route: Route,
    /// Identity that survives route equality
    pub key: String,
}

impl StackEntry {
    /// Wrap a route with a fresh key
    pub fn new(route: Route) -> Self {
        Self {
            route,
            key: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Stack of visited routes, never empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStack {
    entries: Vec<StackEntry>,
    root: Route,
}

impl NavigationStack {
    /// Start a stack at the given root
    pub fn new(root: Route) -> Self {
        let first = StackEntry::new(root.clone());
        Self {
            entries: vec![first],
            root,
        }
    }

    fn top(&self) -> &StackEntry {
        self.entries.last().expect("navigation stack is never empty")
    }

    /// Put a route on top
    pub fn push(&mut self, route: Route) {
        self.entries.push(StackEntry::new(route));
    }

    /// Drop the top route; false when already at the root
    pub fn pop(&mut self) -> bool {
        if self.entries.len() == 1 {
            return false;
        }
        self.entries.pop();
        true
    }

    /// Pop to root
    pub fn pop_to_root(&mut self) {
        self.entries.truncate(1);
    }

    /// Swap the top route without growing the stack
    pub fn replace(&mut self, route: Route) {
        self.entries.pop();
        self.entries.push(StackEntry::new(route));
    }

    /// Route currently on top
    pub fn current(&self) -> &Route {
        &self.top().route
    }

    /// Entry currently on top
    pub fn current_entry(&self) -> &StackEntry {
        self.top()
    }

    /// Whether anything is stacked above the root
    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    /// Number of routes on the stack
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Entries from root to top
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    /// Throw the history away and start over at `route`
    pub fn reset(&mut self, route: Route) {
        self.entries.clear();
        self.entries.push(StackEntry::new(route.clone()));
        self.root = route;
    }
}

// =============================================================================
// Navigation State
// =============================================================================

/// Top-level navigation handle the app drives
///
/// The app runs one stack whose root depends on whether a session is
/// active: signed-out users live in the auth flow rooted at sign-in,
/// signed-in users in the app flow rooted at the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    stack: NavigationStack,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            stack: NavigationStack::new(Route::SignIn),
        }
    }
}

impl NavigationState {
    /// Create a new navigation state rooted at the sign-in screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the user is looking at
    pub fn current_route(&self) -> &Route {
        self.stack.current()
    }

    /// Push a new screen
    pub fn navigate(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Return to the previous screen
    pub fn go_back(&mut self) -> bool {
        self.stack.pop()
    }

    /// Whether a previous screen exists
    pub fn can_go_back(&self) -> bool {
        self.stack.can_go_back()
    }

    /// Throw away the stack and start over at the given route
    pub fn reset_to(&mut self, route: Route) {
        self.stack.reset(route);
    }

    /// Re-root the stack after a session change
    ///
    /// Signing in lands on the dashboard, signing out back on the
    /// sign-in screen. Whatever was stacked up is discarded.
    pub fn reset_for_session(&mut self, authenticated: bool) {
        let root = if authenticated {
            Route::Dashboard
        } else {
            Route::SignIn
        };
        self.stack.reset(root);
    }

    /// The underlying stack
    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }
}

// =============================================================================
// Router
// =============================================================================

/// Maps URL paths back to routes for deep links
pub struct Router {
    patterns: Vec<(&'static str, fn(&RouteParams) -> Option<Route>)>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// A router knowing every addressable route
    pub fn new() -> Self {
        Self {
            patterns: vec![
                ("/", |_| Some(Route::Dashboard)),
                ("/sign-in", |_| Some(Route::SignIn)),
                ("/sign-up", |_| Some(Route::SignUp)),
                ("/appointments/new/:provider_id", |params| {
                    Some(Route::CreateAppointment {
                        provider_id: params.get("provider_id")?.clone(),
                    })
                }),
                ("/appointments/created", |params| {
                    Some(Route::AppointmentCreated {
                        date: params.get("date")?.parse().ok()?,
                    })
                }),
                ("/profile", |_| Some(Route::Profile)),
            ],
        }
    }

    /// Resolve a path, falling back to [`Route::NotFound`]
    pub fn match_path(&self, path: &str) -> Route {
        let (pathname, query) = match path.split_once('?') {
            Some((pathname, query)) => (pathname, Some(query)),
            None => (path, None),
        };
        let query_params = query.map(parse_query).unwrap_or_default();

        self.patterns
            .iter()
            .find_map(|(pattern, build)| {
                let mut params = capture(pattern, pathname)?;
                params.extend(query_params.clone());
                build(&params)
            })
            .unwrap_or(Route::NotFound)
    }
}

/// Bind a `:name` pattern against a concrete path
fn capture(pattern: &str, path: &str) -> Option<RouteParams> {
    let wanted: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let given: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if wanted.len() != given.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (want, got) in wanted.into_iter().zip(given) {
        match want.strip_prefix(':') {
            Some(name) => {
                let value = urlencoding::decode(got).ok()?;
                params.insert(name.to_string(), value.into_owned());
            }
            None if want == got => {}
            None => return None,
        }
    }
    Some(params)
}

fn parse_query(query: &str) -> RouteParams {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter_map(|(key, value)| {
            let value = urlencoding::decode(value).ok()?;
            Some((key.to_string(), value.into_owned()))
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
