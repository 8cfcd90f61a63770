//! Design system for the Clipbook dark theme.
//!
//! Clipbook ships a single dark theme built around a warm orange accent.
//! Semantic colors are resolved through [`Theme`] so screens never hard-code
//! hex values, and input/button styling is derived from component state.
//!
//! # Usage
//!
//! ```rust
//! use app_ui::theme::{dark_theme, InputState};
//!
//! let theme = dark_theme();
//! let style = theme.input_style(InputState::Focused, false);
//! assert_eq!(style.border, theme.colors.accent);
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Color Types
// =============================================================================

/// A color represented as an RGB hex string (e.g., "#FF9000")
pub type Color = String;

/// Parse a hex color string to RGB components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() < 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Convert RGB to hex string
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

// =============================================================================
// Brand Colors
// =============================================================================

/// Clipbook brand colors
pub mod brand {
    /// Primary orange (buttons, highlights, focused fields)
    pub const ORANGE: &str = "#FF9000";

    /// Main app background
    pub const BACKGROUND: &str = "#312E38";

    /// Input field background
    pub const INPUT_BACKGROUND: &str = "#232129";

    /// Light cream text (titles and body copy)
    pub const CREAM: &str = "#F4EDE8";

    /// Muted gray text
    pub const GRAY: &str = "#999591";

    /// Placeholder and inactive icon gray
    pub const GRAY_HARD: &str = "#666360";

    /// Success green (confirmation check)
    pub const SUCCESS: &str = "#04D361";

    /// Error red (invalid field borders)
    pub const ERROR: &str = "#C53030";
}

// =============================================================================
// Semantic Colors
// =============================================================================

/// Semantic colors for specific UI purposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticColors {
    /// Main background color
    pub background: Color,
    /// Elevated surface color (inputs, cards)
    pub surface: Color,
    /// Primary text color
    pub text: Color,
    /// Secondary/muted text color
    pub text_muted: Color,
    /// Placeholder text and inactive icon color
    pub placeholder: Color,
    /// Accent color for actions and highlights
    pub accent: Color,
    /// Text color on accent-colored surfaces
    pub on_accent: Color,
    /// Success color
    pub success: Color,
    /// Error color
    pub error: Color,
}

// =============================================================================
// Component Styles
// =============================================================================

/// Visual state of a text input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputState {
    /// Neither focused nor errored
    #[default]
    Idle,
    /// Currently focused
    Focused,
    /// Holds a validation error
    Errored,
}

/// Resolved colors for a text input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputStyle {
    /// Field background
    pub background: Color,
    /// Border color for the current state
    pub border: Color,
    /// Leading icon color
    pub icon: Color,
    /// Placeholder text color
    pub placeholder: Color,
}

/// Resolved colors for the primary action button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonStyle {
    /// Button background
    pub background: Color,
    /// Label color
    pub text: Color,
}

// =============================================================================
// Theme Definition
// =============================================================================

/// Complete theme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Color scheme (always "dark")
    pub color_scheme: String,
    /// Semantic theme colors
    pub colors: SemanticColors,
}

impl Theme {
    /// Check if this is a dark theme
    pub fn is_dark(&self) -> bool {
        self.color_scheme == "dark"
    }

    /// Resolve input colors for a state.
    ///
    /// A filled input keeps the accent icon even when it loses focus.
    pub fn input_style(&self, state: InputState, filled: bool) -> InputStyle {
        let border = match state {
            InputState::Errored => self.colors.error.clone(),
            InputState::Focused => self.colors.accent.clone(),
            InputState::Idle => self.colors.surface.clone(),
        };
        let icon = if matches!(state, InputState::Focused) || filled {
            self.colors.accent.clone()
        } else {
            self.colors.placeholder.clone()
        };
        InputStyle {
            background: self.colors.surface.clone(),
            border,
            icon,
            placeholder: self.colors.placeholder.clone(),
        }
    }

    /// Resolve the primary button colors
    pub fn button_style(&self) -> ButtonStyle {
        ButtonStyle {
            background: self.colors.accent.clone(),
            text: self.colors.on_accent.clone(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        dark_theme()
    }
}

/// Create the Clipbook dark theme
pub fn dark_theme() -> Theme {
    Theme {
        color_scheme: "dark".to_string(),
        colors: SemanticColors {
            background: brand::BACKGROUND.to_string(),
            surface: brand::INPUT_BACKGROUND.to_string(),
            text: brand::CREAM.to_string(),
            text_muted: brand::GRAY.to_string(),
            placeholder: brand::GRAY_HARD.to_string(),
            accent: brand::ORANGE.to_string(),
            on_accent: brand::BACKGROUND.to_string(),
            success: brand::SUCCESS.to_string(),
            error: brand::ERROR.to_string(),
        },
    }
}
