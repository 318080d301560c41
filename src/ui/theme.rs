//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{AlertColor, Tier};
use crate::settings::ThemeChoice;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for values with no data yet.
    pub neutral: Color,
    pub healthy: Color,
    pub warning: Color,
    /// Color for the too-close alert, between warning and critical.
    pub caution: Color,
    pub critical: Color,
    /// Color for the blink counter card.
    pub counter: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for panel titles.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            neutral: Color::LightBlue,
            healthy: Color::Green,
            warning: Color::Yellow,
            caution: Color::Rgb(255, 165, 0),
            critical: Color::Red,
            counter: Color::Magenta,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            neutral: Color::Blue,
            healthy: Color::Green,
            warning: Color::Yellow,
            caution: Color::Rgb(230, 120, 0),
            critical: Color::Red,
            counter: Color::Magenta,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Build the theme selected in the settings.
    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::auto_detect(),
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    pub fn tier_color(&self, tier: Tier) -> Color {
        match tier {
            Tier::Neutral => self.neutral,
            Tier::Healthy => self.healthy,
            Tier::Warning => self.warning,
            Tier::Critical => self.critical,
        }
    }

    /// Get style for a tier
    pub fn tier_style(&self, tier: Tier) -> Style {
        let style = Style::default().fg(self.tier_color(tier));
        if tier == Tier::Critical {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn alert_color(&self, color: AlertColor) -> Color {
        match color {
            AlertColor::Yellow => self.warning,
            AlertColor::Orange => self.caution,
            AlertColor::Red => self.critical,
        }
    }
}
