//! Theme and style system for the terminal browser.
//!
//! Honors `NO_COLOR`: when set, styles rely on modifiers only.

use crate::models::{BookingStatus, TaskStatus};
use ratatui::style::{Color, Modifier, Style};
use std::sync::{PoisonError, RwLock};

/// Selection indicator shown next to the selected row
pub const LIST_HIGHLIGHT_SYMBOL: &str = "» ";

static THEME: RwLock<Theme> = RwLock::new(Theme::dark());

/// Initialize the global theme (call once at startup)
pub fn init_theme(theme_type: ThemeType) {
    let mut theme = THEME.write().unwrap_or_else(PoisonError::into_inner);
    *theme = Theme::new(theme_type);
}

/// Get the current theme
pub fn theme() -> Theme {
    THEME.read().unwrap_or_else(PoisonError::into_inner).clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeType {
    #[default]
    Dark,
    NoColor,
}

impl ThemeType {
    /// `NoColor` when the `NO_COLOR` convention asks for it.
    pub fn from_env() -> Self {
        match std::env::var_os("NO_COLOR") {
            Some(v) if !v.is_empty() => ThemeType::NoColor,
            _ => ThemeType::Dark,
        }
    }
}

/// Color palette for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub theme_type: ThemeType,
    /// Titles and key UI elements
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub text: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight_bg: Color,
    /// Reset means terminal default
    pub background: Color,
}

impl Theme {
    pub fn new(theme_type: ThemeType) -> Self {
        match theme_type {
            ThemeType::Dark => Self::dark(),
            ThemeType::NoColor => Self::no_color(),
        }
    }

    pub const fn dark() -> Self {
        Self {
            theme_type: ThemeType::Dark,
            primary: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            text: Color::White,
            text_muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            highlight_bg: Color::DarkGray,
            background: Color::Reset,
        }
    }

    pub const fn no_color() -> Self {
        Self {
            theme_type: ThemeType::NoColor,
            primary: Color::Reset,
            success: Color::Reset,
            warning: Color::Reset,
            error: Color::Reset,
            text: Color::Reset,
            text_muted: Color::Reset,
            border: Color::Reset,
            border_focused: Color::Reset,
            highlight_bg: Color::Reset,
            background: Color::Reset,
        }
    }

    fn colored(&self, color: Color) -> Style {
        if self.theme_type == ThemeType::NoColor {
            return Style::default();
        }
        Style::default().fg(color)
    }

    pub fn title_style(&self) -> Style {
        self.colored(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        if self.theme_type == ThemeType::NoColor {
            return Style::default().add_modifier(Modifier::DIM);
        }
        Style::default().fg(self.text_muted)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        self.colored(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Style for the selected table row
    pub fn highlight_style(&self) -> Style {
        if self.theme_type == ThemeType::NoColor {
            return Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn booking_status_style(&self, status: BookingStatus) -> Style {
        match status {
            BookingStatus::Pending => self.colored(self.warning),
            BookingStatus::Confirmed => self.colored(self.primary),
            BookingStatus::Completed => self.colored(self.success),
            BookingStatus::Cancelled => self.colored(self.error),
        }
    }

    pub fn task_status_style(&self, status: TaskStatus) -> Style {
        match status {
            TaskStatus::Pending => self.colored(self.warning),
            TaskStatus::Done => self.colored(self.success),
        }
    }
}
