//! Colour themes.
//!
//! One global theme, chosen at startup from config, `--no-colors` or
//! `NO_COLOR`. Widgets ask for styles through [`theme()`] instead of
//! hard-coding colours.

use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

/// Marker drawn in front of the highlighted list row
pub const LIST_HIGHLIGHT_SYMBOL: &str = "» ";

static THEME: RwLock<Theme> = RwLock::new(Theme::dark());

pub fn init_theme(theme_type: ThemeType) {
    let mut theme = THEME.write().unwrap_or_else(PoisonError::into_inner);
    *theme = Theme::new(theme_type);
}

pub fn theme() -> Theme {
    THEME.read().unwrap_or_else(PoisonError::into_inner).clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeType {
    #[default]
    Dark,
    Light,
    /// No colour codes at all, only bold/dim/reverse
    NoColor,
}

impl FromStr for ThemeType {
    type Err = ();

    /// Unknown names fall back to dark.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "light" => ThemeType::Light,
            "nocolor" | "no-color" | "no_color" => ThemeType::NoColor,
            _ => ThemeType::Dark,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub theme_type: ThemeType,
    pub primary: Color,
    pub success: Color,
    pub error: Color,
    pub text: Color,
    pub text_muted: Color,
    pub text_emphasis: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight_bg: Color,
}

impl Theme {
    pub fn new(theme_type: ThemeType) -> Self {
        match theme_type {
            ThemeType::Dark => Self::dark(),
            ThemeType::Light => Self::light(),
            ThemeType::NoColor => Self::no_color(),
        }
    }

    pub const fn dark() -> Self {
        Self {
            theme_type: ThemeType::Dark,
            primary: Color::Cyan,
            success: Color::Green,
            error: Color::Red,
            text: Color::White,
            text_muted: Color::DarkGray,
            text_emphasis: Color::Yellow,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            highlight_bg: Color::DarkGray,
        }
    }

    pub const fn light() -> Self {
        Self {
            theme_type: ThemeType::Light,
            primary: Color::Blue,
            success: Color::Green,
            error: Color::Red,
            text: Color::Black,
            text_muted: Color::DarkGray,
            text_emphasis: Color::Blue,
            border: Color::DarkGray,
            border_focused: Color::Blue,
            highlight_bg: Color::Gray,
        }
    }

    /// Palette is never read in this mode; the helpers below return modifiers only.
    pub const fn no_color() -> Self {
        Self {
            theme_type: ThemeType::NoColor,
            primary: Color::Reset,
            success: Color::Reset,
            error: Color::Reset,
            text: Color::Reset,
            text_muted: Color::Reset,
            text_emphasis: Color::Reset,
            border: Color::Reset,
            border_focused: Color::Reset,
            highlight_bg: Color::Reset,
        }
    }

    fn colored(&self, fg: Color, fallback: Style) -> Style {
        if self.theme_type == ThemeType::NoColor {
            fallback
        } else {
            Style::default().fg(fg)
        }
    }

    pub fn title_style(&self) -> Style {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        self.colored(self.primary, bold).add_modifier(Modifier::BOLD)
    }

    pub fn text_style(&self) -> Style {
        self.colored(self.text, Style::default())
    }

    pub fn muted_style(&self) -> Style {
        self.colored(self.text_muted, Style::default().add_modifier(Modifier::DIM))
    }

    pub fn emphasis_style(&self) -> Style {
        self.colored(self.text_emphasis, Style::default().add_modifier(Modifier::BOLD))
    }

    pub fn success_style(&self) -> Style {
        self.colored(self.success, Style::default().add_modifier(Modifier::BOLD))
    }

    pub fn error_style(&self) -> Style {
        self.colored(self.error, Style::default().add_modifier(Modifier::BOLD))
    }

    pub fn border_style(&self) -> Style {
        self.colored(self.border, Style::default())
    }

    pub fn border_focused_style(&self) -> Style {
        self.colored(self.border_focused, Style::default().add_modifier(Modifier::BOLD))
    }

    pub fn highlight_style(&self) -> Style {
        if self.theme_type == ThemeType::NoColor {
            return Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        Style::default()
            .fg(self.text_emphasis)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn disabled_style(&self) -> Style {
        self.muted_style()
    }
}
