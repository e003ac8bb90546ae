//! Styling helpers for terminal output.
//!
//! The [`UiStyle`] trait provides convenience methods for applying ANSI
//! styling via the `colored` crate. Implementations for `&str` and `String`
//! are provided so string literals can be styled directly.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to editor output.
pub trait UiStyle {
    fn heading_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn success_style(&self) -> ColoredString;
    fn hint_style(&self) -> ColoredString;
    fn action_style(&self) -> ColoredString;
    fn quest_style(&self) -> ColoredString;
    fn tag_style(&self) -> ColoredString;
}

impl UiStyle for &str {
    fn heading_style(&self) -> ColoredString {
        self.bright_yellow().underline()
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(120, 190, 255)
    }
    fn error_style(&self) -> ColoredString {
        self.bright_red()
    }
    fn success_style(&self) -> ColoredString {
        self.truecolor(90, 200, 90)
    }
    fn hint_style(&self) -> ColoredString {
        self.truecolor(150, 150, 150).italic()
    }
    fn action_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40).bold()
    }
    fn quest_style(&self) -> ColoredString {
        self.truecolor(223, 120, 30)
    }
    fn tag_style(&self) -> ColoredString {
        self.truecolor(75, 80, 75)
    }
}

impl UiStyle for String {
    fn heading_style(&self) -> ColoredString {
        self.as_str().heading_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn success_style(&self) -> ColoredString {
        self.as_str().success_style()
    }
    fn hint_style(&self) -> ColoredString {
        self.as_str().hint_style()
    }
    fn action_style(&self) -> ColoredString {
        self.as_str().action_style()
    }
    fn quest_style(&self) -> ColoredString {
        self.as_str().quest_style()
    }
    fn tag_style(&self) -> ColoredString {
        self.as_str().tag_style()
    }
}
