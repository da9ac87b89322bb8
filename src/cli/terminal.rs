//! Coloured terminal output.

use std::fmt::Display;

use owo_colors::{colors::css, Style};

fn color_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn paint<T: Display + ?Sized>(text: &T, style: Style) -> String {
    if color_enabled() {
        style.style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Styles for the kinds of text the CLI prints.
pub trait Colorize: Display {
    /// A change that was made (green)
    fn success(&self) -> String {
        paint(self, Style::new().fg::<css::Green>())
    }

    /// Something that needs attention (amber)
    fn warning(&self) -> String {
        paint(self, Style::new().fg::<css::Orange>())
    }

    /// The name of a doctor or pet (bold blue)
    fn record(&self) -> String {
        paint(self, Style::new().fg::<css::LightBlue>().bold())
    }

    /// Labels and notices (dimmed)
    fn dim(&self) -> String {
        paint(self, Style::new().dimmed())
    }
}

impl<T: Display + ?Sized> Colorize for T {}
