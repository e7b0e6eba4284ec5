//! ANSI escape sequences used for styled terminal output.

use clap::ValueEnum;

pub const RESET: &str = "\x1b[0m";
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Foreground and background colors.
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Blue,
    Cyan,
    White,
    Black,
    Green,
    Yellow,
    Purple,
    BackRed,
    BackBlue,
    BackCyan,
    BackWhite,
    BackBlack,
    BackGreen,
    BackYellow,
    BackPurple,
}

impl Color {
    pub fn code(&self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Blue => "\x1b[34m",
            Color::Cyan => "\x1b[36m",
            Color::White => "\x1b[37m",
            Color::Black => "\x1b[30m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Purple => "\x1b[35m",
            Color::BackRed => "\x1b[41m",
            Color::BackBlue => "\x1b[44m",
            Color::BackCyan => "\x1b[46m",
            Color::BackWhite => "\x1b[47m",
            Color::BackBlack => "\x1b[40m",
            Color::BackGreen => "\x1b[42m",
            Color::BackYellow => "\x1b[43m",
            Color::BackPurple => "\x1b[45m",
        }
    }
}

/// Text attributes.
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Modifier {
    Dim,
    Bold,
    Blink,
    Hidden,
    Reverse,
    Italics,
    Underline,
}

impl Modifier {
    pub fn code(&self) -> &'static str {
        match self {
            Modifier::Dim => "\x1b[2m",
            Modifier::Bold => "\x1b[1m",
            Modifier::Blink => "\x1b[5m",
            Modifier::Hidden => "\x1b[8m",
            Modifier::Reverse => "\x1b[7m",
            Modifier::Italics => "\x1b[3m",
            Modifier::Underline => "\x1b[4m",
        }
    }
}

/// Optional color plus optional modifier applied to one chunk of text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Style {
    pub color: Option<Color>,
    pub modifier: Option<Modifier>,
}

impl Style {
    pub const PLAIN: Style = Style {
        color: None,
        modifier: None,
    };

    pub const fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            modifier: None,
        }
    }

    pub const fn bold(color: Color) -> Self {
        Self {
            color: Some(color),
            modifier: Some(Modifier::Bold),
        }
    }

    /// Escape prefix in the order the terminal expects: modifier, then color.
    pub fn prefix(&self) -> String {
        let mut out = String::new();
        if let Some(modifier) = self.modifier {
            out.push_str(modifier.code());
        }
        if let Some(color) = self.color {
            out.push_str(color.code());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_puts_modifier_before_color() {
        let style = Style::bold(Color::Red);
        assert_eq!(style.prefix(), "\x1b[1m\x1b[31m");
    }

    #[test]
    fn plain_style_has_no_prefix() {
        assert!(Style::PLAIN.prefix().is_empty());
        assert_eq!(Style::default(), Style::PLAIN);
    }

    #[test]
    fn background_codes_use_4x_range() {
        assert_eq!(Color::BackGreen.code(), "\x1b[42m");
        assert_eq!(Color::BackPurple.code(), "\x1b[45m");
    }

    #[test]
    fn value_enum_uses_kebab_case() {
        let color = Color::from_str("back-yellow", false).unwrap();
        assert_eq!(color, Color::BackYellow);
        let modifier = Modifier::from_str("underline", false).unwrap();
        assert_eq!(modifier, Modifier::Underline);
    }
}
