//! TUI colour palettes and style constants.
//!
//! Each named theme maps to a `Palette`; rendering asks the palette for
//! semantic styles so screens never hard-code colours.
//!
//! Colour semantics:
//! - text: typed-correct characters and body copy
//! - dim: untyped characters, labels, hints
//! - strong: big numbers on the results screen, titles
//! - cursor: the caret over the next character
//! - error: mistyped characters
//! - accent: progress fill, unlocked achievements, selection

use ratatui::style::{Color, Modifier, Style};

use crate::session::Heat;
use crate::types::ThemeName;

/// Resolved colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub dim: Color,
    pub strong: Color,
    pub cursor: Color,
    pub error: Color,
    pub accent: Color,
    pub border: Color,
    pub background: Color,
}

// Tailwind-ish shades
const NEUTRAL_200: Color = Color::Rgb(229, 229, 229);
const NEUTRAL_400: Color = Color::Rgb(163, 163, 163);
const NEUTRAL_500: Color = Color::Rgb(115, 115, 115);
const NEUTRAL_600: Color = Color::Rgb(82, 82, 82);
const NEUTRAL_800: Color = Color::Rgb(38, 38, 38);
const NEUTRAL_900: Color = Color::Rgb(23, 23, 23);
const RED_500: Color = Color::Rgb(239, 68, 68);
const RED_600: Color = Color::Rgb(220, 38, 38);

impl Palette {
    pub fn for_theme(theme: ThemeName) -> Palette {
        match theme {
            ThemeName::Dark => Palette {
                text: NEUTRAL_200,
                dim: NEUTRAL_600,
                strong: NEUTRAL_400,
                cursor: Color::Rgb(96, 165, 250),
                error: RED_500,
                accent: NEUTRAL_500,
                border: NEUTRAL_800,
                background: Color::Black,
            },
            ThemeName::Light => Palette {
                text: NEUTRAL_900,
                dim: NEUTRAL_400,
                strong: NEUTRAL_600,
                cursor: Color::Rgb(59, 130, 246),
                error: RED_500,
                accent: NEUTRAL_600,
                border: NEUTRAL_200,
                background: Color::White,
            },
            ThemeName::Blue => Palette::tinted(
                Color::Rgb(30, 64, 175),
                Color::Rgb(37, 99, 235),
                Color::Rgb(59, 130, 246),
                Color::Rgb(191, 219, 254),
                RED_500,
            ),
            ThemeName::Red => Palette::tinted(
                Color::Rgb(153, 27, 27),
                RED_600,
                RED_500,
                Color::Rgb(254, 202, 202),
                Color::Rgb(127, 29, 29),
            ),
            ThemeName::Yellow => Palette::tinted(
                Color::Rgb(133, 77, 14),
                Color::Rgb(202, 138, 4),
                Color::Rgb(234, 179, 8),
                Color::Rgb(254, 240, 138),
                RED_600,
            ),
            ThemeName::Green => Palette::tinted(
                Color::Rgb(21, 128, 61),
                Color::Rgb(22, 163, 74),
                Color::Rgb(34, 197, 94),
                Color::Rgb(187, 247, 208),
                RED_600,
            ),
            ThemeName::Purple => Palette::tinted(
                Color::Rgb(107, 33, 168),
                Color::Rgb(147, 51, 234),
                Color::Rgb(168, 85, 247),
                Color::Rgb(233, 213, 255),
                RED_500,
            ),
        }
    }

    /// Coloured themes share one layout: deep shade for text, mid for
    /// labels, bright for cursor and progress, pale for borders.
    const fn tinted(deep: Color, mid: Color, bright: Color, pale: Color, error: Color) -> Palette {
        Palette {
            text: deep,
            dim: NEUTRAL_400,
            strong: deep,
            cursor: bright,
            error,
            accent: mid,
            border: pale,
            background: Color::Reset,
        }
    }

    // ------------------------------------------------------------------
    // Semantic styles
    // ------------------------------------------------------------------

    pub fn base(&self) -> Style {
        Style::new().fg(self.text).bg(self.background)
    }

    /// Quote characters not typed yet.
    pub fn pending(&self) -> Style {
        Style::new().fg(self.dim)
    }

    pub fn correct(&self) -> Style {
        Style::new().fg(self.text)
    }

    pub fn incorrect(&self) -> Style {
        Style::new().fg(self.error).add_modifier(Modifier::UNDERLINED)
    }

    /// Caret over the next character. Blinks until the first key.
    pub fn cursor(&self, started: bool) -> Style {
        let style = Style::new().fg(self.background_or_black()).bg(self.cursor);
        if started {
            style
        } else {
            style.add_modifier(Modifier::SLOW_BLINK)
        }
    }

    pub fn label(&self) -> Style {
        Style::new().fg(self.dim)
    }

    pub fn title(&self) -> Style {
        Style::new().fg(self.strong).add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::new().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::new().fg(self.background_or_black()).bg(self.accent)
    }

    pub fn progress(&self) -> Style {
        Style::new().fg(self.accent)
    }

    pub fn border(&self) -> Style {
        Style::new().fg(self.border)
    }

    fn background_or_black(&self) -> Color {
        match self.background {
            Color::Reset => Color::Black,
            other => other,
        }
    }
}

/// Heat-map cell style, independent of theme.
pub fn heat_style(heat: Heat) -> Style {
    match heat {
        Heat::High => STYLE_HEAT_HIGH,
        Heat::Medium => STYLE_HEAT_MEDIUM,
        Heat::Low => STYLE_HEAT_LOW,
    }
}

pub const STYLE_HEAT_HIGH: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
pub const STYLE_HEAT_MEDIUM: Style = Style::new().fg(Color::Yellow);
pub const STYLE_HEAT_LOW: Style = Style::new().fg(Color::Blue);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_theme_has_a_palette() {
        for theme in ThemeName::ALL {
            let palette = Palette::for_theme(theme);
            assert_ne!(palette.text, palette.dim, "{} text must stand out", theme);
        }
    }

    #[test]
    fn errors_are_red_family() {
        assert_eq!(Palette::for_theme(ThemeName::Dark).error, RED_500);
        assert_eq!(Palette::for_theme(ThemeName::Green).error, RED_600);
    }

    #[test]
    fn cursor_blinks_only_before_start() {
        let palette = Palette::for_theme(ThemeName::Blue);
        assert!(palette.cursor(false).add_modifier.contains(Modifier::SLOW_BLINK));
        assert!(!palette.cursor(true).add_modifier.contains(Modifier::SLOW_BLINK));
    }

    #[test]
    fn heat_styles_escalate() {
        assert_eq!(heat_style(Heat::High).fg, Some(Color::Red));
        assert_eq!(heat_style(Heat::Medium).fg, Some(Color::Yellow));
        assert_eq!(heat_style(Heat::Low).fg, Some(Color::Blue));
    }
}
