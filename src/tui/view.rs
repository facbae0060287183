//! Pure rendering: map App state to ratatui widget trees.
//!
//! Each screen and overlay has a dedicated render function. The main
//! `render()` draws the screen, then the overlay on top. Widget-building
//! functions are pure (state in, widgets out); the only effect is
//! Frame::render_widget() which writes to the terminal buffer.

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::profile::Profile;
use crate::report::{RECENT_TESTS, entry_date};
use crate::session::{CharState, TypingSession};
use crate::types::{Achievement, Difficulty, ThemeName};

use super::state::{App, Overlay, Screen, Summary};
use super::theme::{self, Palette};

/// Widest the quote column gets, in cells.
const MAX_TEXT_WIDTH: u16 = 80;

/// Width of the text progress bars inside the achievements panel.
const ACHIEVEMENT_BAR_WIDTH: usize = 24;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current screen and overlay to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let palette = Palette::for_theme(app.theme);

    frame.render_widget(Block::new().style(palette.base()), area);

    // Common layout: toolbar at top, content in middle, help at bottom
    let chunks = Layout::vertical([
        Constraint::Length(1), // toolbar
        Constraint::Min(0),    // content
        Constraint::Length(1), // help
    ])
    .split(area);

    frame.render_widget(render_title(&palette), chunks[0]);
    frame.render_widget(render_badges(app, &palette), chunks[0]);
    frame.render_widget(render_help(app), chunks[2]);

    let content_area = column(chunks[1], MAX_TEXT_WIDTH);

    match &app.screen {
        Screen::Typing => render_typing(&app.session, &palette, frame, content_area),
        Screen::Results(summary) => {
            render_results(summary, &app.session, app, &palette, frame, content_area)
        }
    }

    if let Some(overlay) = app.overlay {
        render_overlay(app, overlay, &palette, frame, chunks[1]);
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

fn render_title(palette: &Palette) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled("keystreak", palette.title())))
}

/// Right-aligned difficulty label and streak badge.
fn render_badges(app: &App, palette: &Palette) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(
        app.difficulty.as_str().to_uppercase(),
        palette.label(),
    )];
    if app.profile.streak_days > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("streak {}", app.profile.streak_days),
            palette.highlight(),
        ));
    }
    Paragraph::new(Line::from(spans).right_aligned())
}

/// Help line showing available keybindings for the current mode.
fn render_help(app: &App) -> Paragraph<'static> {
    let help_text = match (app.overlay, &app.screen) {
        (Some(Overlay::Settings { .. }), _) => "[1-3] pick  [j/k] move  [Enter] apply  [Esc] close",
        (Some(Overlay::Themes { .. }), _) => "[j/k] move  [Enter] apply  [Esc] close",
        (Some(_), _) => "[Esc] close  [r] restart  [q] quit",
        (None, Screen::Typing) => {
            "[Tab] reset  [F1] settings  [F2] stats  [F3] achievements  [F4] theme  [^C] quit"
        }
        (None, Screen::Results(_)) => {
            "[r] start over  [s] stats  [a] achievements  [t] theme  [d] difficulty  [q] quit"
        }
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP))
}

/// Centered column at most `max_width` wide.
fn column(area: Rect, max_width: u16) -> Rect {
    let [col] = Layout::horizontal([Constraint::Length(max_width.min(area.width))])
        .flex(Flex::Center)
        .areas(area);
    col
}

/// Centered box of the given size, clamped to `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    column(row, width)
}

// ============================================================================
// SCREEN: TYPING
// ============================================================================

fn render_typing(session: &TypingSession, palette: &Palette, frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // spacer
        Constraint::Length(1), // progress bar
        Constraint::Length(1), // spacer
        Constraint::Min(1),    // quote
        Constraint::Length(1), // live wpm
    ])
    .split(area);

    frame.render_widget(
        render_progress_bar(session.progress_percent(), chunks[1].width, palette),
        chunks[1],
    );

    let quote_area = chunks[3];
    let (lines, cursor_line) = quote_lines(session, quote_area.width as usize, palette);
    let visible = quote_area.height as usize;
    let scroll = if cursor_line >= visible {
        cursor_line + 1 - visible
    } else {
        0
    };
    frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), quote_area);

    let status = if session.is_started() && !session.is_finished() {
        Line::from(vec![
            Span::styled(session.live_wpm().to_string(), palette.highlight()),
            Span::styled(" WPM", palette.label()),
        ])
    } else if !session.is_started() {
        Line::from(Span::styled("START TYPING", palette.label()))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(status), chunks[4]);
}

/// Thin bar across the column, filled to `percent`.
fn render_progress_bar(percent: u32, width: u16, palette: &Palette) -> Paragraph<'static> {
    let width = width as usize;
    let filled = (width * percent.min(100) as usize) / 100;
    Paragraph::new(Line::from(vec![
        Span::styled("━".repeat(filled), palette.progress()),
        Span::styled("─".repeat(width - filled), palette.border()),
    ]))
}

/// Styled, word-wrapped quote lines and the line index holding the cursor.
fn quote_lines(
    session: &TypingSession,
    width: usize,
    palette: &Palette,
) -> (Vec<Line<'static>>, usize) {
    let states = session.char_states();
    let chars: Vec<char> = states.iter().map(|(c, _)| *c).collect();
    let cursor = session.position();
    let show_cursor = !session.is_finished();

    let mut cursor_line = 0;
    let mut lines = Vec::new();

    for (line_index, range) in wrap_ranges(&chars, width).into_iter().enumerate() {
        if range.contains(&cursor) {
            cursor_line = line_index;
        }
        let spans: Vec<Span> = range
            .map(|i| {
                let (c, state) = states[i];
                let style = if show_cursor && i == cursor {
                    palette.cursor(session.is_started())
                } else {
                    match state {
                        CharState::Pending => palette.pending(),
                        CharState::Correct => palette.correct(),
                        CharState::Incorrect => palette.incorrect(),
                    }
                };
                Span::styled(c.to_string(), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    (lines, cursor_line)
}

/// Split `chars` into lines of at most `width`, breaking after spaces.
///
/// Words longer than a line are hard-broken.
fn wrap_ranges(chars: &[char], width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let mut ranges = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        if chars.len() - start <= width {
            ranges.push(start..chars.len());
            break;
        }
        let window = &chars[start..start + width];
        let end = match window.iter().rposition(|&c| c == ' ') {
            Some(i) if i > 0 => start + i + 1,
            _ => start + width,
        };
        ranges.push(start..end);
        start = end;
    }

    ranges
}

// ============================================================================
// SCREEN: RESULTS
// ============================================================================

fn render_results(
    summary: &Summary,
    session: &TypingSession,
    app: &App,
    palette: &Palette,
    frame: &mut Frame,
    area: Rect,
) {
    let result = &summary.result;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("wpm", palette.label())),
        Line::from(Span::styled(result.wpm.to_string(), palette.title())),
        Line::from(""),
        Line::from(Span::styled("acc", palette.label())),
        Line::from(Span::styled(format!("{}%", result.accuracy), palette.title())),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} characters in {:.1}s",
                result.chars_typed,
                result.elapsed_ms as f64 / 1000.0
            ),
            palette.label(),
        )),
    ];

    let heatmap = session.error_heatmap();
    if !heatmap.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("ERROR HEAT MAP", palette.label())));
        let mut cells = Vec::new();
        for entry in heatmap {
            let key = if entry.key == ' ' { '␣' } else { entry.key };
            cells.push(Span::styled(
                format!("[{} {}x]", key, entry.count),
                theme::heat_style(entry.heat),
            ));
            cells.push(Span::raw(" "));
        }
        lines.push(Line::from(cells));
    }

    if !summary.unlocked.is_empty() {
        lines.push(Line::from(""));
        for id in &summary.unlocked {
            if let Some(achievement) = app.profile.achievement(*id) {
                lines.push(Line::from(vec![
                    Span::styled("★ Achievement unlocked: ", palette.highlight()),
                    Span::styled(achievement.name.clone(), palette.correct()),
                ]));
            }
        }
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// OVERLAYS
// ============================================================================

fn render_overlay(app: &App, overlay: Overlay, palette: &Palette, frame: &mut Frame, area: Rect) {
    let (title, lines, width) = match overlay {
        Overlay::Settings { cursor } => (
            "Difficulty",
            settings_lines(app.difficulty, cursor, palette),
            34,
        ),
        Overlay::Stats => ("Typing Statistics", stats_lines(&app.profile, palette), 64),
        Overlay::Achievements => (
            "Achievements",
            achievement_lines(&app.profile.achievements, palette),
            64,
        ),
        Overlay::Themes { cursor } => ("Theme", theme_lines(app.theme, cursor, palette), 26),
    };

    // Content rows plus the top and bottom border
    let height = lines.len() as u16 + 2;
    let panel = centered(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .title(Span::styled(format!(" {} ", title), palette.title()))
        .style(palette.base());

    frame.render_widget(Clear, panel);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        panel,
    );
}

fn settings_lines(current: Difficulty, cursor: usize, palette: &Palette) -> Vec<Line<'static>> {
    Difficulty::SELECTABLE
        .iter()
        .enumerate()
        .map(|(i, &level)| {
            let marker = if level == current { "●" } else { "○" };
            let text = format!(" {} [{}] {}", marker, i + 1, level);
            if i == cursor {
                Line::from(Span::styled(text, palette.selected()))
            } else {
                Line::from(Span::styled(text, palette.correct()))
            }
        })
        .collect()
}

fn theme_lines(current: ThemeName, cursor: usize, palette: &Palette) -> Vec<Line<'static>> {
    ThemeName::ALL
        .iter()
        .enumerate()
        .map(|(i, &theme)| {
            let marker = if theme == current { "●" } else { " " };
            let text = format!(" {} {}", marker, theme.as_str().to_uppercase());
            if i == cursor {
                Line::from(Span::styled(text, palette.selected()))
            } else {
                Line::from(Span::styled(text, palette.label()))
            }
        })
        .collect()
}

fn stats_lines(profile: &Profile, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{:<20}{:<20}{}", "Tests Completed", "Avg. WPM", "Streak"),
            palette.label(),
        )),
        Line::from(Span::styled(
            format!(
                "{:<20}{:<20}{}",
                profile.tests_completed(),
                profile.average_wpm(),
                profile.streak_label()
            ),
            palette.title(),
        )),
        Line::from(""),
        Line::from(Span::styled("RECENT TESTS", palette.label())),
        Line::from(Span::styled(
            format!("{:<14}{:<8}{:<12}{}", "DATE", "WPM", "ACCURACY", "DIFFICULTY"),
            palette.label(),
        )),
    ];

    let recent = profile.recent(RECENT_TESTS);
    if recent.is_empty() {
        lines.push(Line::from(Span::styled("No history yet", palette.label())));
    }
    for entry in recent {
        lines.push(Line::from(Span::styled(
            format!(
                "{:<14}{:<8}{:<12}{}",
                entry_date(entry).to_string(),
                entry.wpm,
                format!("{}%", entry.accuracy),
                entry.difficulty
            ),
            palette.correct(),
        )));
    }

    lines
}

fn achievement_lines(achievements: &[Achievement], palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for a in achievements {
        let (mark, name_style) = if a.unlocked {
            ("★", palette.highlight())
        } else {
            ("☆", palette.label())
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", mark), name_style),
            Span::styled(a.name.clone(), name_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", a.description),
            palette.label(),
        )));
        if let Some(ratio) = a.progress_ratio() {
            let filled = (ratio * ACHIEVEMENT_BAR_WIDTH as f64).round() as usize;
            let bar_style = if a.unlocked { palette.progress() } else { palette.label() };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("█".repeat(filled), bar_style),
                Span::styled("░".repeat(ACHIEVEMENT_BAR_WIDTH - filled), palette.border()),
                Span::styled(
                    format!(" {}/{}", a.progress.unwrap_or(0), a.goal.unwrap_or(0)),
                    palette.label(),
                ),
            ]));
        }
    }

    lines
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::QuoteDeck;
    use crate::tui::state::Action;
    use crate::tui::update::update;
    use crate::types::SessionResult;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    const DAY_MS: u64 = 20_744 * 86_400_000;

    fn make_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(90, 30);
        Terminal::new(backend).unwrap()
    }

    fn app_with_quote(quote: &str) -> App {
        let deck = QuoteDeck::new(vec![quote.to_string()], 11);
        App::new(deck, Difficulty::Medium, ThemeName::Dark, Profile::default())
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    fn finished_app() -> App {
        let mut app = app_with_quote("the lazy dog");
        for c in "the lazx dog".chars() {
            update(&mut app, &Action::Type(c), DAY_MS);
        }
        app
    }

    #[test]
    fn typing_screen_shows_quote_and_prompt() {
        let mut terminal = make_terminal();
        let app = app_with_quote("quick brown fox");
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("quick brown fox"));
        assert!(content.contains("START TYPING"));
        assert!(content.contains("MEDIUM"));
    }

    #[test]
    fn typing_screen_shows_live_wpm_once_started() {
        let mut terminal = make_terminal();
        let mut app = app_with_quote("quick brown fox");
        update(&mut app, &Action::Type('q'), 0);
        terminal.draw(|frame| render(&app, frame)).unwrap();

        assert!(buffer_text(&terminal).contains("WPM"));
    }

    #[test]
    fn results_screen_shows_scores_and_heat_map() {
        let mut terminal = make_terminal();
        let app = finished_app();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("wpm"));
        assert!(content.contains("91%"));
        assert!(content.contains("ERROR HEAT MAP"));
        assert!(content.contains("[x 1x]"));
        assert!(content.contains("First Steps"));
    }

    #[test]
    fn stats_panel_without_history() {
        let mut terminal = make_terminal();
        let mut app = app_with_quote("abc");
        app.overlay = Some(Overlay::Stats);
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Typing Statistics"));
        assert!(content.contains("No history yet"));
    }

    #[test]
    fn stats_panel_lists_recent_tests() {
        let mut terminal = make_terminal();
        let mut app = finished_app();
        app.overlay = Some(Overlay::Stats);
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("2026-10-18"));
        assert!(content.contains("1 day"));
    }

    #[test]
    fn achievements_panel_shows_progress() {
        let mut terminal = make_terminal();
        let mut app = finished_app();
        app.overlay = Some(Overlay::Achievements);
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Keyboard Warrior"));
        assert!(content.contains("12/1000"));
        assert!(content.contains("1/5"));
    }

    #[test]
    fn theme_panel_shows_every_theme_inside_its_border() {
        let mut terminal = make_terminal();
        let mut app = app_with_quote("abc");
        app.overlay = Some(Overlay::themes(ThemeName::Dark));
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        for theme in ThemeName::ALL {
            assert!(content.contains(&theme.as_str().to_uppercase()), "{} missing", theme);
        }
        // One top and one bottom border row
        assert_eq!(content.matches('┌').count(), 1);
        assert_eq!(content.matches('└').count(), 1);
    }

    #[test]
    fn wrap_breaks_after_spaces() {
        let chars: Vec<char> = "aaa bbb ccc".chars().collect();
        assert_eq!(wrap_ranges(&chars, 8), vec![0..8, 8..11]);
    }

    #[test]
    fn wrap_hard_breaks_long_words() {
        let chars: Vec<char> = "abcdefghij".chars().collect();
        assert_eq!(wrap_ranges(&chars, 4), vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn long_quote_scrolls_to_the_cursor() {
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).unwrap();
        let quote = "word ".repeat(40);
        let mut app = app_with_quote(quote.trim_end());
        for c in quote.chars().take(150) {
            update(&mut app, &Action::Type(c), 0);
        }
        terminal
            .draw(|frame| render(&app, frame))
            .expect("render should not panic");
    }

    #[test]
    fn all_screens_and_overlays_render_in_every_theme() {
        let mut terminal = make_terminal();
        let overlays = [
            None,
            Some(Overlay::Settings { cursor: 1 }),
            Some(Overlay::Stats),
            Some(Overlay::Achievements),
            Some(Overlay::Themes { cursor: 4 }),
        ];
        let summary = Summary {
            result: SessionResult {
                wpm: 70,
                accuracy: 98,
                chars_typed: 300,
                quote_length: 300,
                elapsed_ms: 51_000,
            },
            unlocked: vec![],
        };

        for theme in ThemeName::ALL {
            for overlay in overlays {
                for screen in [Screen::Typing, Screen::Results(summary.clone())] {
                    let mut app = app_with_quote("some quote text");
                    app.theme = theme;
                    app.overlay = overlay;
                    app.screen = screen;
                    terminal
                        .draw(|frame| render(&app, frame))
                        .expect("every screen should render without panic");
                }
            }
        }
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(10, 3)).unwrap();
        let mut app = app_with_quote("abc def");
        app.overlay = Some(Overlay::Achievements);
        terminal
            .draw(|frame| render(&app, frame))
            .expect("render should not panic");
    }
}
