use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use time_humanize::HumanTime;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Screen};
use crate::clock::Clock;
use crate::corpus::Difficulty;
use crate::diff::{mark_chars, Outcome};
use crate::result::TestResult;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen() {
            Screen::Menu => render_menu(self, area, buf),
            Screen::Typing => render_typing(self, area, buf),
            Screen::Results => render_results(self, area, buf),
            Screen::History { mine_only } => render_history(self, mine_only, area, buf),
        }
    }
}

fn vertical(area: Rect, constraints: &[Constraint]) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(constraints.to_vec())
        .split(area)
        .to_vec()
}

fn legend(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(text, italic()))
}

fn status_line<C: Clock>(app: &App<C>) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        app.status().unwrap_or_default(),
        Style::default().fg(Color::Red),
    ))
    .alignment(Alignment::Center)
}

fn render_menu<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let chunks = vertical(
        area,
        &[
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ],
    );

    Paragraph::new(Span::styled(
        format!("Hello {}! Pick a difficulty.", app.controller().user_name()),
        bold().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let available = app.corpus().difficulties();
    let lines: Vec<Line> = Difficulty::ALL
        .iter()
        .enumerate()
        .map(|(i, difficulty)| {
            let selected = *difficulty == app.difficulty();
            let marker = if selected { ">" } else { " " };
            let style = match (selected, available.contains(difficulty)) {
                (_, false) => Style::default().add_modifier(Modifier::DIM),
                (true, true) => bold().fg(Color::Yellow),
                (false, true) => Style::default(),
            };
            Line::from(Span::styled(
                format!(
                    "{marker} {}. {:<7} {}",
                    i + 1,
                    difficulty.to_string(),
                    difficulty.description()
                ),
                style,
            ))
        })
        .collect();

    Paragraph::new(lines).render(chunks[2], buf);
    status_line(app).render(chunks[3], buf);
    legend("(1/2/3) or (↑/↓ enter) start / (h)istory / (a)ll history / (q)uit")
        .render(chunks[4], buf);
}

/// Spans for the current sentence, colored by how the input compares.
fn sentence_spans(reference: &str, typed: &str) -> Vec<Span<'static>> {
    let green_bold = bold().fg(Color::Green);
    let red_bold = bold().fg(Color::Red);
    let cursor = dim_bold().add_modifier(Modifier::UNDERLINED);

    let mut cursor_placed = false;
    mark_chars(reference, typed)
        .into_iter()
        .map(|mark| match mark.outcome {
            Outcome::Correct => Span::styled(mark.char.to_string(), green_bold),
            Outcome::Incorrect => Span::styled(
                match mark.char {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold,
            ),
            Outcome::Pending if !cursor_placed => {
                cursor_placed = true;
                Span::styled(mark.char.to_string(), cursor)
            }
            Outcome::Pending => Span::styled(mark.char.to_string(), dim_bold()),
        })
        .collect()
}

fn render_typing<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.controller().session() else {
        return;
    };
    let sentence = session.current_sentence();

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let sentence_lines = if sentence.width() <= max_chars_per_line as usize {
        1
    } else {
        (sentence.width() as f64 / max_chars_per_line as f64).ceil() as u16 + 1
    };

    let chunks = vertical(
        area,
        &[
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(sentence_lines),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ],
    );

    Paragraph::new(Span::styled(
        format!(
            "Sentence {} of {}  ·  {}",
            session.current_index() + 1,
            session.sentences().len(),
            session.difficulty()
        ),
        dim_bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Line::from(sentence_spans(sentence, app.input())))
        .alignment(if sentence_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    Paragraph::new(format!("> {}", app.input()))
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: false })
        .render(chunks[4], buf);

    let live = app.live();
    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {} spm   {:.1}% acc   {}s",
            live.wpm, live.spm, live.accuracy, live.elapsed_secs
        ),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    status_line(app).render(chunks[7], buf);
    legend("(enter) next sentence / (esc) finish / (ctrl+r) reset / (ctrl+c) quit")
        .render(chunks[8], buf);
}

fn render_results<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let Some(result) = app.last_result() else {
        return;
    };

    let chunks = vertical(
        area,
        &[
            Constraint::Length(9),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ],
    );

    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<14}"), dim_bold()),
            Span::styled(value, bold()),
        ])
    };

    let summary = vec![
        row("User Name:", result.user_name.clone()),
        row("Difficulty:", result.difficulty.to_string()),
        row("Language:", result.language.clone()),
        row("WPM:", format!("{} words/minute", result.wpm)),
        row("SPM:", format!("{} sentences/minute", result.spm)),
        row("Accuracy:", format!("{:.2}%", result.accuracy)),
        row("Date & Time:", result.formatted_timestamp()),
    ];

    Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title("Test Summary"))
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        result.summary_message(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[2], buf);

    status_line(app).render(chunks[4], buf);
    legend("(r)etry / (n)ew / (h)istory / (a)ll history / (esc)ape").render(chunks[5], buf);
}

/// How long ago `result` was recorded, in words.
pub fn time_ago(result: &TestResult) -> String {
    let secs = (Local::now() - result.timestamp).num_seconds().max(0);
    HumanTime::from_seconds(-secs).to_string()
}

fn render_history<C: Clock>(app: &App<C>, mine_only: bool, area: Rect, buf: &mut Buffer) {
    let chunks = vertical(area, &[Constraint::Min(3), Constraint::Length(1)]);

    let title = if mine_only {
        format!("Test History for {}", app.controller().user_name())
    } else {
        "All Test History".to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let entries = app.visible_history();
    if entries.is_empty() {
        Paragraph::new(
            "No test history found. Take a test to start building your history!",
        )
        .block(block)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);
    } else {
        let header = Row::new(vec![
            Cell::from("User"),
            Cell::from("Difficulty"),
            Cell::from("WPM"),
            Cell::from("SPM"),
            Cell::from("Accuracy"),
            Cell::from("When"),
        ])
        .style(bold().fg(Color::Yellow));

        let rows: Vec<Row> = entries
            .iter()
            .map(|result| {
                Row::new(vec![
                    Cell::from(result.user_name.clone()),
                    Cell::from(result.difficulty.to_string()),
                    Cell::from(result.wpm.to_string()),
                    Cell::from(result.spm.to_string()),
                    Cell::from(format!("{:.2}%", result.accuracy)),
                    Cell::from(time_ago(result)),
                ])
            })
            .collect();

        Table::new(
            rows,
            [
                Constraint::Length(15),
                Constraint::Length(11),
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Length(10),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block)
        .render(chunks[0], buf);
    }

    legend("(tab) mine/all / (b)ack").render(chunks[1], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::corpus::Corpus;
    use crate::history::MemoryHistoryStore;
    use crate::session::SessionController;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn create_test_app() -> App<ManualClock> {
        App::with_clock(
            SessionController::with_clock("ada", ManualClock::new()),
            Corpus::builtin().unwrap(),
            Box::new(MemoryHistoryStore::new()),
            Difficulty::Easy,
        )
    }

    fn press(app: &mut App<ManualClock>, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn render(app: &App<ManualClock>) -> String {
        let area = Rect::new(0, 0, 100, 30);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);

        buffer
            .content()
            .chunks(area.width as usize)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_menu_lists_difficulties() {
        let app = create_test_app();
        let rendered = render(&app);

        assert!(rendered.contains("Hello ada!"));
        assert!(rendered.contains("Easy"));
        assert!(rendered.contains("Complex long sentences"));
    }

    #[test]
    fn test_typing_screen_shows_sentence_and_counter() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('T'));

        let rendered = render(&app);

        assert!(rendered.contains("Sentence 1 of 5"));
        assert!(rendered.contains("The cat sat on the mat."));
        assert!(rendered.contains("> T"));
        assert!(rendered.contains("% acc"));
    }

    #[test]
    fn test_results_screen_shows_summary() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        let rendered = render(&app);

        assert!(rendered.contains("Test Summary"));
        assert!(rendered.contains("words/minute"));
        assert!(rendered.contains("Great job ada!"));
    }

    #[test]
    fn test_history_screen_empty_and_filled() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Char('a'));
        assert!(render(&app).contains("No test history found"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('h'));

        let rendered = render(&app);
        assert!(rendered.contains("Test History for ada"));
        assert!(rendered.contains("Easy"));
    }

    #[test]
    fn test_sentence_spans_mark_space_errors() {
        let spans = sentence_spans("a b", "a-");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].content, "a");
        assert_eq!(spans[1].content, "-");
        assert_eq!(spans[2].content, "b");

        let spans = sentence_spans("ab", "a b");
        assert_eq!(spans[1].content, "·");
    }

    #[test]
    fn test_time_ago_is_in_the_past() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        let mut result = app.last_result().unwrap().clone();
        result.timestamp = Local::now() - chrono::Duration::minutes(5);

        assert!(time_ago(&result).contains("ago"));
    }
}
