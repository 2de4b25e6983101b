use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;
use crate::app::{App, FocusPane};
use crate::conversation::Sender;
use crate::menu;

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    // Menu on the left, chat on the right
    let [menu_area, chat_panel] = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ])
    .areas(body_area);

    render_header(frame, header_area);
    render_menu(app, frame, menu_area);
    render_chat(app, frame, chat_panel);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Restaurant FAQ Bot ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("Your 24/7 Dining Assistant", Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);
}

/// The wrapped menu, without its border. Also used to measure scroll range.
pub fn menu_paragraph() -> Paragraph<'static> {
    Paragraph::new(Text::from(menu::menu_lines())).wrap(Wrap { trim: false })
}

/// The wrapped chat transcript, without its border
pub fn transcript(app: &App) -> Paragraph<'static> {
    Paragraph::new(Text::from(chat_lines(app))).wrap(Wrap { trim: false })
}

/// Terminal column of the cursor within the draft, counting wide glyphs as two
fn cursor_column(draft: &str, cursor: usize) -> usize {
    draft.chars().take(cursor).map(|c| c.width().unwrap_or(0)).sum()
}

fn render_menu(app: &mut App, frame: &mut Frame, area: Rect) {
    app.menu_area = Some(area);
    app.menu_height = area.height.saturating_sub(2);
    app.menu_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == FocusPane::Menu))
        .title(" Menu Insights ");

    let menu = menu_paragraph().block(block).scroll((app.menu_scroll, 0));

    frame.render_widget(menu, area);
}

fn chat_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in app.conversation.messages() {
        let label = match msg.sender {
            Sender::User => Span::styled(
                "You:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Sender::Bot => Span::styled(
                "Bot:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        };
        lines.push(Line::from(label));
        for line in msg.text.split('\n') {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::default());
    }

    if app.conversation.is_busy() {
        lines.push(Line::from(Span::styled(
            "Bot:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Chat history on top, input at the bottom
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    app.chat_area = Some(chat_area);
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == FocusPane::Chat))
        .title(" Chat ");

    let chat = transcript(app).block(chat_block).scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    render_input(app, frame, input_area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let enabled = app.input_enabled();
    let focused = app.focus == FocusPane::Input;

    let (title, text) = if !enabled {
        (
            " Ask a question (waiting for reply) ",
            Span::styled(app.conversation.draft().to_string(), Style::default().fg(Color::DarkGray)),
        )
    } else if app.conversation.draft().is_empty() {
        (
            " Ask a question (Enter to send) ",
            Span::styled("Ask a question...", Style::default().fg(Color::DarkGray)),
        )
    } else {
        (" Ask a question (Enter to send) ", Span::raw(app.conversation.draft().to_string()))
    };

    let border = if enabled {
        border_style(focused)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border).title(title);

    // Keep the cursor visible on long drafts
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_col = cursor_column(app.conversation.draft(), app.input_cursor);
    let h_scroll = cursor_col.saturating_sub(inner_width.saturating_sub(1));

    let input = Paragraph::new(Line::from(text))
        .block(block)
        .scroll((0, h_scroll as u16));
    frame.render_widget(input, area);

    if focused && enabled {
        let cursor_x = area.x + 1 + (cursor_col - h_scroll) as u16;
        frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let pane = match app.focus {
        FocusPane::Input => " INPUT ",
        FocusPane::Menu => " MENU ",
        FocusPane::Chat => " CHAT ",
    };
    let hints = match app.focus {
        FocusPane::Input => " Enter send  Tab switch pane  Esc quit ",
        FocusPane::Menu | FocusPane::Chat => " j/k scroll  g/G top/bottom  Tab switch pane  q quit ",
    };

    let mut spans = vec![
        Span::styled(pane, Style::default().bg(Color::Blue).fg(Color::White)),
        Span::styled(hints, Style::default().fg(Color::Gray)),
    ];
    if app.has_pending_answer() {
        spans.push(Span::styled(
            format!(" waiting on {} ", app.endpoint()),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        let config = Config {
            endpoint: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        App::new(&config).unwrap()
    }

    fn draw(app: &mut App) -> String {
        draw_sized(app, 100, 30)
    }

    fn draw_sized(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_shows_menu_and_greeting() {
        let mut app = test_app();
        let screen = draw(&mut app);
        assert!(screen.contains("Menu Insights"));
        assert!(screen.contains("Vegetarian Lasagna"));
        assert!(screen.contains("~480 kcal"));
        assert!(screen.contains("500–700 kcal"));
        assert!(screen.contains("Hello! How can I help you"));
        assert!(screen.contains("Ask a question..."));
    }

    #[test]
    fn test_render_records_pane_geometry() {
        let mut app = test_app();
        draw(&mut app);
        assert!(app.menu_area.is_some());
        assert!(app.chat_area.is_some());
        assert_eq!(app.chat_height, 30 - 1 - 1 - 3 - 2);
        assert_eq!(app.menu_height, 30 - 1 - 1 - 2);
        assert_eq!(app.menu_width, 40 - 2);
    }

    #[test]
    fn test_menu_banner_and_items_visible_at_80_columns() {
        let mut app = test_app();
        let screen = draw_sized(&mut app, 80, 30);
        assert!(screen.contains("Recommended calorie"));
        assert!(screen.contains("500–700 kcal"));
        assert!(screen.contains("~480 kcal"));
        assert!(screen.contains("~150 kcal"));
    }

    #[test]
    fn test_autoscroll_reveals_end_of_wrapped_reply() {
        let mut app = test_app();
        draw_sized(&mut app, 80, 20);

        let mut reply = vec!["abcdefghijklmnopqrstuvwx"; 10].join(" ");
        reply.push_str(" FINALWORD");
        app.conversation.edit_draft("Tell me everything about the specials");
        let pending = app.conversation.submit().unwrap();
        app.conversation.settle::<String>(pending, Ok(reply));

        for _ in 0..200 {
            app.tick();
        }
        let screen = draw_sized(&mut app, 80, 20);
        assert!(screen.contains("FINALWORD"), "{screen}");
    }

    #[test]
    fn test_input_disabled_exactly_while_busy() {
        let mut app = test_app();
        let idle = draw(&mut app);
        assert!(idle.contains("(Enter to send)"));
        assert!(!idle.contains("(waiting for reply)"));

        app.conversation.edit_draft("Is the kitchen open late?");
        let pending = app.conversation.submit().unwrap();
        let busy = draw(&mut app);
        assert!(busy.contains("(waiting for reply)"));
        assert!(busy.contains("Typing."));
        assert!(!busy.contains("(Enter to send)"));

        app.conversation.settle::<String>(pending, Ok("Until 11pm.".to_string()));
        let settled = draw(&mut app);
        assert!(settled.contains("(Enter to send)"));
        assert!(!settled.contains("(waiting for reply)"));
        assert!(!settled.contains("Typing"));
        assert!(settled.contains("Until 11pm."));
    }

    #[test]
    fn test_cursor_column_counts_display_width() {
        assert_eq!(cursor_column("pasta", 3), 3);
        assert_eq!(cursor_column("寿司 ok", 2), 4);
        assert_eq!(cursor_column("寿司 ok", 4), 6);
        assert_eq!(cursor_column("", 0), 0);
    }

    #[test]
    fn test_menu_renders_identically_twice() {
        let mut app = test_app();
        let first = draw(&mut app);
        let second = draw(&mut app);
        assert_eq!(first, second);
    }

    #[test]
    fn test_chat_lines_label_senders_and_typing() {
        let mut app = test_app();
        app.conversation.edit_draft("Do you take reservations?");
        let _pending = app.conversation.submit().unwrap();

        let text: Vec<String> = chat_lines(&app).iter().map(|line| line.to_string()).collect();
        assert_eq!(text[0], "Bot:");
        assert_eq!(text[3], "You:");
        assert_eq!(text[4], "Do you take reservations?");
        assert_eq!(text[text.len() - 2], "Bot:");
        assert_eq!(text[text.len() - 1], "Typing.");
    }
}
