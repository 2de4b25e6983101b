use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

const WHEEL_ROWS: u16 = 3;

pub async fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => app.handle_resize(),
        AppEvent::Tick => {
            app.poll_answer().await;
            app.tick();
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any pane
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    if key.code == KeyCode::Tab {
        app.focus = app.focus.next();
        return;
    }

    match app.focus {
        FocusPane::Input => handle_input_key(app, key),
        FocusPane::Menu => handle_menu_key(app, key),
        FocusPane::Chat => handle_chat_key(app, key),
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::Down => app.scroll_chat_down(1),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    let half_page = (app.menu_height / 2).max(1);
    match key.code {
        KeyCode::Esc => app.focus = FocusPane::Input,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_menu_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_menu_up(1),
        KeyCode::PageDown => app.scroll_menu_down(half_page),
        KeyCode::PageUp => app.scroll_menu_up(half_page),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_menu_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_menu_to_bottom(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    let half_page = (app.chat_height / 2).max(1);
    match key.code {
        KeyCode::Esc => app.focus = FocusPane::Input,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_chat_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::PageDown => app.scroll_chat_down(half_page),
        KeyCode::PageUp => app.scroll_chat_up(half_page),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_chat_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_chat_to_bottom(),
        KeyCode::Char('i') | KeyCode::Enter => app.focus = FocusPane::Input,
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    // Position-based scrolling: the wheel scrolls whichever pane it is over
    let in_menu = app.menu_area.is_some_and(|r| point_in_rect(x, y, r));
    let in_chat = app.chat_area.is_some_and(|r| point_in_rect(x, y, r));

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_menu {
                app.scroll_menu_down(WHEEL_ROWS);
            } else if in_chat {
                app.scroll_chat_down(WHEEL_ROWS);
            }
        }
        MouseEventKind::ScrollUp => {
            if in_menu {
                app.scroll_menu_up(WHEEL_ROWS);
            } else if in_chat {
                app.scroll_chat_up(WHEEL_ROWS);
            }
        }
        _ => {}
    }
}
