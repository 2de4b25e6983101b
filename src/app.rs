use anyhow::anyhow;
use ratatui::layout::Rect;
use tokio::task::JoinHandle;
use crate::answer::{AnswerClient, AnswerError};
use crate::config::Config;
use crate::conversation::{Conversation, PendingQuestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Menu,
    Chat,
}

impl FocusPane {
    pub fn next(self) -> Self {
        match self {
            FocusPane::Input => FocusPane::Menu,
            FocusPane::Menu => FocusPane::Chat,
            FocusPane::Chat => FocusPane::Input,
        }
    }
}

/// The question currently waiting on the answer service
struct InFlight {
    pending: PendingQuestion,
    task: JoinHandle<Result<String, AnswerError>>,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,
    pub focus: FocusPane,

    pub conversation: Conversation,
    pub input_cursor: usize, // cursor position in the draft, in chars
    answer_client: AnswerClient,
    in_flight: Option<InFlight>,

    // Chat view state
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the chat pane, set during render
    pub chat_width: u16,  // inner width of the chat pane, set during render
    chat_scroll_target: Option<u16>,
    seen_message_count: usize,

    // Menu view state
    pub menu_scroll: u16,
    pub menu_height: u16,
    pub menu_width: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub menu_area: Option<Rect>,
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let answer_client = AnswerClient::new(&config.endpoint, config.request_timeout())?;
        let conversation = Conversation::new();
        let seen_message_count = conversation.messages().len();

        Ok(Self {
            should_quit: false,
            focus: FocusPane::Input,

            conversation,
            input_cursor: 0,
            answer_client,
            in_flight: None,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_scroll_target: None,
            seen_message_count,

            menu_scroll: 0,
            menu_height: 0,
            menu_width: 0,

            animation_frame: 0,

            menu_area: None,
            chat_area: None,
        })
    }

    pub fn endpoint(&self) -> String {
        self.answer_client.endpoint()
    }

    // Draft editing. The input is disabled while a reply is outstanding.

    pub fn input_enabled(&self) -> bool {
        !self.conversation.is_busy()
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.input_enabled() {
            return;
        }
        let mut draft = self.conversation.draft().to_string();
        let byte_pos = char_to_byte_index(&draft, self.input_cursor);
        draft.insert(byte_pos, c);
        self.conversation.edit_draft(draft);
        self.input_cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if !self.input_enabled() || self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        let mut draft = self.conversation.draft().to_string();
        let byte_pos = char_to_byte_index(&draft, self.input_cursor);
        draft.remove(byte_pos);
        self.conversation.edit_draft(draft);
    }

    pub fn delete_at_cursor(&mut self) {
        if !self.input_enabled() {
            return;
        }
        let mut draft = self.conversation.draft().to_string();
        if self.input_cursor < draft.chars().count() {
            let byte_pos = char_to_byte_index(&draft, self.input_cursor);
            draft.remove(byte_pos);
            self.conversation.edit_draft(draft);
        }
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.conversation.draft().chars().count();
        self.input_cursor = (self.input_cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.conversation.draft().chars().count();
    }

    // Request lifecycle

    /// Submit the draft and dispatch the question in the background.
    pub fn submit(&mut self) {
        let Some(pending) = self.conversation.submit() else {
            return;
        };
        self.input_cursor = 0;

        let client = self.answer_client.clone();
        let query = pending.query().to_string();
        let task = tokio::spawn(async move { client.ask(&query).await });
        self.in_flight = Some(InFlight { pending, task });
        self.follow_new_messages();
    }

    pub fn has_pending_answer(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Settle the conversation if the background request has finished
    pub async fn poll_answer(&mut self) {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.task.is_finished());
        if finished {
            self.wait_for_answer().await;
        }
    }

    /// Wait for the outstanding request, however long it takes, and settle it
    pub async fn wait_for_answer(&mut self) {
        let Some(InFlight { pending, task }) = self.in_flight.take() else {
            return;
        };

        let outcome = match task.await {
            Ok(result) => result.map_err(anyhow::Error::from),
            Err(join_err) => {
                tracing::error!(error = %join_err, "answer task did not complete");
                Err(anyhow!("answer task did not complete: {join_err}"))
            }
        };
        self.conversation.settle(pending, outcome);
        self.follow_new_messages();
    }

    /// Abandon any outstanding request when the session ends
    pub fn shutdown(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            tracing::info!(query = %in_flight.pending.query(), "aborting outstanding question");
            in_flight.task.abort();
        }
    }

    /// Tick animation and scrolling (called by Tick event)
    pub fn tick(&mut self) {
        if self.conversation.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }

        self.follow_new_messages();
        self.step_chat_scroll();
    }

    // Chat scrolling

    /// Total rows of the chat transcript at the current pane width.
    /// Measured with the same word wrap the chat pane renders with.
    pub fn chat_content_rows(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 { self.chat_width } else { 50 };
        let rows = crate::ui::transcript(self).line_count(wrap_width);
        rows.min(u16::MAX as usize) as u16
    }

    fn chat_bottom(&self) -> u16 {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.chat_content_rows().saturating_sub(visible_height)
    }

    /// Start gliding to the newest entry whenever the message list grew
    fn follow_new_messages(&mut self) {
        let count = self.conversation.messages().len();
        if count != self.seen_message_count {
            self.seen_message_count = count;
            self.chat_scroll_target = Some(self.chat_bottom());
        }
    }

    fn step_chat_scroll(&mut self) {
        if self.chat_scroll_target.is_none() {
            return;
        }
        // Re-aim every step: the pane may have been resized or the spinner appeared.
        let target = self.chat_bottom();

        if self.chat_scroll < target {
            let step = ((target - self.chat_scroll) / 3).max(1);
            self.chat_scroll += step;
        } else if self.chat_scroll > target {
            let step = ((self.chat_scroll - target) / 3).max(1);
            self.chat_scroll -= step;
        }

        if self.chat_scroll == target {
            self.chat_scroll_target = None;
        } else {
            self.chat_scroll_target = Some(target);
        }
    }

    /// Keep the newest message in view across a terminal resize.
    /// A view resting on the bottom, or already gliding there, keeps following it.
    pub fn handle_resize(&mut self) {
        if self.chat_scroll_target.is_some() || self.chat_scroll >= self.chat_bottom() {
            self.chat_scroll_target = Some(self.chat_bottom());
        }
    }

    pub fn scroll_chat_down(&mut self, rows: u16) {
        self.chat_scroll_target = None;
        self.chat_scroll = self.chat_scroll.saturating_add(rows).min(self.chat_bottom());
    }

    pub fn scroll_chat_up(&mut self, rows: u16) {
        self.chat_scroll_target = None;
        self.chat_scroll = self.chat_scroll.saturating_sub(rows);
    }

    pub fn scroll_chat_to_top(&mut self) {
        self.chat_scroll_target = None;
        self.chat_scroll = 0;
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll_target = None;
        self.chat_scroll = self.chat_bottom();
    }

    // Menu scrolling

    fn menu_bottom(&self) -> u16 {
        // Before the first render, assume the pane at 100 columns
        let wrap_width = if self.menu_width > 0 { self.menu_width } else { 38 };
        let total = crate::ui::menu_paragraph().line_count(wrap_width);
        (total.min(u16::MAX as usize) as u16).saturating_sub(self.menu_height)
    }

    pub fn scroll_menu_down(&mut self, rows: u16) {
        self.menu_scroll = self.menu_scroll.saturating_add(rows).min(self.menu_bottom());
    }

    pub fn scroll_menu_up(&mut self, rows: u16) {
        self.menu_scroll = self.menu_scroll.saturating_sub(rows);
    }

    pub fn scroll_menu_to_top(&mut self) {
        self.menu_scroll = 0;
    }

    pub fn scroll_menu_to_bottom(&mut self) {
        self.menu_scroll = self.menu_bottom();
    }
}
