//! Conversation state and the submit/settle cycle with the answer service.
//!
//! The controller never talks to the network itself. `submit` hands back a
//! [`PendingQuestion`] for the caller to dispatch, and the caller feeds the
//! outcome back through [`Conversation::settle`], which is the only place the
//! busy flag is released.

use std::fmt::Display;

pub const GREETING: &str = "Hello! How can I help you with our restaurant today?";
pub const FALLBACK_REPLY: &str = "Sorry, I could not process your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One turn in the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into() }
    }

    fn bot(text: impl Into<String>) -> Self {
        Self { sender: Sender::Bot, text: text.into() }
    }
}

/// A question accepted by [`Conversation::submit`] that still owes a reply.
///
/// Deliberately not `Clone`: every accepted submission is settled once.
#[derive(Debug)]
#[must_use = "a pending question keeps the conversation busy until settled"]
pub struct PendingQuestion {
    query: String,
}

impl PendingQuestion {
    /// The draft exactly as typed, untrimmed.
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    draft: String,
    busy: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::bot(GREETING)],
            draft: String::new(),
            busy: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn edit_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Commit the draft as a user turn.
    ///
    /// Returns `None` without touching any state when the draft is blank or a
    /// question is already in flight.
    pub fn submit(&mut self) -> Option<PendingQuestion> {
        if self.busy || self.draft.trim().is_empty() {
            return None;
        }

        let query = std::mem::take(&mut self.draft);
        self.messages.push(Message::user(query.clone()));
        self.busy = true;

        tracing::info!(turns = self.messages.len(), "question submitted");
        Some(PendingQuestion { query })
    }

    /// Record the reply (or failure) for `pending` and release the busy flag.
    pub fn settle<E: Display>(&mut self, pending: PendingQuestion, outcome: Result<String, E>) {
        match outcome {
            Ok(answer) => {
                tracing::debug!(query = %pending.query, "answer received");
                self.messages.push(Message::bot(answer));
            }
            Err(err) => {
                tracing::warn!(query = %pending.query, error = %err, "answer retrieval failed");
                self.messages.push(Message::bot(FALLBACK_REPLY));
            }
        }
        self.busy = false;
    }
}
