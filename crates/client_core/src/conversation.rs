use std::{
    fmt,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};
use shared::{domain::Location, protocol::ChatRequest};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::SharedFoodApi;

pub const APOLOGY_TEXT: &str =
    "I'm having trouble connecting to the food assistant. Please try again later.";

pub const QUICK_SUGGESTIONS: [&str; 5] = [
    "I'm hungry, suggest something",
    "What's good for this weather?",
    "Show me healthy options",
    "Something spicy please",
    "Quick snack ideas",
];

pub fn greeting_text(location: &Location) -> String {
    format!(
        "Hi! I'm your AI food assistant. I can help you find great food recommendations \
         based on your location in {location}. What are you in the mood for today?"
    )
}

/// Creation time plus a per-transcript sequence number, so two messages
/// created in the same instant still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId {
    pub created_nanos: i64,
    pub seq: u64,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}-{}", self.created_nanos, self.seq)
    }
}

#[derive(Debug, Default)]
struct MessageIdGenerator {
    next_seq: AtomicU64,
}

impl MessageIdGenerator {
    fn next(&self, created_at: DateTime<Utc>) -> MessageId {
        MessageId {
            created_nanos: created_at
                .timestamp_nanos_opt()
                .unwrap_or_else(|| created_at.timestamp_micros().saturating_mul(1_000)),
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty or whitespace-only input; nothing happened.
    Ignored,
    /// Another submission is still outstanding; nothing happened.
    Busy,
    Replied,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationView {
    pub messages: Vec<ChatMessage>,
    pub is_composing: bool,
    pub demo_mode: bool,
}

#[derive(Debug, Default)]
struct ConversationState {
    messages: Vec<ChatMessage>,
    demo_mode: bool,
}

/// Append-only chat transcript with the food assistant.
pub struct ConversationController {
    api: SharedFoodApi,
    ids: MessageIdGenerator,
    state: Mutex<ConversationState>,
    composing: AtomicBool,
}

/// Clears the composing flag however the submission ends.
struct ComposingGuard<'a>(&'a AtomicBool);

impl Drop for ComposingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ConversationController {
    /// Opens the transcript with a greeting for `location`. Later location
    /// changes do not re-greet.
    pub fn new(api: SharedFoodApi, location: &Location) -> Self {
        let ids = MessageIdGenerator::default();
        let created_at = Utc::now();
        let greeting = ChatMessage {
            id: ids.next(created_at),
            text: greeting_text(location),
            sender: Sender::Assistant,
            created_at,
            is_error: false,
        };
        Self {
            api,
            ids,
            state: Mutex::new(ConversationState {
                messages: vec![greeting],
                demo_mode: false,
            }),
            composing: AtomicBool::new(false),
        }
    }

    /// Appends the user's message right away, then one assistant reply (or
    /// an apology when the backend fails). Only one submission may be
    /// outstanding at a time.
    pub async fn submit(&self, text: &str, location: &Location) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self
            .composing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("chat: submission rejected while a reply is pending");
            return SubmitOutcome::Busy;
        }
        let _composing = ComposingGuard(&self.composing);

        self.append(text.to_string(), Sender::User, false).await;
        info!("chat: sending chars={} location={location}", text.chars().count());

        let result = self
            .api
            .chat(ChatRequest {
                message: text.to_string(),
                location: location.clone(),
            })
            .await;

        match result {
            Ok(response) => {
                let reply = response.response.unwrap_or_default();
                let demo_mode = response.demo_mode.unwrap_or(false);
                let mut state = self.state.lock().await;
                state.demo_mode = demo_mode;
                let message = self.message(reply, Sender::Assistant, false);
                state.messages.push(message);
                info!("chat: replied demo_mode={demo_mode}");
                SubmitOutcome::Replied
            }
            Err(err) => {
                warn!("chat: request failed location={location} error={err}");
                let mut state = self.state.lock().await;
                state.demo_mode = true;
                let message = self.message(APOLOGY_TEXT.to_string(), Sender::Assistant, true);
                state.messages.push(message);
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().await.messages.clone()
    }

    pub async fn view(&self) -> ConversationView {
        let state = self.state.lock().await;
        ConversationView {
            messages: state.messages.clone(),
            is_composing: self.is_composing(),
            demo_mode: state.demo_mode,
        }
    }

    /// True while a submission awaits its reply; input should be disabled.
    pub fn is_composing(&self) -> bool {
        self.composing.load(Ordering::SeqCst)
    }

    async fn append(&self, text: String, sender: Sender, is_error: bool) {
        let message = self.message(text, sender, is_error);
        self.state.lock().await.messages.push(message);
    }

    fn message(&self, text: String, sender: Sender, is_error: bool) -> ChatMessage {
        let created_at = Utc::now();
        ChatMessage {
            id: self.ids.next(created_at),
            text,
            sender,
            created_at,
            is_error,
        }
    }
}

#[cfg(test)]
#[path = "tests/conversation_tests.rs"]
mod tests;
