use crate::events::AppEvent;
use crate::gemini::{GeminiClient, GeminiError};
use crate::ui::conversation::{ConversationComposer, ConversationHistory, Message};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use tokio::sync::{mpsc, watch};
use tracing::error;

/// Transcript text appended when a completion request fails for any reason.
/// The underlying error goes to the log, never to the transcript.
pub const FETCH_ERROR: &str = "Error fetching response";

/// Phase of the typing-indicator animation. Advances on every timer tick,
/// whether or not a request is outstanding; nothing else reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotPhase {
    One,
    Two,
    Three,
}

impl DotPhase {
    pub fn next(self) -> Self {
        match self {
            DotPhase::One => DotPhase::Two,
            DotPhase::Two => DotPhase::Three,
            DotPhase::Three => DotPhase::One,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DotPhase::One => ".",
            DotPhase::Two => "..",
            DotPhase::Three => "...",
        }
    }
}

/// Owns the conversation state and mediates every transition: user input,
/// submission, and the settling of the one outstanding request.
///
/// Per submission the request lifecycle is Idle → Pending → Settled → Idle.
/// There is no cancellation path; a spawned request always runs until it
/// reports back through the event channel.
pub struct ConversationManager {
    history: ConversationHistory,
    composer: ConversationComposer,
    client: GeminiClient,
    events: mpsc::UnboundedSender<AppEvent>,
    pending: bool,
    dots: DotPhase,
    should_quit: bool,
    changed: watch::Sender<u64>,
}

impl ConversationManager {
    pub fn new(client: GeminiClient, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            history: ConversationHistory::new(),
            composer: ConversationComposer::new("Type a message..."),
            client,
            events,
            pending: false,
            dots: DotPhase::One,
            should_quit: false,
            changed,
        }
    }

    /// Subscribe to state-change notifications. The rendering layer redraws
    /// whenever the revision advances.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    fn mark_changed(&self) {
        self.changed.send_modify(|revision| *revision += 1);
    }

    /// Handle a key press. Enter submits; everything else edits the draft.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Enter => self.submit(),
            _ => {
                if self.composer.handle_key(key) {
                    self.mark_changed();
                }
            }
        }
    }

    /// Replace the draft verbatim. No validation.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.composer.set_content(text.into());
        self.mark_changed();
    }

    /// Submit the current draft.
    ///
    /// A blank draft is a no-op, as is submitting while a request is
    /// outstanding: one in-flight request at a time keeps transcript order
    /// equal to submission order.
    pub fn submit(&mut self) {
        let draft = self.composer.content().to_owned();
        if draft.trim().is_empty() {
            return;
        }
        if self.pending {
            return;
        }

        self.composer.clear();
        self.history.push(Message::user(draft.clone()));
        self.pending = true;

        // The task owns the prompt it was spawned with; later draft edits
        // cannot reach it.
        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.generate(&draft).await;
            let _ = events.send(AppEvent::Completion(result));
        });

        self.mark_changed();
    }

    /// Apply a settled request: append the bot message and return to idle.
    pub fn settle(&mut self, result: Result<String, GeminiError>) {
        let text = match result {
            Ok(completion) => completion,
            Err(err) => {
                error!(error = %err, "completion request failed");
                FETCH_ERROR.to_owned()
            }
        };

        self.history.push(Message::bot(text));
        self.pending = false;
        self.mark_changed();
    }

    /// Advance the typing-indicator animation.
    pub fn tick(&mut self) {
        self.dots = self.dots.next();
        self.mark_changed();
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn dot_phase(&self) -> DotPhase {
        self.dots
    }

    pub fn draft(&self) -> &str {
        self.composer.content()
    }

    pub fn transcript(&self) -> &[Message] {
        self.history.messages()
    }

    pub fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Transcript
                Constraint::Length(3), // Composer
            ])
            .split(frame.size());

        let typing = self.pending.then(|| self.dots.as_str());
        self.history.render(chunks[0], frame.buffer_mut(), typing);
        self.composer.render(chunks[1], frame.buffer_mut());
    }
}
