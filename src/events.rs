use crate::gemini::GeminiError;
use crossterm::event::KeyEvent;

/// Events delivered to the application loop.
///
/// Keyboard and resize events come from the terminal reader task, `Tick`
/// from the animation timer, and `Completion` from the request task a
/// submission spawns.
#[derive(Debug)]
pub enum AppEvent {
    /// Key press event
    Key(KeyEvent),

    /// Terminal resize
    Resize(u16, u16),

    /// Typing-indicator animation tick
    Tick,

    /// A completion request settled, successfully or not
    Completion(Result<String, GeminiError>),
}
