use crate::config::Config;
use crate::events::AppEvent;
use crate::gemini::GeminiClient;
use crate::tui::{self, EventHandler};
use crate::ui::conversation::ConversationManager;
use anyhow::Result;
use std::time::Duration;

/// Cadence of the typing-indicator animation.
const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Run the chat session until the user quits.
///
/// One loop drives everything: terminal input, the animation timer, and
/// request completions all arrive as [`AppEvent`]s, and the screen redraws
/// whenever the manager signals a state change.
pub async fn run(config: Config) -> Result<()> {
    let client = GeminiClient::new(&config);
    let mut events = EventHandler::start(TICK_INTERVAL);
    let mut manager = ConversationManager::new(client, events.sender());
    let mut changes = manager.subscribe();

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    terminal.draw(|frame| manager.draw(frame))?;

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_ok() {
                    terminal.draw(|frame| manager.draw(frame))?;
                }
            }
            event = events.next() => match event {
                Some(AppEvent::Key(key)) => manager.handle_key(key),
                Some(AppEvent::Tick) => manager.tick(),
                Some(AppEvent::Completion(result)) => manager.settle(result),
                Some(AppEvent::Resize(_, _)) => {
                    terminal.draw(|frame| manager.draw(frame))?;
                }
                None => break,
            },
        }

        if manager.should_quit() {
            break;
        }
    }

    events.stop();
    tui::restore()?;
    Ok(())
}
