use crate::events::AppEvent;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stderr};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Funnels terminal input and the animation timer into one event stream.
///
/// Both source tasks run until [`EventHandler::stop`] aborts them; the
/// timer is owned here so tearing down the handler releases it.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
    input_task: JoinHandle<()>,
    tick_task: JoinHandle<()>,
}

impl EventHandler {
    pub fn start(tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let tx_input = tx.clone();
        let input_task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(Ok(evt)) = reader.next().await {
                let app_event = match evt {
                    // Only key presses, not releases
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        Some(AppEvent::Key(key))
                    }
                    Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
                    _ => None,
                };

                if let Some(event) = app_event {
                    if tx_input.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        let tx_tick = tx.clone();
        let tick_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            loop {
                interval.tick().await;
                if tx_tick.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self {
            rx,
            tx,
            input_task,
            tick_task,
        }
    }

    /// Sender for events produced outside the handler's own tasks, such as
    /// request completions.
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Abort the input and timer tasks.
    pub fn stop(&self) {
        self.input_task.abort();
        self.tick_task.abort();
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

pub fn restore() -> Result<()> {
    execute!(io::stderr(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
