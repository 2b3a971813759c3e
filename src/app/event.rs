//! Terminal event abstraction.
//!
//! A background task polls crossterm and forwards the events the app cares
//! about over a channel, so the main loop never blocks on input.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl AppEvent {
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(k) => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.  The task ends once the receiver is dropped.
pub fn spawn_event_reader(poll_interval: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match event::poll(poll_interval) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "terminal event poll failed");
                    break;
                }
            }
            let ev = match event::read() {
                Ok(ev) => ev,
                Err(e) => {
                    tracing::warn!(error = %e, "dropping unreadable terminal event");
                    continue;
                }
            };
            if let Some(app_event) = AppEvent::from_crossterm(ev) {
                if tx.send(app_event).is_err() {
                    break; // receiver dropped
                }
            }
        }
    });

    rx
}
