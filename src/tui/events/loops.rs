use super::{AppEvent, POLL_TIMEOUT, SCROLL_DELTA, TICK_INTERVAL};
use crate::core::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind, MouseEventKind};
use tokio::sync::mpsc::UnboundedSender;

/// Maps a raw terminal event onto the events the app reacts to.
#[must_use]
pub fn translate(event: CrosstermEvent) -> Option<AppEvent> {
    match event {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
            Some(AppEvent::Input(key))
        }
        CrosstermEvent::Paste(text) => Some(AppEvent::Paste(text)),
        CrosstermEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(AppEvent::MouseScroll(-SCROLL_DELTA)),
            MouseEventKind::ScrollDown => Some(AppEvent::MouseScroll(SCROLL_DELTA)),
            _ => None,
        },
        _ => None,
    }
}

/// Blocking crossterm polling; run it on a blocking-friendly task.
pub async fn terminal_event_loop(tx: UnboundedSender<AppEvent>) -> Result<()> {
    while !tx.is_closed() {
        if !event::poll(POLL_TIMEOUT)? {
            continue;
        }

        if let Some(app_event) = translate(event::read()?)
            && tx.send(app_event).is_err()
        {
            break;
        }
    }
    Ok(())
}

pub async fn tick_loop(tx: UnboundedSender<AppEvent>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        if tx.send(AppEvent::Tick).is_err() {
            break;
        }
    }
}
