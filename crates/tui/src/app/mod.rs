use crate::keybinds::Keybinds;
use crate::report::{no_data_message, RegionReport};
use crate::view::{Screen, ScreenKind, View};
use crate::Config;
use anyhow::Result;
use carbon_signal_api::{zone_label, ApiResult, Credential, KeyValueStore, SignalApi};
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::Frame;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

mod actions;
mod effects;
mod input;
mod render;
mod state;
mod types;

pub use effects::resolve_report;
pub use state::App;
pub use types::AppAsyncEvent;

impl<V: View> App<V> {
    pub(super) fn report_error(&mut self, context: &str, error: impl std::fmt::Display) {
        let message = format!("{context}: {}", self.redact_sensitive(&error.to_string()));
        self.last_error = Some(message.clone());
        tracing::warn!("{message}");
    }

    pub(super) fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Masks the stored API key wherever it shows up in `input`.
    pub(super) fn redact_sensitive(&self, input: &str) -> String {
        let api_key = self.store.get(carbon_signal_api::store::API_KEY_ENTRY);
        match api_key {
            Ok(Some(key)) if !key.is_empty() => input.replace(&key, "[REDACTED]"),
            _ => input.to_string(),
        }
    }

    pub(super) fn spawn_app_task<F>(&self, future: F)
    where
        F: Future<Output = AppAsyncEvent> + Send + 'static,
    {
        if let Some(tx) = self.app_async_tx.clone() {
            tokio::spawn(async move {
                let event = future.await;
                let _ = tx.send(event);
            });
        }
    }
}
