//! Engine loop
//!
//! Owns [`AppState`] and the message queue. Every mutation funnels through
//! `update()`; the engine's only job is to execute the actions it returns
//! and feed completions back in as messages. Long-running work (backend
//! commands, update downloads) runs on spawned tasks so pushes keep
//! flowing while a command is in flight; settings I/O is small enough to
//! do inline.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use sqlprof_core::prelude::*;
use sqlprof_core::BackendEvent;

use sqlprof_backend::{
    load_connection, save_connection, CommandSender, SavedConnection, UpdateSource,
};

use crate::config::{load_preferences, save_preferences};
use crate::handler::{update, UpdateAction};
use crate::message::Message;
use crate::state::AppState;

/// Cloneable handle for injecting messages into a running engine.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl EngineHandle {
    pub fn send(&self, msg: Message) {
        if self.tx.send(msg).is_err() {
            warn!("engine is gone; message dropped");
        }
    }

    /// Forward a push event from the capture backend.
    pub fn push(&self, event: BackendEvent) {
        self.send(Message::Backend(event));
    }

    pub fn shutdown(&self) {
        self.send(Message::Shutdown);
    }
}

/// The TEA engine: state, message queue, and action execution.
pub struct Engine<U> {
    state: AppState,
    msg_tx: mpsc::UnboundedSender<Message>,
    msg_rx: mpsc::UnboundedReceiver<Message>,
    commands: CommandSender,
    updater: Arc<U>,
    config_dir: PathBuf,
}

impl<U> Engine<U>
where
    U: UpdateSource + Send + Sync + 'static,
{
    /// Create an engine. Preferences are read here so the first render
    /// already reflects them.
    pub fn new(commands: CommandSender, updater: U, config_dir: PathBuf) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let prefs = load_preferences(&config_dir);
        Self {
            state: AppState::with_preferences(prefs),
            msg_tx,
            msg_rx,
            commands,
            updater: Arc::new(updater),
            config_dir,
        }
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            tx: self.msg_tx.clone(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run until shutdown.
    pub async fn run(mut self) {
        info!("engine starting");
        self.bootstrap();

        while let Some(msg) = self.msg_rx.recv().await {
            if matches!(msg, Message::Shutdown) {
                break;
            }
            self.process(msg);
        }
        info!("engine stopped");
    }

    /// Enqueue the startup messages: pre-fill the connection form and run
    /// a silent update check.
    pub fn bootstrap(&self) {
        let handle = self.handle();
        handle.send(Message::LoadSavedConnection);
        handle.send(Message::CheckForUpdates { manual: false });
    }

    /// Apply one message (plus any follow-up messages it returns) and
    /// execute the resulting actions.
    pub fn process(&mut self, msg: Message) {
        let mut next = Some(msg);
        while let Some(msg) = next.take() {
            let result = update(&mut self.state, msg);
            if let Some(action) = result.action {
                self.dispatch(action);
            }
            next = result.message;
        }
    }

    fn dispatch(&self, action: UpdateAction) {
        let tx = self.msg_tx.clone();
        match action {
            UpdateAction::Connect {
                config,
                remember_password,
            } => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let saved = SavedConnection::from_config(&config, remember_password);
                    let result = commands.connect(*config, remember_password).await;
                    let _ = tx.send(Message::ConnectCompleted { result, saved });
                });
            }
            UpdateAction::Disconnect => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let result = commands.disconnect().await;
                    let _ = tx.send(Message::DisconnectCompleted { result });
                });
            }
            UpdateAction::StartCapture => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let result = commands.start_capture().await;
                    let _ = tx.send(Message::StartCaptureCompleted { result });
                });
            }
            UpdateAction::StopCapture => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let result = commands.stop_capture().await;
                    let _ = tx.send(Message::StopCaptureCompleted { result });
                });
            }

            UpdateAction::LoadSavedConnection => {
                let saved = load_connection(&self.config_dir);
                let _ = tx.send(Message::SavedConnectionLoaded { saved });
            }
            UpdateAction::SaveConnection { saved } => {
                if let Err(e) = save_connection(&self.config_dir, &saved) {
                    warn!("failed to save connection: {e}");
                }
            }
            UpdateAction::SavePreferences { prefs } => {
                if let Err(e) = save_preferences(&self.config_dir, &prefs) {
                    warn!("failed to save preferences: {e}");
                }
            }

            UpdateAction::CheckForUpdates { manual } => {
                let updater = Arc::clone(&self.updater);
                tokio::spawn(async move {
                    let result = updater.check().await;
                    let _ = tx.send(Message::UpdateCheckCompleted { manual, result });
                });
            }
            UpdateAction::DownloadAndInstall => {
                let updater = Arc::clone(&self.updater);
                tokio::spawn(async move {
                    let result = updater.download_and_install().await;
                    let _ = tx.send(Message::UpdateInstallCompleted { result });
                });
            }
            UpdateAction::Relaunch => {
                let updater = Arc::clone(&self.updater);
                tokio::spawn(async move {
                    // On success the process is replaced; only the failure
                    // path produces a message.
                    if let Err(error) = updater.relaunch().await {
                        let _ = tx.send(Message::UpdateRelaunchFailed { error });
                    }
                });
            }
        }
    }

    #[cfg(test)]
    async fn next_message(&mut self) -> Message {
        self.msg_rx
            .recv()
            .await
            .unwrap_or_else(|| panic!("engine message channel closed"))
    }
}
