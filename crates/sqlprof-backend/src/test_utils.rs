//! Test utilities for backend boundary types
//!
//! Provides a scripted in-process backend and update source so downstream
//! crates can drive interleaving scenarios deterministically.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::commands::{channel, CommandResult, CommandSender, ProfilerCommand};
use crate::updater::{PendingUpdate, UpdateSource};

/// Which command the scripted backend observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Connect,
    Disconnect,
    StartCapture,
    StopCapture,
}

/// In-process backend double.
///
/// Consumes commands from the channel, records their order, and answers
/// each with the next scripted failure for its kind (or `Ok(())` when none
/// is scripted).
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    observed: Arc<Mutex<Vec<CommandKind>>>,
    failures: Arc<Mutex<Vec<(CommandKind, String)>>>,
}

impl ScriptedBackend {
    /// Spawn the backend task. Returns the double and the sender to hand to
    /// the code under test.
    pub fn spawn() -> (Self, CommandSender) {
        let backend = Self::default();
        let (sender, mut rx) = channel(16);

        let task_backend = backend.clone();
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                task_backend.answer(command);
            }
        });

        (backend, sender)
    }

    /// Script the next command of `kind` to fail with `message`.
    pub fn fail_next(&self, kind: CommandKind, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .push((kind, message.into()));
    }

    /// Commands observed so far, in arrival order.
    pub fn observed(&self) -> Vec<CommandKind> {
        self.observed.lock().unwrap().clone()
    }

    fn answer(&self, command: ProfilerCommand) {
        let (kind, reply) = match command {
            ProfilerCommand::Connect { reply, .. } => (CommandKind::Connect, reply),
            ProfilerCommand::Disconnect { reply } => (CommandKind::Disconnect, reply),
            ProfilerCommand::StartCapture { reply } => (CommandKind::StartCapture, reply),
            ProfilerCommand::StopCapture { reply } => (CommandKind::StopCapture, reply),
        };
        self.observed.lock().unwrap().push(kind);

        let result = self.take_failure(kind).map_or(Ok(()), Err);
        reply.send(result).ok();
    }

    fn take_failure(&self, kind: CommandKind) -> Option<String> {
        let mut failures = self.failures.lock().unwrap();
        let idx = failures.iter().position(|(k, _)| *k == kind)?;
        Some(failures.remove(idx).1)
    }
}

/// Scripted update source: answers `check` calls from a queue of results.
pub struct ScriptedUpdateSource {
    checks: AsyncMutex<VecDeque<Result<Option<PendingUpdate>, String>>>,
    install_result: AsyncMutex<CommandResult>,
    relaunch_result: AsyncMutex<CommandResult>,
}

impl Default for ScriptedUpdateSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedUpdateSource {
    pub fn new() -> Self {
        Self {
            checks: AsyncMutex::new(VecDeque::new()),
            install_result: AsyncMutex::new(Ok(())),
            relaunch_result: AsyncMutex::new(Ok(())),
        }
    }

    /// Queue the result of the next `check` call.
    pub async fn push_check(&self, result: Result<Option<PendingUpdate>, String>) {
        self.checks.lock().await.push_back(result);
    }

    pub async fn set_install_result(&self, result: CommandResult) {
        *self.install_result.lock().await = result;
    }

    pub async fn set_relaunch_result(&self, result: CommandResult) {
        *self.relaunch_result.lock().await = result;
    }
}

impl UpdateSource for ScriptedUpdateSource {
    async fn check(&self) -> Result<Option<PendingUpdate>, String> {
        self.checks
            .lock()
            .await
            .pop_front()
            .unwrap_or(Ok(None))
    }

    async fn download_and_install(&self) -> Result<(), String> {
        self.install_result.lock().await.clone()
    }

    async fn relaunch(&self) -> Result<(), String> {
        self.relaunch_result.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_backend_records_order() {
        let (backend, sender) = ScriptedBackend::spawn();

        sender.start_capture().await.unwrap();
        sender.stop_capture().await.unwrap();

        assert_eq!(
            backend.observed(),
            vec![CommandKind::StartCapture, CommandKind::StopCapture]
        );
    }

    #[tokio::test]
    async fn test_scripted_failure_consumed_once() {
        let (backend, sender) = ScriptedBackend::spawn();
        backend.fail_next(CommandKind::Disconnect, "socket reset");

        assert_eq!(sender.disconnect().await, Err("socket reset".to_string()));
        assert_eq!(sender.disconnect().await, Ok(()));
    }

    #[tokio::test]
    async fn test_scripted_update_source_defaults_to_up_to_date() {
        let source = ScriptedUpdateSource::new();
        assert_eq!(source.check().await, Ok(None));
    }
}
