//! Typed commands to the capture backend
//!
//! Each command carries a oneshot reply channel. The backend task consumes
//! [`ProfilerCommand`]s from the receiving end and answers every one, even
//! when the request fails: a rejection is an `Err(String)` reply, never a
//! dropped channel. [`CommandSender`] flattens channel failures into the
//! same `Err(String)` shape so callers see a single failure mode.

use tokio::sync::{mpsc, oneshot};

use sqlprof_core::prelude::*;
use sqlprof_core::ConnectionConfig;

/// Outcome of a backend command. The message is captured verbatim and
/// stored as state by the session machine, never propagated as a panic.
pub type CommandResult = std::result::Result<(), String>;

/// Commands sent to the capture backend task.
#[derive(Debug)]
pub enum ProfilerCommand {
    /// Begin a connection attempt.
    Connect {
        config: ConnectionConfig,
        remember_password: bool,
        reply: oneshot::Sender<CommandResult>,
    },

    /// End the current connection.
    Disconnect { reply: oneshot::Sender<CommandResult> },

    /// Start telemetry emission.
    StartCapture { reply: oneshot::Sender<CommandResult> },

    /// Stop telemetry emission.
    StopCapture { reply: oneshot::Sender<CommandResult> },
}

impl ProfilerCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ProfilerCommand::Connect { .. } => "connect",
            ProfilerCommand::Disconnect { .. } => "disconnect",
            ProfilerCommand::StartCapture { .. } => "start-capture",
            ProfilerCommand::StopCapture { .. } => "stop-capture",
        }
    }
}

/// Create a command channel with the given buffer size.
///
/// The receiver goes to the backend task, the [`CommandSender`] to the engine.
pub fn channel(buffer: usize) -> (CommandSender, mpsc::Receiver<ProfilerCommand>) {
    let (tx, rx) = mpsc::channel(buffer);
    (CommandSender { tx }, rx)
}

/// Cloneable handle for issuing backend commands and awaiting their replies.
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<ProfilerCommand>,
}

impl std::fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSender").finish_non_exhaustive()
    }
}

impl CommandSender {
    /// Request a connection with the given parameters.
    pub async fn connect(
        &self,
        config: ConnectionConfig,
        remember_password: bool,
    ) -> CommandResult {
        let (reply, rx) = oneshot::channel();
        self.send(
            ProfilerCommand::Connect {
                config,
                remember_password,
                reply,
            },
            rx,
        )
        .await
    }

    /// Request a disconnect.
    pub async fn disconnect(&self) -> CommandResult {
        let (reply, rx) = oneshot::channel();
        self.send(ProfilerCommand::Disconnect { reply }, rx).await
    }

    /// Request the backend to start emitting telemetry.
    pub async fn start_capture(&self) -> CommandResult {
        let (reply, rx) = oneshot::channel();
        self.send(ProfilerCommand::StartCapture { reply }, rx).await
    }

    /// Request the backend to stop emitting telemetry.
    pub async fn stop_capture(&self) -> CommandResult {
        let (reply, rx) = oneshot::channel();
        self.send(ProfilerCommand::StopCapture { reply }, rx).await
    }

    async fn send(
        &self,
        command: ProfilerCommand,
        rx: oneshot::Receiver<CommandResult>,
    ) -> CommandResult {
        let name = command.name();
        if self.tx.send(command).await.is_err() {
            warn!("backend channel closed while sending {name}");
            return Err("capture backend is not running".to_string());
        }
        match rx.await {
            Ok(result) => result,
            Err(_) => {
                // Backend dropped the reply without answering.
                warn!("backend dropped reply for {name}");
                Err(format!("no response from backend for {name}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ConnectionConfig {
        serde_json::from_str(
            r#"{
                "server_name": "localhost",
                "authentication": "sql",
                "username": "sa",
                "password": "pw",
                "database": "",
                "encrypt": "mandatory",
                "trust_cert": false
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_reply_round_trip() {
        let (sender, mut rx) = channel(8);

        let task = tokio::spawn(async move {
            match rx.recv().await {
                Some(ProfilerCommand::Connect { reply, .. }) => {
                    reply.send(Err("login failed for user 'sa'".to_string())).ok();
                }
                other => panic!("unexpected command: {other:?}"),
            }
        });

        let result = sender.connect(test_config(), false).await;
        assert_eq!(result, Err("login failed for user 'sa'".to_string()));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_channel_is_an_error_not_a_panic() {
        let (sender, rx) = channel(1);
        drop(rx);

        let result = sender.stop_capture().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dropped_reply_reports_command_name() {
        let (sender, mut rx) = channel(1);

        let task = tokio::spawn(async move {
            // Consume the command but drop the reply channel unanswered.
            let _ = rx.recv().await;
        });

        let result = sender.start_capture().await;
        task.await.unwrap();
        assert!(result.unwrap_err().contains("start-capture"));
    }
}
