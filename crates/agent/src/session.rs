//! Shopping session with a serialized dispatch queue
//!
//! Interpretation runs on the caller's task and returns at once. Dispatch
//! goes through a bounded FIFO queue drained by a single worker task, so
//! at most one backend call per session is in flight. A dispatch that
//! outlives the timeout is reported as failed, but the worker still waits
//! for it before starting the next one. Dispatches are never cancelled.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;

use voice_shop_config::Settings;
use voice_shop_core::ParsedCommand;
use voice_shop_text_processing::CommandInterpreter;
use voice_shop_tools::{DispatchOutcome, Dispatcher};

use crate::AgentError;

/// Session configuration
#[derive(Debug, Clone)]
pub struct ShoppingSessionConfig {
    /// Language tag used when `submit` gets none
    pub default_language: String,
    /// Wait before a dispatch is reported as timed out
    pub dispatch_timeout: Duration,
    /// Commands that may wait behind the in-flight dispatch
    pub queue_capacity: usize,
}

impl Default for ShoppingSessionConfig {
    fn default() -> Self {
        Self {
            default_language: "en-US".to_string(),
            dispatch_timeout: Duration::from_millis(5000),
            queue_capacity: 32,
        }
    }
}

impl ShoppingSessionConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            default_language: settings.interpreter.default_language.clone(),
            dispatch_timeout: Duration::from_millis(settings.session.dispatch_timeout_ms),
            queue_capacity: settings.session.queue_capacity.max(1),
        }
    }
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoppingSessionState {
    /// Accepting utterances
    Active,
    /// No further utterances accepted
    Ended,
}

/// Session events for UI layers
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Utterance classified
    Interpreted {
        session_id: String,
        text: String,
        language_tag: String,
        command: ParsedCommand,
        at: DateTime<Utc>,
    },
    /// Command carried out
    Dispatched {
        session_id: String,
        command: ParsedCommand,
        outcome: DispatchOutcome,
        at: DateTime<Utc>,
    },
    /// Command could not be carried out
    DispatchFailed {
        session_id: String,
        command: ParsedCommand,
        error: String,
        at: DateTime<Utc>,
    },
    /// Session ended
    Ended {
        session_id: String,
        reason: String,
        at: DateTime<Utc>,
    },
}

struct Job {
    command: ParsedCommand,
    reply: oneshot::Sender<Result<DispatchOutcome, AgentError>>,
}

/// Handle to a submitted command
///
/// The command is available immediately; the dispatch outcome arrives once
/// every earlier command of the session has been dispatched.
#[derive(Debug)]
pub struct CommandTicket {
    command: ParsedCommand,
    outcome: oneshot::Receiver<Result<DispatchOutcome, AgentError>>,
}

impl CommandTicket {
    pub fn command(&self) -> &ParsedCommand {
        &self.command
    }

    /// Wait for the dispatch outcome
    pub async fn outcome(self) -> Result<DispatchOutcome, AgentError> {
        self.outcome.await.unwrap_or(Err(AgentError::SessionEnded))
    }

    /// Wait for the outcome, keeping the command alongside it
    pub async fn wait(self) -> (ParsedCommand, Result<DispatchOutcome, AgentError>) {
        let command = self.command.clone();
        (command, self.outcome().await)
    }
}

/// One user's shopping conversation
pub struct ShoppingSession {
    session_id: String,
    config: ShoppingSessionConfig,
    interpreter: CommandInterpreter,
    state: Arc<RwLock<ShoppingSessionState>>,
    queue_tx: Mutex<Option<mpsc::Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl ShoppingSession {
    /// Create a session and start its dispatch worker
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        interpreter: CommandInterpreter,
        dispatcher: Dispatcher,
        config: ShoppingSessionConfig,
    ) -> Result<Self, AgentError> {
        Self::with_id(uuid::Uuid::new_v4().to_string(), interpreter, dispatcher, config)
    }

    pub fn with_id(
        session_id: impl Into<String>,
        interpreter: CommandInterpreter,
        dispatcher: Dispatcher,
        config: ShoppingSessionConfig,
    ) -> Result<Self, AgentError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| AgentError::Initialization(format!("No Tokio runtime: {}", e)))?;

        let session_id = session_id.into();
        let (queue_tx, queue_rx) = mpsc::channel(config.queue_capacity.max(1));
        let (event_tx, _) = broadcast::channel(100);

        let worker = runtime.spawn(run_worker(
            session_id.clone(),
            dispatcher,
            queue_rx,
            config.dispatch_timeout,
            event_tx.clone(),
        ));

        tracing::info!(session_id = %session_id, "Shopping session started");

        Ok(Self {
            session_id,
            config,
            interpreter,
            state: Arc::new(RwLock::new(ShoppingSessionState::Active)),
            queue_tx: Mutex::new(Some(queue_tx)),
            worker: Mutex::new(Some(worker)),
            event_tx,
        })
    }

    /// Interpret an utterance and queue its command for dispatch
    ///
    /// Uses the configured default language when `language_tag` is `None`.
    /// Waits only if the queue is full.
    pub async fn submit(
        &self,
        text: &str,
        language_tag: Option<&str>,
    ) -> Result<CommandTicket, AgentError> {
        let queue_tx = self.queue_tx.lock().clone().ok_or(AgentError::SessionEnded)?;

        let language_tag = language_tag.unwrap_or(&self.config.default_language);
        let command = self.interpreter.interpret(text, language_tag);

        let _ = self.event_tx.send(SessionEvent::Interpreted {
            session_id: self.session_id.clone(),
            text: text.to_string(),
            language_tag: language_tag.to_string(),
            command: command.clone(),
            at: Utc::now(),
        });

        let (reply, outcome) = oneshot::channel();
        queue_tx
            .send(Job {
                command: command.clone(),
                reply,
            })
            .await
            .map_err(|_| AgentError::SessionEnded)?;

        Ok(CommandTicket { command, outcome })
    }

    /// Interpret, dispatch and wait for the outcome
    pub async fn handle(
        &self,
        text: &str,
        language_tag: Option<&str>,
    ) -> Result<(ParsedCommand, Result<DispatchOutcome, AgentError>), AgentError> {
        Ok(self.submit(text, language_tag).await?.wait().await)
    }

    /// Stop accepting utterances and wait for queued dispatches to finish
    pub async fn end(&self, reason: impl Into<String>) {
        let reason = reason.into();
        {
            let mut state = self.state.write().await;
            if *state == ShoppingSessionState::Ended {
                return;
            }
            *state = ShoppingSessionState::Ended;
        }

        // closing the queue lets the worker drain and exit
        self.queue_tx.lock().take();
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::warn!(session_id = %self.session_id, error = %e, "Dispatch worker failed");
            }
        }

        tracing::info!(session_id = %self.session_id, reason = %reason, "Shopping session ended");
        let _ = self.event_tx.send(SessionEvent::Ended {
            session_id: self.session_id.clone(),
            reason,
            at: Utc::now(),
        });
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub async fn state(&self) -> ShoppingSessionState {
        *self.state.read().await
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &ShoppingSessionConfig {
        &self.config
    }

    pub fn interpreter(&self) -> &CommandInterpreter {
        &self.interpreter
    }
}

async fn run_worker(
    session_id: String,
    dispatcher: Dispatcher,
    mut queue_rx: mpsc::Receiver<Job>,
    dispatch_timeout: Duration,
    event_tx: broadcast::Sender<SessionEvent>,
) {
    let timeout_ms = u64::try_from(dispatch_timeout.as_millis()).unwrap_or(u64::MAX);

    while let Some(Job { command, reply }) = queue_rx.recv().await {
        let dispatch = dispatcher.dispatch(&command);
        tokio::pin!(dispatch);

        let (result, timed_out) = tokio::select! {
            result = &mut dispatch => (result.map_err(AgentError::Dispatch), false),
            _ = tokio::time::sleep(dispatch_timeout) => {
                tracing::warn!(session_id = %session_id, intent = %command.intent, timeout_ms, "Dispatch timed out");
                (Err(AgentError::Timeout(timeout_ms)), true)
            },
        };

        let event = match &result {
            Ok(outcome) => SessionEvent::Dispatched {
                session_id: session_id.clone(),
                command: command.clone(),
                outcome: outcome.clone(),
                at: Utc::now(),
            },
            Err(e) => SessionEvent::DispatchFailed {
                session_id: session_id.clone(),
                command: command.clone(),
                error: e.to_string(),
                at: Utc::now(),
            },
        };
        let _ = event_tx.send(event);

        // the submitter may have dropped its ticket
        let _ = reply.send(result);

        // a late call still owns the list until it returns
        if timed_out {
            match dispatch.await {
                Ok(_) => tracing::info!(session_id = %session_id, intent = %command.intent, "Late dispatch completed"),
                Err(e) => tracing::warn!(session_id = %session_id, intent = %command.intent, error = %e, "Late dispatch failed"),
            }
        }
    }

    tracing::debug!(session_id = %session_id, "Dispatch worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_shop_core::Intent;
    use voice_shop_tools::{InMemoryShoppingList, TracingNotifier};

    fn session() -> ShoppingSession {
        let dispatcher = Dispatcher::new(
            Arc::new(InMemoryShoppingList::new()),
            Arc::new(TracingNotifier),
        );
        ShoppingSession::with_id(
            "test-session",
            CommandInterpreter::default(),
            dispatcher,
            ShoppingSessionConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_requires_runtime() {
        let dispatcher = Dispatcher::new(
            Arc::new(InMemoryShoppingList::new()),
            Arc::new(TracingNotifier),
        );
        let result = ShoppingSession::new(
            CommandInterpreter::default(),
            dispatcher,
            ShoppingSessionConfig::default(),
        );
        assert!(matches!(result, Err(AgentError::Initialization(_))));
    }

    #[tokio::test]
    async fn test_submit_returns_command_immediately() {
        let session = session();
        let ticket = session.submit("add 2 apples", None).await.unwrap();
        assert_eq!(ticket.command().intent, Intent::AddItem);

        match ticket.outcome().await.unwrap() {
            DispatchOutcome::Added(items) => assert_eq!(items[0].quantity, 2),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_default_language_applies() {
        let config = ShoppingSessionConfig {
            default_language: "hi-IN".to_string(),
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(
            Arc::new(InMemoryShoppingList::new()),
            Arc::new(TracingNotifier),
        );
        let session =
            ShoppingSession::with_id("hi", CommandInterpreter::default(), dispatcher, config).unwrap();

        let (command, outcome) = session.handle("दो आम चाहिए", None).await.unwrap();
        assert_eq!(command, ParsedCommand::add("आम", 2));
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn test_submit_after_end_fails() {
        let session = session();
        session.end("done").await;
        assert_eq!(session.state().await, ShoppingSessionState::Ended);
        assert!(matches!(
            session.submit("add milk", None).await,
            Err(AgentError::SessionEnded)
        ));
    }

    #[test]
    fn test_config_from_settings() {
        let mut settings = Settings::default();
        settings.session.dispatch_timeout_ms = 250;
        settings.interpreter.default_language = "hi-IN".to_string();

        let config = ShoppingSessionConfig::from_settings(&settings);
        assert_eq!(config.dispatch_timeout, Duration::from_millis(250));
        assert_eq!(config.default_language, "hi-IN");
    }
}
