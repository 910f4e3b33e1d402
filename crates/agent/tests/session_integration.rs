//! Integration tests for shopping sessions (interpret -> queue -> dispatch)
//!
//! These tests verify ordering and exclusivity of per-session dispatch.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use voice_shop_agent::{
    AgentError, SessionEvent, ShoppingSession, ShoppingSessionConfig, ShoppingSessionState,
};
use voice_shop_core::{Intent, ParsedCommand};
use voice_shop_text_processing::CommandInterpreter;
use voice_shop_tools::{
    DispatchOutcome, Dispatcher, InMemoryShoppingList, IntegrationError, ListItem, Notifier,
    Product, SearchQuery, ShoppingListIntegration, Suggestions,
};

/// Backend that delays every call and tracks overlap
#[derive(Default)]
struct SlowBackend {
    inner: InMemoryShoppingList,
    delay: Duration,
    fail: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl SlowBackend {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    async fn enter(&self, call: String) -> Result<(), IntegrationError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.log.lock().push(call);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail {
            return Err(IntegrationError::ConnectionFailed("list service down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ShoppingListIntegration for SlowBackend {
    async fn add_item(&self, name: &str, quantity: u32) -> Result<Vec<ListItem>, IntegrationError> {
        self.enter(format!("add {name}")).await?;
        self.inner.add_item(name, quantity).await
    }

    async fn remove_item(&self, name: &str) -> Result<Vec<ListItem>, IntegrationError> {
        self.enter(format!("remove {name}")).await?;
        self.inner.remove_item(name).await
    }

    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<Product>, IntegrationError> {
        self.enter(format!("search {}", query.text)).await?;
        self.inner.search_items(query).await
    }

    async fn list_items(&self) -> Result<Vec<ListItem>, IntegrationError> {
        self.inner.list_items().await
    }

    async fn clear(&self) -> Result<Vec<ListItem>, IntegrationError> {
        self.inner.clear().await
    }

    async fn suggestions(&self) -> Result<Suggestions, IntegrationError> {
        self.inner.suggestions().await
    }
}

#[derive(Default)]
struct CollectingNotifier {
    messages: Mutex<Vec<String>>,
}

impl Notifier for CollectingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

fn session_with(
    backend: Arc<SlowBackend>,
    notifier: Arc<CollectingNotifier>,
    dispatch_timeout: Duration,
) -> ShoppingSession {
    let config = ShoppingSessionConfig {
        dispatch_timeout,
        ..Default::default()
    };
    ShoppingSession::with_id(
        "test-session",
        CommandInterpreter::default(),
        Dispatcher::new(backend, notifier),
        config,
    )
    .unwrap()
}

/// Rapid commands are dispatched one at a time in submission order
#[tokio::test]
async fn test_dispatches_are_serialized_in_order() {
    let backend = Arc::new(SlowBackend::new(Duration::from_millis(20)));
    let session = session_with(
        backend.clone(),
        Arc::new(CollectingNotifier::default()),
        Duration::from_secs(5),
    );

    let utterances = ["add milk", "remove milk", "add 2 eggs", "find toothpaste", "add bread"];
    let mut tickets = Vec::new();
    for text in utterances {
        tickets.push(session.submit(text, Some("en-US")).await.unwrap());
    }
    for ticket in tickets {
        ticket.outcome().await.unwrap();
    }

    assert_eq!(backend.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(
        *backend.log.lock(),
        vec!["add milk", "remove milk", "add eggs", "search toothpaste", "add bread"]
    );

    // remove ran after the first add and before the second
    let items = backend.inner.list_items().await.unwrap();
    let names: Vec<_> = items.iter().map(|i| i.item.as_str()).collect();
    assert_eq!(names, vec!["eggs", "bread"]);
}

/// Interpretation does not wait for earlier dispatches
#[tokio::test]
async fn test_interpretation_is_not_blocked_by_dispatch() {
    let backend = Arc::new(SlowBackend::new(Duration::from_millis(200)));
    let session = session_with(
        backend,
        Arc::new(CollectingNotifier::default()),
        Duration::from_secs(5),
    );

    let first = session.submit("add milk", None).await.unwrap();
    let second = timeout(Duration::from_millis(100), session.submit("remove bread", None))
        .await
        .expect("submit should not wait for the first dispatch")
        .unwrap();

    assert_eq!(second.command(), &ParsedCommand::remove("bread"));
    first.outcome().await.unwrap();
    second.outcome().await.unwrap();
}

/// A stuck backend call times out and the queue keeps moving
#[tokio::test]
async fn test_dispatch_timeout() {
    let backend = Arc::new(SlowBackend::new(Duration::from_millis(300)));
    let session = session_with(
        backend.clone(),
        Arc::new(CollectingNotifier::default()),
        Duration::from_millis(50),
    );

    let (command, outcome) = session.handle("add milk", None).await.unwrap();
    assert_eq!(command.intent, Intent::AddItem);
    assert!(matches!(outcome, Err(AgentError::Timeout(50))));

    let (_, outcome) = session.handle("xyz123!!", None).await.unwrap();
    assert!(matches!(outcome, Ok(DispatchOutcome::NotUnderstood)));
}

/// A timed-out call runs to completion before the next command starts
#[tokio::test]
async fn test_timed_out_dispatch_is_not_cancelled() {
    let backend = Arc::new(SlowBackend::new(Duration::from_millis(150)));
    let session = session_with(
        backend.clone(),
        Arc::new(CollectingNotifier::default()),
        Duration::from_millis(30),
    );

    let first = session.submit("add milk", None).await.unwrap();
    let second = session.submit("remove bread", None).await.unwrap();

    assert!(matches!(first.outcome().await, Err(AgentError::Timeout(30))));
    // the add is still running; nothing else has started
    assert_eq!(backend.in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(backend.log.lock().as_slice(), ["add milk"]);

    assert!(matches!(second.outcome().await, Err(AgentError::Timeout(30))));
    session.end("done").await;

    assert_eq!(backend.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(backend.log.lock().as_slice(), ["add milk", "remove bread"]);
    let items = backend.inner.list_items().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item, "milk");
}

/// Unknown commands reach only the notifier
#[tokio::test]
async fn test_unknown_command_notifies() {
    let backend = Arc::new(SlowBackend::new(Duration::ZERO));
    let notifier = Arc::new(CollectingNotifier::default());
    let session = session_with(backend.clone(), notifier.clone(), Duration::from_secs(1));

    let (command, outcome) = session.handle("xyz123!!", Some("fr-FR")).await.unwrap();

    assert!(command.is_unknown());
    assert!(matches!(outcome, Ok(DispatchOutcome::NotUnderstood)));
    assert!(backend.log.lock().is_empty());
    assert_eq!(
        *notifier.messages.lock(),
        vec!["Sorry, I couldn't understand that command.".to_string()]
    );
}

/// Backend errors surface on the ticket and the session keeps going
#[tokio::test]
async fn test_dispatch_error_surfaces() {
    let backend = Arc::new(SlowBackend {
        fail: true,
        ..Default::default()
    });
    let session = session_with(
        backend,
        Arc::new(CollectingNotifier::default()),
        Duration::from_secs(1),
    );
    let mut events = session.subscribe();

    let (command, outcome) = session.handle("remove milk", None).await.unwrap();
    assert_eq!(command, ParsedCommand::remove("milk"));
    assert!(matches!(
        outcome,
        Err(AgentError::Dispatch(IntegrationError::ConnectionFailed(_)))
    ));

    let _interpreted = events.recv().await.unwrap();
    let failed = events.recv().await.unwrap();
    assert!(matches!(failed, SessionEvent::DispatchFailed { ref error, .. } if error.contains("list service down")));

    let (_, outcome) = session.handle("xyz123!!", None).await.unwrap();
    assert!(outcome.is_ok());
}

/// Events follow the command through the session
#[tokio::test]
async fn test_session_events() {
    let backend = Arc::new(SlowBackend::new(Duration::ZERO));
    let session = session_with(
        backend,
        Arc::new(CollectingNotifier::default()),
        Duration::from_secs(1),
    );
    let mut events = session.subscribe();

    session.handle("add 2 apples", None).await.unwrap();

    let event = timeout(Duration::from_millis(100), events.recv()).await;
    assert!(matches!(
        event,
        Ok(Ok(SessionEvent::Interpreted { ref command, .. })) if command.quantity == 2
    ));

    let event = timeout(Duration::from_millis(100), events.recv()).await;
    assert!(matches!(
        event,
        Ok(Ok(SessionEvent::Dispatched { outcome: DispatchOutcome::Added(_), .. }))
    ));

    session.end("test complete").await;
    let event = timeout(Duration::from_millis(100), events.recv()).await;
    if let Ok(Ok(SessionEvent::Ended { session_id, reason, .. })) = event {
        assert_eq!(session_id, "test-session");
        assert_eq!(reason, "test complete");
    } else {
        panic!("expected Ended event, got {event:?}");
    }
}

/// Ending a session lets queued dispatches finish
#[tokio::test]
async fn test_end_drains_queue() {
    let backend = Arc::new(SlowBackend::new(Duration::from_millis(20)));
    let session = session_with(
        backend.clone(),
        Arc::new(CollectingNotifier::default()),
        Duration::from_secs(1),
    );

    let first = session.submit("add milk", None).await.unwrap();
    let second = session.submit("add bread", None).await.unwrap();
    session.end("user left").await;

    assert_eq!(session.state().await, ShoppingSessionState::Ended);
    assert!(first.outcome().await.is_ok());
    assert!(second.outcome().await.is_ok());
    assert_eq!(backend.log.lock().len(), 2);
}
