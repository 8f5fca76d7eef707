//! Event Bus - publish/subscribe for task lifecycle events
//!
//! Owned by one agent engine; there is no process-wide instance.

use super::types::{TaskEvent, TaskEventKind};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, trace};

// ============================================================================
// Listener
// ============================================================================

/// Listener handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Receives task lifecycle events
#[async_trait]
pub trait TaskEventListener: Send + Sync {
    /// Listener name (for debugging)
    fn name(&self) -> &str;

    /// Event kinds of interest (None = all)
    fn kinds(&self) -> Option<Vec<TaskEventKind>> {
        None
    }

    async fn on_event(&self, event: &TaskEvent);
}

/// Adapts a plain callback into a listener for one or more event kinds
pub struct CallbackListener<F> {
    name: String,
    kinds: Option<Vec<TaskEventKind>>,
    callback: F,
}

impl<F> CallbackListener<F>
where
    F: Fn(&TaskEvent) + Send + Sync,
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            kinds: None,
            callback,
        }
    }

    pub fn with_kinds(mut self, kinds: Vec<TaskEventKind>) -> Self {
        self.kinds = Some(kinds);
        self
    }
}

#[async_trait]
impl<F> TaskEventListener for CallbackListener<F>
where
    F: Fn(&TaskEvent) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kinds(&self) -> Option<Vec<TaskEventKind>> {
        self.kinds.clone()
    }

    async fn on_event(&self, event: &TaskEvent) {
        (self.callback)(event);
    }
}

// ============================================================================
// TaskEventBus
// ============================================================================

#[derive(Debug, Clone)]
pub struct TaskEventBusConfig {
    /// Broadcast channel capacity; slower receivers lag and lose events
    pub channel_capacity: usize,

    /// Number of recent events kept for `history`
    pub history_size: usize,
}

impl Default for TaskEventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_size: 100,
        }
    }
}

/// Fan-out of lifecycle events to registered listeners and to broadcast
/// receivers.
///
/// Delivery is fire-and-forget: a receiver that is absent or lagging simply
/// misses events, and nothing waits for it.
pub struct TaskEventBus {
    config: TaskEventBusConfig,
    sender: broadcast::Sender<TaskEvent>,
    listeners: RwLock<HashMap<ListenerId, Arc<dyn TaskEventListener>>>,
    listener_counter: AtomicU64,
    history: RwLock<VecDeque<TaskEvent>>,
    event_count: AtomicU64,
}

impl TaskEventBus {
    pub fn new() -> Self {
        Self::with_config(TaskEventBusConfig::default())
    }

    pub fn with_config(config: TaskEventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));

        Self {
            config,
            sender,
            listeners: RwLock::new(HashMap::new()),
            listener_counter: AtomicU64::new(0),
            history: RwLock::new(VecDeque::new()),
            event_count: AtomicU64::new(0),
        }
    }

    pub async fn subscribe(&self, listener: Arc<dyn TaskEventListener>) -> ListenerId {
        let id = ListenerId(self.listener_counter.fetch_add(1, Ordering::SeqCst));

        debug!(
            listener_name = listener.name(),
            listener_id = %id,
            "Registering task event listener"
        );

        self.listeners.write().await.insert(id, listener);
        id
    }

    /// Register a callback for the given kinds
    pub async fn on<F>(&self, kinds: Vec<TaskEventKind>, callback: F) -> ListenerId
    where
        F: Fn(&TaskEvent) + Send + Sync + 'static,
    {
        let name = kinds
            .iter()
            .map(TaskEventKind::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let listener = CallbackListener::new(name, callback).with_kinds(kinds);
        self.subscribe(Arc::new(listener)).await
    }

    pub async fn unsubscribe(&self, id: ListenerId) -> bool {
        let removed = self.listeners.write().await.remove(&id).is_some();
        if removed {
            debug!(listener_id = %id, "Unregistered task event listener");
        }
        removed
    }

    pub async fn publish(&self, event: TaskEvent) {
        let count = self.event_count.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(
            kind = %event.kind,
            task_id = %event.task_id,
            "Publishing event #{}", count
        );

        {
            let mut history = self.history.write().await;
            history.push_back(event.clone());
            while history.len() > self.config.history_size {
                history.pop_front();
            }
        }

        // No receivers is not an error
        let _ = self.sender.send(event.clone());

        // Snapshot so listeners may (un)subscribe from inside on_event
        let listeners: Vec<Arc<dyn TaskEventListener>> =
            self.listeners.read().await.values().cloned().collect();

        for listener in listeners {
            let wanted = listener
                .kinds()
                .map_or(true, |kinds| kinds.contains(&event.kind));
            if wanted {
                listener.on_event(&event).await;
            }
        }
    }

    /// Stream-style receiver; sees only events published after this call
    pub fn receiver(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }

    /// Recent events, newest first
    pub async fn history(&self, limit: Option<usize>) -> Vec<TaskEvent> {
        let history = self.history.read().await;
        let limit = limit.unwrap_or(history.len());
        history.iter().rev().take(limit).cloned().collect()
    }

    pub async fn listener_count(&self) -> usize {
        self.listeners.read().await.len()
    }

    pub fn event_count(&self) -> u64 {
        self.event_count.load(Ordering::SeqCst)
    }

    pub async fn clear_history(&self) {
        self.history.write().await.clear();
    }
}

impl Default for TaskEventBus {
    fn default() -> Self {
        Self::new()
    }
}
