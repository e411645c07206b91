//! Debounced per-node resolution
//!
//! Rapid resolution requests for the same node coalesce: each request
//! restarts a quiet window, and only the last request of a burst reaches the
//! resolver.
//!
//! # Per-node state machine
//!
//! ```text
//! Idle ──request──► Pending ──window elapses──► Resolved | Failed
//!   ▲                  │ ▲                             │
//!   │                  └─┘ request (restarts window)   │
//!   └──────────── teardown (from any state) ◄──────────┘
//! ```
//!
//! A generation counter tags every request. A result is published only if its
//! generation is still current, so a superseded or torn-down lookup never
//! overwrites newer state. Superseded tasks are also aborted outright.

use crate::error::ResolveError;
use crate::resolver::StatementTreeResolver;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use stmt_model::{StatementNode, TypeInfo};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Identity of a rendered node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create new random id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolution state of one node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    /// No request yet
    Idle,
    /// Waiting for the window to elapse or the lookup to finish
    Pending,
    /// Type resolved
    Resolved(TypeInfo),
    /// Resolution failed
    Failed(ResolveError),
}

impl NodeState {
    /// Whether the state is final for the current request
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Failed(_))
    }
}

struct Slot {
    generation: u64,
    state: watch::Sender<NodeState>,
    task: Option<JoinHandle<()>>,
}

impl Slot {
    fn new() -> Self {
        let (state, _) = watch::channel(NodeState::Idle);
        Self {
            generation: 0,
            state,
            task: None,
        }
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Coalesces resolution requests per node
///
/// Must be used from within a tokio runtime.
pub struct DebouncedResolver {
    resolver: Arc<StatementTreeResolver>,
    window: Duration,
    slots: Arc<DashMap<NodeId, Slot>>,
}

impl fmt::Debug for DebouncedResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedResolver")
            .field("window", &self.window)
            .field("active", &self.slots.len())
            .finish_non_exhaustive()
    }
}

impl DebouncedResolver {
    /// Default quiet window
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

    /// Create debouncer over a resolver
    #[must_use]
    pub fn new(resolver: Arc<StatementTreeResolver>, window: Duration) -> Self {
        Self {
            resolver,
            window,
            slots: Arc::new(DashMap::new()),
        }
    }

    /// Quiet window
    #[inline]
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Request resolution of a node, superseding any pending request for it
    ///
    /// Returns a receiver that observes `Pending` now and the outcome once
    /// the window elapses without a newer request.
    pub fn request(&self, id: NodeId, node: StatementNode) -> watch::Receiver<NodeState> {
        let mut slot = self.slots.entry(id).or_insert_with(Slot::new);
        slot.abort();
        slot.generation += 1;
        let generation = slot.generation;
        slot.state.send_replace(NodeState::Pending);
        let receiver = slot.state.subscribe();

        tracing::trace!(node = %id, generation, "resolution requested");

        let resolver = Arc::clone(&self.resolver);
        let slots = Arc::clone(&self.slots);
        let window = self.window;

        slot.task = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;

            let state = match resolver.resolve(&node).await {
                Ok(info) => NodeState::Resolved(info),
                Err(err) => NodeState::Failed(err),
            };

            match slots.get(&id) {
                Some(slot) if slot.generation == generation => {
                    slot.state.send_replace(state);
                }
                _ => tracing::debug!(node = %id, generation, "discarding stale resolution"),
            }
        }));

        receiver
    }

    /// Observe a node's state without requesting resolution
    #[must_use]
    pub fn subscribe(&self, id: NodeId) -> watch::Receiver<NodeState> {
        self.slots
            .entry(id)
            .or_insert_with(Slot::new)
            .state
            .subscribe()
    }

    /// Current state of a node
    #[must_use]
    pub fn state(&self, id: NodeId) -> NodeState {
        self.slots
            .get(&id)
            .map_or(NodeState::Idle, |slot| slot.state.borrow().clone())
    }

    /// Cancel pending work for a node and forget it
    ///
    /// Receivers of the node observe the channel closing. Returns whether
    /// the node was known.
    pub fn teardown(&self, id: NodeId) -> bool {
        match self.slots.remove(&id) {
            Some((_, mut slot)) => {
                slot.abort();
                tracing::trace!(node = %id, "node torn down");
                true
            }
            None => false,
        }
    }

    /// Number of tracked nodes
    #[inline]
    #[must_use]
    pub fn active(&self) -> usize {
        self.slots.len()
    }
}

impl Drop for DebouncedResolver {
    fn drop(&mut self) {
        for mut slot in self.slots.iter_mut() {
            slot.abort();
        }
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stmt_test_utils::{
        analysis_type_info, data_item_type_info, fixture_schema_source, key, memory_cache,
        typed_node, CountingSchemaSource, ANALYSIS_TYPE, DATA_ITEM_TYPE, STATEMENT_TYPE,
    };
    use tokio::time::sleep;

    fn debouncer(source: &Arc<CountingSchemaSource>) -> DebouncedResolver {
        let resolver = StatementTreeResolver::new(memory_cache(), Arc::clone(source) as _);
        DebouncedResolver::new(Arc::new(resolver), DebouncedResolver::DEFAULT_WINDOW)
    }

    async fn settled(mut rx: watch::Receiver<NodeState>) -> NodeState {
        let state = rx.wait_for(NodeState::is_settled).await.unwrap().clone();
        state
    }

    #[tokio::test(start_paused = true)]
    async fn burst_coalesces_to_last_request() {
        let source = Arc::new(fixture_schema_source());
        let debounced = debouncer(&source);
        let id = NodeId::new();

        debounced.request(id, typed_node(STATEMENT_TYPE));
        sleep(Duration::from_millis(100)).await;
        debounced.request(id, typed_node(DATA_ITEM_TYPE));
        sleep(Duration::from_millis(100)).await;
        let rx = debounced.request(id, typed_node(ANALYSIS_TYPE));

        assert_eq!(settled(rx).await, NodeState::Resolved(analysis_type_info()));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), vec![key(ANALYSIS_TYPE)]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_nodes_do_not_interfere() {
        let source = Arc::new(fixture_schema_source());
        let debounced = debouncer(&source);
        let (a, b) = (NodeId::new(), NodeId::new());

        let rx_a = debounced.request(a, typed_node(ANALYSIS_TYPE));
        let rx_b = debounced.request(b, typed_node(DATA_ITEM_TYPE));

        assert_eq!(settled(rx_a).await, NodeState::Resolved(analysis_type_info()));
        assert_eq!(settled(rx_b).await, NodeState::Resolved(data_item_type_info()));
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn request_is_pending_until_window_elapses() {
        let source = Arc::new(fixture_schema_source());
        let debounced = debouncer(&source);
        let id = NodeId::new();

        assert_eq!(debounced.state(id), NodeState::Idle);
        debounced.request(id, typed_node(ANALYSIS_TYPE));
        sleep(Duration::from_millis(299)).await;
        assert_eq!(debounced.state(id), NodeState::Pending);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_pending_lookup() {
        let source = Arc::new(fixture_schema_source());
        let debounced = debouncer(&source);
        let id = NodeId::new();

        let mut rx = debounced.request(id, typed_node(ANALYSIS_TYPE));
        sleep(Duration::from_millis(100)).await;
        assert!(debounced.teardown(id));
        assert!(!debounced.teardown(id));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(source.call_count(), 0);
        assert!(rx.changed().await.is_err());
        assert_eq!(debounced.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_lookup_is_superseded() {
        let source = Arc::new(
            CountingSchemaSource::new()
                .with_type(ANALYSIS_TYPE, analysis_type_info())
                .with_type(DATA_ITEM_TYPE, data_item_type_info())
                .with_delay(Duration::from_millis(500)),
        );
        let debounced = debouncer(&source);
        let id = NodeId::new();

        debounced.request(id, typed_node(ANALYSIS_TYPE));
        sleep(Duration::from_millis(400)).await;
        assert_eq!(source.call_count(), 1);

        let rx = debounced.request(id, typed_node(DATA_ITEM_TYPE));
        assert_eq!(settled(rx).await, NodeState::Resolved(data_item_type_info()));

        sleep(Duration::from_secs(2)).await;
        assert_eq!(debounced.state(id), NodeState::Resolved(data_item_type_info()));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_published() {
        let source = Arc::new(CountingSchemaSource::new());
        let debounced = debouncer(&source);
        let id = NodeId::new();

        let rx = debounced.request(id, typed_node(ANALYSIS_TYPE));
        assert!(matches!(
            settled(rx).await,
            NodeState::Failed(ResolveError::SchemaFetch { .. })
        ));
    }
}
