//! Page session — per-page-view engine state and the reorder control flow.
//!
//! A [`PageSession`] owns the navigation history, the reorder gate, the
//! current section order and the visibility subscriptions for exactly one
//! page view. Each piece of state has this single writer; other components
//! read through accessors. Order changes fan out to the page over a
//! broadcast channel.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::engine::gate::{GateState, ReorderGate};
use crate::engine::history::NavigationHistory;
use crate::engine::tracker::VisibilityTracker;
use crate::engine::validator::validate_order;
use crate::rank::{RankRequest, SectionRanker};
use crate::registry::{SectionKey, SectionRegistry};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Events pushed to the page when session state changes.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A validated reorder was applied; sections keep their identity and
    /// only change position.
    OrderChanged { order: Vec<SectionKey> },
}

/// Mutable state owned by a page session.
struct SessionState {
    history: NavigationHistory,
    gate: ReorderGate,
    order: Vec<SectionKey>,
    tracker: VisibilityTracker,
    closed: bool,
}

/// One visitor's page view.
pub struct PageSession {
    id: Uuid,
    registry: Arc<SectionRegistry>,
    config: EngineConfig,
    ranker: Arc<dyn SectionRanker>,
    state: RwLock<SessionState>,
    tx: broadcast::Sender<SessionEvent>,
    created_at: DateTime<Utc>,
}

impl PageSession {
    pub fn new(
        registry: Arc<SectionRegistry>,
        config: EngineConfig,
        ranker: Arc<dyn SectionRanker>,
    ) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);

        let order = registry.default_order();
        let mut tracker = VisibilityTracker::new(config.visible_fraction);
        tracker.resubscribe_all(&order);

        Arc::new(Self {
            id: Uuid::new_v4(),
            registry,
            state: RwLock::new(SessionState {
                history: NavigationHistory::new(),
                gate: ReorderGate::new(config.min_history, config.max_rank_attempts),
                order,
                tracker,
                closed: false,
            }),
            config,
            ranker,
            tx,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Subscribe to session events. The page's WebSocket handler calls
    /// this.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub async fn current_order(&self) -> Vec<SectionKey> {
        self.state.read().await.order.clone()
    }

    pub async fn gate_state(&self) -> GateState {
        self.state.read().await.gate.state()
    }

    pub async fn history_len(&self) -> usize {
        self.state.read().await.history.len()
    }

    /// Handle an intersection report from the page. Qualifying first-time
    /// entries extend the history; once enough history exists and the gate
    /// is idle, exactly one ranking request is dispatched.
    pub async fn report_visibility(self: &Arc<Self>, key: SectionKey, visible_fraction: f64) {
        let armed = {
            let mut state = self.state.write().await;
            if state.closed {
                return;
            }
            if !self.registry.contains(&key) {
                debug!(session = %self.id, key = %key, "Report for unknown section; ignoring");
                return;
            }
            if !state.tracker.report(&key, visible_fraction) {
                return;
            }
            if !state.history.record(key.clone()) {
                return;
            }

            debug!(
                session = %self.id,
                key = %key,
                history_len = state.history.len(),
                "Section entered viewport"
            );

            // Check-and-set stays inside this critical section: a second
            // qualifying entry cannot observe Idle before the first sets
            // InFlight.
            let history_len = state.history.len();
            state.gate.try_arm(history_len)
        };

        if armed {
            let session = Arc::clone(self);
            tokio::spawn(async move {
                session.run_rank_attempt().await;
            });
        }
    }

    /// Issue one ranking request and apply the outcome. Holds no lock while
    /// the request is in flight.
    async fn run_rank_attempt(self: Arc<Self>) {
        let request = {
            let state = self.state.read().await;
            RankRequest {
                user_navigation_history: state.history.serialized(),
                analysis_corpus: self.config.analysis_corpus.clone(),
                content_sections: self
                    .registry
                    .keys()
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
            }
        };

        info!(
            session = %self.id,
            history = %request.user_navigation_history,
            "Requesting section ranking"
        );

        let outcome = self.ranker.rank(request).await;

        let mut state = self.state.write().await;
        if state.closed {
            debug!(session = %self.id, "Ranking result arrived after close; dropping");
            return;
        }

        match outcome {
            Ok(response) => {
                match validate_order(&response.prioritized_content_sections, &self.registry.keys())
                {
                    Some(order) => {
                        info!(
                            session = %self.id,
                            order = %order
                                .iter()
                                .map(|k| k.as_str())
                                .collect::<Vec<_>>()
                                .join(", "),
                            "Applying ranked section order"
                        );
                        state.order = order.clone();
                        state.gate.settle();
                        // The page re-renders its element set in the new
                        // order, so the tracker re-subscribes.
                        let keys = state.order.clone();
                        state.tracker.resubscribe_all(&keys);
                        let _ = self.tx.send(SessionEvent::OrderChanged { order });
                    }
                    None => {
                        warn!(
                            session = %self.id,
                            candidate = ?response.prioritized_content_sections,
                            "Ranker returned an invalid section order; keeping current order"
                        );
                        state.gate.reset_after_failure();
                    }
                }
            }
            Err(e) => {
                warn!(
                    session = %self.id,
                    error = %e,
                    "Ranking request failed; keeping current order"
                );
                state.gate.reset_after_failure();
            }
        }
    }

    /// Tear the session down: release visibility subscriptions and stop
    /// accepting state updates. A ranking result that arrives after this
    /// is dropped rather than faulting.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        state.closed = true;
        state.tracker.clear();
        debug!(session = %self.id, "Session closed");
    }
}

/// Live page sessions, one per connected page view.
pub struct SessionManager {
    registry: Arc<SectionRegistry>,
    config: EngineConfig,
    ranker: Arc<dyn SectionRanker>,
    sessions: RwLock<HashMap<Uuid, Arc<PageSession>>>,
}

impl SessionManager {
    pub fn new(
        registry: Arc<SectionRegistry>,
        config: EngineConfig,
        ranker: Arc<dyn SectionRanker>,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry,
            config,
            ranker,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    pub fn registry(&self) -> &Arc<SectionRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Open a session for a fresh page view.
    pub async fn open(&self) -> Arc<PageSession> {
        let session = PageSession::new(
            Arc::clone(&self.registry),
            self.config.clone(),
            Arc::clone(&self.ranker),
        );
        info!(session = %session.id(), "Page session opened");
        self.sessions
            .write()
            .await
            .insert(session.id(), Arc::clone(&session));
        session
    }

    /// Close and drop a session. Safe to call for unknown ids.
    pub async fn close(&self, id: Uuid) {
        let session = self.sessions.write().await.remove(&id);
        if let Some(session) = session {
            session.close().await;
            info!(session = %id, "Page session removed");
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<PageSession>> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
