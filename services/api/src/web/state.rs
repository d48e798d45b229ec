//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-session journal view.

use std::sync::Arc;

use chrono::Duration;
use journal_core::{
    GatePolicy, Journal, MemoryStore, ScopedStore, SubmissionGate, WorldClock,
    ports::{AuthStore, RecordStore},
};

use crate::config::Config;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub auth: Arc<dyn AuthStore>,
    pub config: Arc<Config>,
    pub clock: WorldClock,
    /// Backing storage for every session's submission gate. Advisory only:
    /// the state is scoped per auth session and lost on restart, mirroring
    /// how easily a browser-local gate is cleared.
    gate_state: MemoryStore,
}

impl AppState {
    pub fn new(
        records: Arc<dyn RecordStore>,
        auth: Arc<dyn AuthStore>,
        config: Arc<Config>,
    ) -> Self {
        let clock = WorldClock::new(config.world_epoch);
        Self {
            records,
            auth,
            config,
            clock,
            gate_state: MemoryStore::new(),
        }
    }

    /// Builds the journal view for one auth session: the shared record
    /// store plus a gate whose state is namespaced to that session.
    pub fn journal_for(&self, session_id: &str) -> Journal<ScopedStore<MemoryStore>> {
        let policy = GatePolicy {
            min_text_len: self.config.min_text_len,
            min_interval: Duration::seconds(self.config.min_submit_interval_secs),
        };
        let store = ScopedStore::new(self.gate_state.clone(), session_id);
        Journal::new(
            self.records.clone(),
            SubmissionGate::new(policy, store),
            self.clock,
        )
    }
}
