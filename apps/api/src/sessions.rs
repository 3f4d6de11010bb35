//! In-memory session store. Each browser session owns one `AnalysisController`.
//! Nothing is persisted; idle sessions are dropped when new ones are created.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::controller::AnalysisController;

struct SessionEntry {
    controller: Arc<AnalysisController>,
    last_seen: DateTime<Utc>,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    analyzer: Arc<dyn Analyzer>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(analyzer: Arc<dyn Analyzer>, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            analyzer,
            ttl,
        }
    }

    pub async fn create(&self) -> (Uuid, Arc<AnalysisController>) {
        self.create_at(Utc::now()).await
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<AnalysisController>> {
        self.get_at(id, Utc::now()).await
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn create_at(&self, now: DateTime<Utc>) -> (Uuid, Arc<AnalysisController>) {
        let mut sessions = self.sessions.write().await;

        let cutoff = now - self.ttl;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen >= cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }

        let id = Uuid::new_v4();
        let controller = Arc::new(AnalysisController::new(Arc::clone(&self.analyzer)));
        sessions.insert(
            id,
            SessionEntry {
                controller: Arc::clone(&controller),
                last_seen: now,
            },
        );
        debug!(session_id = %id, "Session created");

        (id, controller)
    }

    async fn get_at(&self, id: Uuid, now: DateTime<Utc>) -> Option<Arc<AnalysisController>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = now;
        Some(Arc::clone(&entry.controller))
    }
}
