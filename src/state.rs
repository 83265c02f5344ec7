use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Environment;
use crate::models::Transaction;

#[derive(Debug, Default)]
struct Inner {
    last_finalized: Option<Transaction>,
    favorites: HashSet<String>,
}

/// State shared between the live feed and the line commands
#[derive(Debug, Clone)]
pub struct AppState {
    selected_environment: Arc<Environment>,
    inner: Arc<RwLock<Inner>>,
}

impl AppState {
    pub fn new(selected_environment: Environment) -> Self {
        Self {
            selected_environment: Arc::new(selected_environment),
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    pub fn selected_environment(&self) -> &Environment {
        &self.selected_environment
    }

    pub async fn last_finalized(&self) -> Option<Transaction> {
        self.inner.read().await.last_finalized.clone()
    }

    pub async fn set_last_finalized(&self, txn: Transaction) {
        self.inner.write().await.last_finalized = Some(txn);
    }

    /// Flip the star on a transaction; returns whether it is now starred
    pub async fn toggle_favorite(&self, transaction_id: &str) -> bool {
        let mut inner = self.inner.write().await;
        if inner.favorites.remove(transaction_id) {
            false
        } else {
            inner.favorites.insert(transaction_id.to_string());
            true
        }
    }

    pub async fn favorites(&self) -> HashSet<String> {
        self.inner.read().await.favorites.clone()
    }
}
