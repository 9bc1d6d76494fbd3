use std::sync::Arc;

use chrono::NaiveDate;

use agora_db::ForumStore;

use crate::error::ForumError;
use crate::session::SessionConfig;
use crate::views::Views;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn ForumStore>,
    pub session: SessionConfig,
    pub views: Views,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn ForumStore>, session: SessionConfig) -> anyhow::Result<AppState> {
        Ok(Arc::new(Self {
            store,
            session,
            views: Views::new()?,
        }))
    }

    /// Run a repository call off the async runtime.
    pub async fn db<F, T>(&self, f: F) -> Result<T, ForumError>
    where
        F: FnOnce(&dyn ForumStore) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let result = tokio::task::spawn_blocking(move || f(store.as_ref())).await?;
        Ok(result?)
    }
}

/// Date stamped on new rows.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
