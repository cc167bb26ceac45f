use std::sync::Arc;

use sm_sources::SummaryManager;

pub struct AppState {
    pub manager: Arc<SummaryManager>,
}

impl AppState {
    pub fn new(manager: SummaryManager) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }

    pub fn backend(&self) -> &str {
        self.manager.loader().name()
    }
}
