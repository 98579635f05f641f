use std::sync::Arc;

use mongodb::Database;

use crate::config::AppConfig;
use crate::database::users::{MongoUserStore, UserStore};
use crate::services::clock::SystemClock;
use crate::services::reset_service::{RandomCodeGenerator, ResetService};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub reset_service: ResetService,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let store: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(db));
        let reset_service = ResetService::new(
            store.clone(),
            Arc::new(SystemClock),
            Arc::new(RandomCodeGenerator),
        );

        AppState {
            store,
            reset_service,
            config,
        }
    }

    #[cfg(test)]
    pub fn for_tests(store: Arc<dyn UserStore>) -> Self {
        let reset_service = ResetService::new(
            store.clone(),
            Arc::new(SystemClock),
            Arc::new(RandomCodeGenerator),
        );
        Self::for_tests_with(store, reset_service)
    }

    #[cfg(test)]
    pub fn for_tests_with(store: Arc<dyn UserStore>, reset_service: ResetService) -> Self {
        AppState {
            store,
            reset_service,
            config: AppConfig::for_tests(),
        }
    }
}
