use std::sync::Arc;

use adapter::repository::event::EventRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use adapter::table::redis::RedisClient;
use adapter::table::KvTable;
use kernel::repository::event::EventRepository;
use kernel::repository::user::UserRepository;
use kernel::service::registration::RegistrationService;
use shared::config::AppConfig;
use shared::error::AppResult;

/// Composition root. Repositories and the registration service are built
/// once over an injected table backend and handed out as shared handles;
/// callers never assemble them per request.
#[derive(Clone)]
pub struct AppRegistry {
    user_repository: Arc<dyn UserRepository>,
    event_repository: Arc<dyn EventRepository>,
    registration_service: Arc<RegistrationService>,
}

impl AppRegistry {
    pub fn new(table: Arc<dyn KvTable>) -> Self {
        let user_repository = Arc::new(UserRepositoryImpl::new(table.clone()));
        let event_repository = Arc::new(EventRepositoryImpl::new(table));
        let registration_service = Arc::new(RegistrationService::new(
            user_repository.clone(),
            event_repository.clone(),
        ));
        Self {
            user_repository,
            event_repository,
            registration_service,
        }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let table = RedisClient::new(&config.redis, &config.table.table_name)?;
        Ok(Self::new(Arc::new(table)))
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn event_repository(&self) -> Arc<dyn EventRepository> {
        self.event_repository.clone()
    }

    pub fn registration_service(&self) -> Arc<RegistrationService> {
        self.registration_service.clone()
    }
}
