use crate::auth::{AuthError, AuthState};
use crate::config::AppConfig;
use crate::notifications::NotificationCenter;
use crate::ports::Clock;
use crate::seed::{self, SeedError};
use crate::store::{Store, StoreError};

use time::Date;

use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid auth configuration: {0}")]
    Auth(#[from] AuthError),
    #[error("failed to open data directory: {0}")]
    Store(#[from] StoreError),
    #[error("failed to seed demo data: {0}")]
    Seed(#[from] SeedError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub(crate) auth: AuthState,
    pub(crate) store: Arc<Store>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) notifications: Arc<Mutex<NotificationCenter>>,
}

impl AppState {
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self, StateError> {
        let auth = AuthState::from_config(&config)?;
        let store = Store::open(&config.data_dir)?;
        if config.seed_demo_data {
            seed::ensure_seeded(&store, clock.now())?;
        }
        let notifications = NotificationCenter::seeded(clock.now());

        Ok(Self {
            config,
            auth,
            store: Arc::new(store),
            clock,
            notifications: Arc::new(Mutex::new(notifications)),
        })
    }

    pub(crate) fn today(&self) -> Date {
        self.clock.today()
    }

    pub(crate) fn unread_notifications(&self) -> usize {
        self.notifications
            .lock()
            .expect("notifications lock")
            .unread_count()
    }
}
