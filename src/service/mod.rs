use std::sync::Arc;

use crate::config::Config;
use crate::database::Database;
use crate::push::PushSender;
use crate::search::JobSearch;
use crate::service::alert_service::AlertService;
use crate::service::digest_service::DigestService;

pub mod alert_service;
pub mod cadence;
pub mod dedup;
pub mod digest_service;
pub mod error;
pub mod resolver;

pub struct Services {
    pub alert: Arc<AlertService>,
    pub digest: Arc<DigestService>,
}

impl Services {
    pub fn new(
        db: Arc<Database>,
        search: Arc<dyn JobSearch>,
        push: Arc<dyn PushSender>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            alert: Arc::new(AlertService::new(
                db.clone(),
                search,
                push.clone(),
                config.clone(),
            )),
            digest: Arc::new(DigestService::new(db, push, config)),
        }
    }
}
