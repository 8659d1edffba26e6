use std::sync::{atomic::AtomicBool, Arc};

use super::{config::UpdaterConfig, store::GiveawayStore};

#[derive(Clone)]
pub struct Handler {
    pub store: Arc<dyn GiveawayStore>,
    pub config: UpdaterConfig,
    pub updater_started: Arc<AtomicBool>,
}
