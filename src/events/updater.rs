use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use time::OffsetDateTime;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, error};

use crate::{
    common::giveaway::{finalize, refresh},
    models::{
        config::UpdaterConfig,
        gateway::Gateway,
        giveaway::{Giveaway, GiveawayStatus},
        store::{GiveawayStore, StoreResult},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Horizon {
    Everything,
    Within(time::Duration),
    ClosingWindow,
}

/// One refresh frequency class: runs on ticks divisible by `every`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tier {
    pub every: u64,
    pub horizon: Horizon,
}

/// Ordered coarsest to finest; the first tier whose `every` divides the tick runs.
pub const TIERS: [Tier; 4] = [
    Tier {
        every: 300,
        horizon: Horizon::Everything,
    },
    Tier {
        every: 60,
        horizon: Horizon::Within(time::Duration::hours(1)),
    },
    Tier {
        every: 5,
        horizon: Horizon::Within(time::Duration::minutes(3)),
    },
    Tier {
        every: 1,
        horizon: Horizon::ClosingWindow,
    },
];

pub fn select_tier(tick: u64) -> &'static Tier {
    TIERS
        .iter()
        .find(|tier| tick % tier.every == 0)
        .unwrap_or(&TIERS[TIERS.len() - 1])
}

/// What a single tick did. Dropping it detaches the spawned remote calls.
pub struct TickReport {
    pub tier: &'static Tier,
    pub finalized: Vec<u64>,
    pub refreshed: Vec<u64>,
    pub tasks: Vec<JoinHandle<()>>,
}

impl TickReport {
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(err) = task.await {
                error!("Giveaway task failed: {:?}", err);
            }
        }
    }
}

pub struct Updater {
    store: Arc<dyn GiveawayStore>,
    gateway: Arc<dyn Gateway>,
    config: UpdaterConfig,
    rng: StdRng,
}

impl Updater {
    pub fn new(
        store: Arc<dyn GiveawayStore>,
        gateway: Arc<dyn Gateway>,
        config: UpdaterConfig,
    ) -> Self {
        Updater {
            store,
            gateway,
            config,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Ticks forever. Each tick's store reads and deletes finish before the next tick starts;
    /// the remote calls it spawned may still be running.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.config.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut index: u64 = 0;
        loop {
            interval.tick().await;
            let start = std::time::Instant::now();
            let report = self.tick(index, OffsetDateTime::now_utc()).await;
            if !report.finalized.is_empty() || !report.refreshed.is_empty() {
                debug!(
                    "Tick {} finalized {} and refreshed {} giveaways in {:?}",
                    index,
                    report.finalized.len(),
                    report.refreshed.len(),
                    start.elapsed()
                );
            }
            index = index.wrapping_add(1);
        }
    }

    pub async fn tick(&mut self, index: u64, now: OffsetDateTime) -> TickReport {
        let tier = select_tier(index);
        let mut report = TickReport {
            tier,
            finalized: Vec::new(),
            refreshed: Vec::new(),
            tasks: Vec::new(),
        };

        // forced ends are claimed before the deadline sweep can see them
        match self.store.list_with_status(GiveawayStatus::EndNow).await {
            Ok(giveaways) => self.claim_and_finalize(giveaways, &mut report).await,
            Err(err) => error!("Failed to fetch giveaways flagged to end: {}", err),
        }

        match self
            .store
            .list_ending_before(now + self.config.lookahead)
            .await
        {
            Ok(giveaways) => self.claim_and_finalize(giveaways, &mut report).await,
            Err(err) => error!("Failed to fetch ending giveaways: {}", err),
        }

        match self.due_for_refresh(tier, now).await {
            Ok(giveaways) => {
                for giveaway in giveaways {
                    report.refreshed.push(giveaway.message_id);
                    report.tasks.push(tokio::spawn(refresh(
                        self.store.clone(),
                        self.gateway.clone(),
                        giveaway,
                        now,
                        self.config.closing_window,
                    )));
                }
            }
            Err(err) => error!("Failed to fetch giveaways to refresh: {}", err),
        }

        report
    }

    async fn due_for_refresh(&self, tier: &Tier, now: OffsetDateTime) -> StoreResult<Vec<Giveaway>> {
        match tier.horizon {
            Horizon::Everything => self.store.list_all().await,
            Horizon::Within(horizon) => self.store.list_ending_before(now + horizon).await,
            Horizon::ClosingWindow => {
                self.store
                    .list_ending_before(now + self.config.closing_window)
                    .await
            }
        }
    }

    async fn claim_and_finalize(&mut self, giveaways: Vec<Giveaway>, report: &mut TickReport) {
        for giveaway in giveaways {
            match self.store.delete(giveaway.message_id).await {
                Ok(true) => {}
                Ok(false) => {
                    debug!("Giveaway {} was already claimed", giveaway.message_id);
                    continue;
                }
                Err(err) => {
                    error!(
                        "Could not delete giveaway {} from database. Failed with error: {:?}",
                        giveaway.message_id, err
                    );
                    continue;
                }
            }

            report.finalized.push(giveaway.message_id);
            let gateway = self.gateway.clone();
            let emoji = self.config.emoji.clone();
            let limit = self.config.participant_limit;
            let seed: u64 = self.rng.gen();
            report.tasks.push(tokio::spawn(async move {
                finalize(gateway, giveaway, emoji, limit, seed).await;
            }));
        }
    }
}
