use time::OffsetDateTime;

use super::giveaway::{Giveaway, GiveawayStatus};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("giveaway {0} already exists")]
    Duplicate(u64),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for live giveaways and per-guild display settings.
///
/// Every operation works on one record at a time. `delete` must be atomic: when two callers
/// race to delete the same giveaway exactly one of them sees `true`, and that caller owns
/// the finalization.
#[async_trait::async_trait]
pub trait GiveawayStore: Send + Sync {
    async fn create(&self, giveaway: &Giveaway) -> StoreResult<()>;

    async fn get(&self, message_id: u64) -> StoreResult<Option<Giveaway>>;

    async fn delete(&self, message_id: u64) -> StoreResult<bool>;

    /// Returns `false` when no live giveaway has this id.
    async fn set_status(&self, message_id: u64, status: GiveawayStatus) -> StoreResult<bool>;

    async fn list_all(&self) -> StoreResult<Vec<Giveaway>>;

    async fn list_with_status(&self, status: GiveawayStatus) -> StoreResult<Vec<Giveaway>>;

    /// Giveaways whose end is strictly before `cutoff`.
    async fn list_ending_before(&self, cutoff: OffsetDateTime) -> StoreResult<Vec<Giveaway>>;

    async fn community_color(&self, guild_id: u64) -> StoreResult<Option<u32>>;

    async fn set_community_color(&self, guild_id: u64, color: Option<u32>) -> StoreResult<()>;
}
