use time::OffsetDateTime;
use tracing::debug;

use crate::models::{
    giveaway::{DatabaseGiveaway, Giveaway, GiveawayStatus},
    store::{GiveawayStore, StoreError, StoreResult},
};

const GIVEAWAY_COLUMNS: &str =
    "message_id, channel_id, guild_id, end_time, winners, prize";

/// Giveaways live in Postgres, guild accent colors in Redis.
#[derive(Clone)]
pub struct PostgresStore {
    pub main_database: sqlx::PgPool,
    pub redis_database: redis::Client,
}

impl PostgresStore {
    pub fn new(main_database: sqlx::PgPool, redis_database: redis::Client) -> Self {
        PostgresStore {
            main_database,
            redis_database,
        }
    }

    fn color_key(guild_id: u64) -> String {
        format!("guild:{guild_id}:accent_color")
    }

    fn into_giveaways(rows: Vec<DatabaseGiveaway>) -> Vec<Giveaway> {
        rows.into_iter().map(Giveaway::from).collect()
    }
}

#[async_trait::async_trait]
impl GiveawayStore for PostgresStore {
    async fn create(&self, giveaway: &Giveaway) -> StoreResult<()> {
        let result = sqlx::query(
            "INSERT INTO giveaways (message_id, channel_id, guild_id, end_time, winners, prize, status) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(giveaway.message_id as i64)
        .bind(giveaway.channel_id as i64)
        .bind(giveaway.guild_id as i64)
        .bind(giveaway.end)
        .bind(giveaway.winners as i32)
        .bind(giveaway.prize.as_deref())
        .bind(GiveawayStatus::Run.as_ref())
        .execute(&self.main_database)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(StoreError::Duplicate(giveaway.message_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get(&self, message_id: u64) -> StoreResult<Option<Giveaway>> {
        let row = sqlx::query_as::<_, DatabaseGiveaway>(&format!(
            "SELECT {GIVEAWAY_COLUMNS} FROM giveaways WHERE message_id = $1"
        ))
        .bind(message_id as i64)
        .fetch_optional(&self.main_database)
        .await?;
        Ok(row.map(Giveaway::from))
    }

    async fn delete(&self, message_id: u64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM giveaways WHERE message_id = $1")
            .bind(message_id as i64)
            .execute(&self.main_database)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn set_status(&self, message_id: u64, status: GiveawayStatus) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE giveaways SET status = $1 WHERE message_id = $2")
            .bind(status.as_ref())
            .bind(message_id as i64)
            .execute(&self.main_database)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_all(&self) -> StoreResult<Vec<Giveaway>> {
        let start = std::time::Instant::now();
        let rows = sqlx::query_as::<_, DatabaseGiveaway>(&format!(
            "SELECT {GIVEAWAY_COLUMNS} FROM giveaways ORDER BY end_time"
        ))
        .fetch_all(&self.main_database)
        .await?;
        debug!("Fetched all {} giveaways in {:?}", rows.len(), start.elapsed());
        Ok(Self::into_giveaways(rows))
    }

    async fn list_with_status(&self, status: GiveawayStatus) -> StoreResult<Vec<Giveaway>> {
        let rows = sqlx::query_as::<_, DatabaseGiveaway>(&format!(
            "SELECT {GIVEAWAY_COLUMNS} FROM giveaways WHERE status = $1 ORDER BY end_time"
        ))
        .bind(status.as_ref())
        .fetch_all(&self.main_database)
        .await?;
        Ok(Self::into_giveaways(rows))
    }

    async fn list_ending_before(&self, cutoff: OffsetDateTime) -> StoreResult<Vec<Giveaway>> {
        let start = std::time::Instant::now();
        let rows = sqlx::query_as::<_, DatabaseGiveaway>(&format!(
            "SELECT {GIVEAWAY_COLUMNS} FROM giveaways WHERE end_time < $1 ORDER BY end_time"
        ))
        .bind(cutoff)
        .fetch_all(&self.main_database)
        .await?;
        debug!(
            "Fetched {} giveaways ending before {} in {:?}",
            rows.len(),
            cutoff,
            start.elapsed()
        );
        Ok(Self::into_giveaways(rows))
    }

    async fn community_color(&self, guild_id: u64) -> StoreResult<Option<u32>> {
        let start = std::time::Instant::now();
        let mut connection = self.redis_database.get_multiplexed_async_connection().await?;
        debug!("Got Redis connection in {:?}", start.elapsed());

        let color: Option<u32> = redis::cmd("GET")
            .arg(Self::color_key(guild_id))
            .query_async(&mut connection)
            .await?;
        Ok(color)
    }

    async fn set_community_color(&self, guild_id: u64, color: Option<u32>) -> StoreResult<()> {
        let mut connection = self.redis_database.get_multiplexed_async_connection().await?;
        match color {
            Some(color) => {
                let () = redis::cmd("SET")
                    .arg(Self::color_key(guild_id))
                    .arg(color)
                    .query_async(&mut connection)
                    .await?;
            }
            None => {
                let _: i64 = redis::cmd("DEL")
                    .arg(Self::color_key(guild_id))
                    .query_async(&mut connection)
                    .await?;
            }
        }
        debug!("Stored accent color {:?} for guild {}", color, guild_id);
        Ok(())
    }
}
