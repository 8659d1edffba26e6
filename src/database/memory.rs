use dashmap::{mapref::entry::Entry, DashMap};
use time::OffsetDateTime;

use crate::models::{
    giveaway::{Giveaway, GiveawayStatus},
    store::{GiveawayStore, StoreError, StoreResult},
};

/// Giveaway store kept entirely in process memory.
#[derive(Default)]
pub struct MemoryStore {
    giveaways: DashMap<u64, (Giveaway, GiveawayStatus)>,
    colors: DashMap<u64, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.giveaways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.giveaways.is_empty()
    }

    fn collect<F>(&self, filter: F) -> Vec<Giveaway>
    where
        F: Fn(&Giveaway, GiveawayStatus) -> bool,
    {
        let mut giveaways = self
            .giveaways
            .iter()
            .filter(|entry| filter(&entry.value().0, entry.value().1))
            .map(|entry| entry.value().0.clone())
            .collect::<Vec<_>>();
        giveaways.sort_by_key(|giveaway| (giveaway.end, giveaway.message_id));
        giveaways
    }
}

#[async_trait::async_trait]
impl GiveawayStore for MemoryStore {
    async fn create(&self, giveaway: &Giveaway) -> StoreResult<()> {
        match self.giveaways.entry(giveaway.message_id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(giveaway.message_id)),
            Entry::Vacant(entry) => {
                entry.insert((giveaway.clone(), GiveawayStatus::Run));
                Ok(())
            }
        }
    }

    async fn get(&self, message_id: u64) -> StoreResult<Option<Giveaway>> {
        Ok(self
            .giveaways
            .get(&message_id)
            .map(|entry| entry.value().0.clone()))
    }

    async fn delete(&self, message_id: u64) -> StoreResult<bool> {
        Ok(self.giveaways.remove(&message_id).is_some())
    }

    async fn set_status(&self, message_id: u64, status: GiveawayStatus) -> StoreResult<bool> {
        match self.giveaways.get_mut(&message_id) {
            Some(mut entry) => {
                entry.value_mut().1 = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> StoreResult<Vec<Giveaway>> {
        Ok(self.collect(|_, _| true))
    }

    async fn list_with_status(&self, status: GiveawayStatus) -> StoreResult<Vec<Giveaway>> {
        Ok(self.collect(|_, current| current == status))
    }

    async fn list_ending_before(&self, cutoff: OffsetDateTime) -> StoreResult<Vec<Giveaway>> {
        Ok(self.collect(|giveaway, _| giveaway.end < cutoff))
    }

    async fn community_color(&self, guild_id: u64) -> StoreResult<Option<u32>> {
        Ok(self.colors.get(&guild_id).map(|color| *color))
    }

    async fn set_community_color(&self, guild_id: u64, color: Option<u32>) -> StoreResult<()> {
        match color {
            Some(color) => {
                self.colors.insert(guild_id, color);
            }
            None => {
                self.colors.remove(&guild_id);
            }
        }
        Ok(())
    }
}
