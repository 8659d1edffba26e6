use std::sync::Arc;

use serenity::{
    all::{ChannelId, GuildId, MessageId, ReactionType, UserId},
    cache::Cache,
    http::Http,
};
use tracing::debug;

use crate::models::{
    display::DisplayPayload,
    gateway::{Gateway, GatewayError},
};

/// Discord access for the giveaway engine.
///
/// Owns the REST client and the gateway cache shared by every shard, and answers
/// channel and guild lookups from that cache instead of walking shards.
#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<Http>,
    cache: Arc<Cache>,
    self_id: UserId,
}

impl SerenityGateway {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>, self_id: UserId) -> Self {
        SerenityGateway {
            http,
            cache,
            self_id,
        }
    }
}

#[async_trait::async_trait]
impl Gateway for SerenityGateway {
    fn self_id(&self) -> u64 {
        self.self_id.get()
    }

    fn can_post(&self, guild_id: u64, channel_id: u64) -> bool {
        let Some(guild) = self.cache.guild(GuildId::new(guild_id)) else {
            debug!("Guild {} is not cached", guild_id);
            return false;
        };
        let Some(channel) = guild.channels.get(&ChannelId::new(channel_id)) else {
            return false;
        };
        let Some(member) = guild.members.get(&self.self_id) else {
            return false;
        };

        let permissions = guild.user_permissions_in(channel, member);
        permissions.view_channel()
            && permissions.send_messages()
            && permissions.embed_links()
            && permissions.add_reactions()
            && permissions.read_message_history()
    }

    fn self_color(&self, guild_id: u64) -> Option<u32> {
        let guild = self.cache.guild(GuildId::new(guild_id))?;
        let member = guild.members.get(&self.self_id)?;
        member
            .roles
            .iter()
            .filter_map(|role_id| guild.roles.get(role_id))
            .filter(|role| role.colour.0 != 0)
            .max_by_key(|role| role.position)
            .map(|role| role.colour.0)
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        payload: &DisplayPayload,
    ) -> Result<(), GatewayError> {
        ChannelId::new(channel_id)
            .edit_message(&self.http, MessageId::new(message_id), payload.to_edit())
            .await?;
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: u64,
        payload: &DisplayPayload,
    ) -> Result<u64, GatewayError> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.http, payload.to_message())
            .await?;
        Ok(message.id.get())
    }

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), GatewayError> {
        ChannelId::new(channel_id)
            .create_reaction(
                &self.http,
                MessageId::new(message_id),
                ReactionType::Unicode(emoji.to_string()),
            )
            .await?;
        Ok(())
    }

    async fn fetch_reaction_users(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
        limit: u8,
    ) -> Result<Vec<u64>, GatewayError> {
        let users = ChannelId::new(channel_id)
            .reaction_users(
                &self.http,
                MessageId::new(message_id),
                ReactionType::Unicode(emoji.to_string()),
                Some(limit),
                None::<UserId>,
            )
            .await?;
        Ok(users.into_iter().map(|user| user.id.get()).collect())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError> {
        ChannelId::new(channel_id)
            .delete_message(&self.http, MessageId::new(message_id))
            .await?;
        Ok(())
    }
}
