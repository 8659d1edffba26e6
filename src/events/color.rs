use serenity::{
    all::{GuildId, Member},
    prelude::Context,
};
use tracing::{debug, warn};

use crate::{
    common::gateway::SerenityGateway,
    models::{gateway::Gateway, handler::Handler},
};

impl Handler {
    /// Re-reads the bot's display color after its roles change so that open giveaways
    /// in the guild pick up the new accent on their next refresh.
    pub async fn on_self_update(&self, ctx: Context, member: Member) {
        let self_id = ctx.cache.current_user().id;
        if member.user.id != self_id {
            return;
        }
        self.refresh_color(ctx, member.guild_id).await;
    }

    pub async fn refresh_color(&self, ctx: Context, guild_id: GuildId) {
        let self_id = ctx.cache.current_user().id;
        let gateway = SerenityGateway::new(ctx.http.clone(), ctx.cache.clone(), self_id);
        let color = gateway.self_color(guild_id.get());
        debug!("Accent color for guild {} is now {:?}", guild_id, color);
        if let Err(err) = self.store.set_community_color(guild_id.get(), color).await {
            warn!(
                "Could not store accent color for guild {}. Failed with error: {:?}",
                guild_id, err
            );
        }
    }
}
