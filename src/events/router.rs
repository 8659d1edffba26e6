use serenity::{
    all::{GuildId, GuildMemberUpdateEvent, Interaction, Member, Role},
    model::prelude::Ready,
    prelude::{Context, EventHandler},
};

use crate::models::handler::Handler;

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        self.on_ready(ctx, ready).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.on_command(ctx, command).await;
        }
    }

    async fn guild_member_update(
        &self,
        ctx: Context,
        _old_if_available: Option<Member>,
        new: Option<Member>,
        _event: GuildMemberUpdateEvent,
    ) {
        let Some(member) = new else {
            return;
        };
        self.on_self_update(ctx, member).await;
    }

    async fn guild_role_update(&self, ctx: Context, _old_data_if_available: Option<Role>, new: Role) {
        let guild_id: GuildId = new.guild_id;
        self.refresh_color(ctx, guild_id).await;
    }
}
