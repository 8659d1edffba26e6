use std::sync::{atomic::AtomicBool, Arc};

use serenity::{all::CommandInteraction, prelude::Context as IncomingContext};
use tracing::{debug, error};

use crate::{
    commands::get_command_list,
    common::gateway::SerenityGateway,
    models::{
        command::{CommandContext, CommandContextReply, FailedCommandContext},
        handler::Handler,
        response::{Response, ResponseError},
    },
};

impl Handler {
    pub async fn on_command(&self, ctx: IncomingContext, command: CommandInteraction) {
        let start = std::time::Instant::now();

        let Some(guild_id) = command.guild_id else {
            let fail_context = FailedCommandContext { ctx };
            if let Err(err) = fail_context
                .reply(
                    &command,
                    Response::new()
                        .content("Giveaways can only be run inside a server".to_string())
                        .ephemeral(true),
                )
                .await
            {
                error!("Failed to reply to command: {:?}", err);
            }
            return;
        };

        let can_manage = command
            .member
            .as_ref()
            .and_then(|member| member.permissions)
            .is_some_and(|permissions| permissions.manage_guild());
        if !can_manage {
            let fail_context = FailedCommandContext { ctx };
            if let Err(err) = fail_context
                .error_message(
                    &command,
                    ResponseError::Execution(
                        "You do not have permission to do this!",
                        Some("Running giveaways requires the `Manage Server` permission.".to_string()),
                    ),
                )
                .await
            {
                error!("Failed to reply to command: {:?}", err);
            }
            return;
        }

        let self_id = ctx.cache.current_user().id;
        let gateway = Arc::new(SerenityGateway::new(
            ctx.http.clone(),
            ctx.cache.clone(),
            self_id,
        ));
        let command_context = CommandContext {
            ctx,
            has_responsed: AtomicBool::new(false),
            guild_id: guild_id.get(),
            gateway,
        };

        debug!("Context generated in {:?}", start.elapsed());

        for existing_command in get_command_list() {
            if existing_command.name() != command.data.name {
                continue;
            }
            if let Err(err) = existing_command
                .router(self, &command_context, &command)
                .await
            {
                debug!("Command {} failed: {:?}", command.data.name, err);
                if let Err(err) = command_context.error_message(&command, err).await {
                    error!("Failed to reply to command: {:?}", err);
                }
            }
        }

        debug!("Took {:?} to handle a command", start.elapsed());
    }
}
