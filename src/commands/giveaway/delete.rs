use serenity::{all::CommandInteraction, builder::CreateEmbed};

use crate::{
    common::{giveaway::delete_giveaway, options::Options},
    models::{
        command::{CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

pub async fn delete(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(id) = options.get_id("id") else {
        return Err(ResponseError::Execution(
            "Could not get giveaway ID",
            Some("Please use the message ID for the giveaway ID".to_string()),
        ));
    };

    match handler.store.get(id).await {
        Ok(Some(giveaway)) if giveaway.channel_id == cmd.channel_id.get() => {}
        _ => {
            return Err(ResponseError::Execution(
                "This giveaway could not be found",
                Some("Run this command in the giveaway's channel, using its message ID.".to_string()),
            ))
        }
    }

    if !delete_giveaway(
        handler.store.as_ref(),
        ctx.gateway.as_ref(),
        cmd.channel_id.get(),
        id,
    )
    .await
    {
        return Err(ResponseError::Execution(
            "This giveaway has already ended",
            None,
        ));
    }

    ctx.reply(
        cmd,
        Response::new()
            .embed(CreateEmbed::new().title("Successfully deleted giveaway"))
            .ephemeral(true),
    )
    .await
}
