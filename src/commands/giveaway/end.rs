use serenity::{all::CommandInteraction, builder::CreateEmbed};

use crate::{
    common::{giveaway::end_giveaway_now, options::Options},
    models::{
        command::{CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

pub async fn end(
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

    if !end_giveaway_now(handler.store.as_ref(), cmd.channel_id.get(), id).await {
        return Err(ResponseError::Execution(
            "This giveaway could not be found",
            Some("Run this command in the giveaway's channel, using its message ID.".to_string()),
        ));
    }

    ctx.reply(
        cmd,
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("Ending giveaway")
                    .description("Winners will be announced in a moment."),
            )
            .ephemeral(true),
    )
    .await
}
