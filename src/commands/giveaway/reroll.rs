use rand::{rngs::StdRng, SeedableRng};
use serenity::{all::CommandInteraction, builder::CreateAllowedMentions};
use tracing::debug;

use crate::{
    common::{giveaway, options::Options, render::reroll_announcement},
    models::{
        command::{CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::MAX_WINNERS;

pub async fn reroll(
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
    let count = options.get_integer("winners").unwrap_or(1).clamp(1, MAX_WINNERS) as usize;

    // a running giveaway still has its draw ahead of it
    if let Ok(Some(_)) = handler.store.get(id).await {
        return Err(ResponseError::Execution(
            "This giveaway is still running",
            Some("Use `/giveaway end` to finish it first.".to_string()),
        ));
    }

    let winners = match giveaway::reroll(
        ctx.gateway.as_ref(),
        &handler.config,
        cmd.channel_id.get(),
        id,
        count,
        &mut StdRng::from_entropy(),
    )
    .await
    {
        Ok(winners) => winners,
        Err(err) => {
            debug!("Could not reroll giveaway {}: {:?}", id, err);
            return Err(ResponseError::Execution(
                "This giveaway could not be found",
                Some("Run this command in the giveaway's channel, using its message ID.".to_string()),
            ));
        }
    };

    ctx.reply(
        cmd,
        Response::new()
            .content(reroll_announcement(&winners))
            .allowed_mentions(CreateAllowedMentions::new().users(winners.iter().copied())),
    )
    .await
}
