use serenity::{all::CommandInteraction, builder::CreateEmbed};
use time::OffsetDateTime;

use crate::{
    common::{giveaway::start_giveaway, options::Options},
    models::{
        command::{CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::validate_request;

pub async fn start(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(duration) = options.get_string("duration").into_owned() else {
        return Err(ResponseError::Execution(
            "No duration was given",
            Some("Please provide how long the giveaway should run.".to_string()),
        ));
    };
    let winners = options.get_integer("winners").unwrap_or(1);
    let prize = options.get_string("prize").into_owned();
    let (seconds, winners) = validate_request(&duration, winners)?;

    let started = start_giveaway(
        handler.store.as_ref(),
        ctx.gateway.as_ref(),
        &handler.config,
        ctx.guild_id,
        cmd.channel_id.get(),
        OffsetDateTime::now_utc(),
        seconds,
        winners,
        prize.as_deref(),
    )
    .await;
    if !started {
        return Err(ResponseError::Execution(
            "Could not start the giveaway",
            Some("I need permission to view, send messages, embed links, add reactions and read message history in this channel.".to_string()),
        ));
    }

    ctx.reply(
        cmd,
        Response::new()
            .embed(CreateEmbed::new().title("Giveaway started").description(format!(
                "Running for {}",
                pretty_duration::pretty_duration(
                    &std::time::Duration::from_secs(seconds as u64),
                    None
                )
            )))
            .ephemeral(true),
    )
    .await
}
