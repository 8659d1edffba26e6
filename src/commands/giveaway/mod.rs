use serenity::{
    all::{CommandInteraction, CommandOptionType, Permissions},
    builder::{CreateCommand, CreateCommandOption},
};

use crate::{
    common::duration::Duration,
    models::{
        command::{Command, CommandContext},
        handler::Handler,
        response::{ResponseError, ResponseResult},
    },
};

pub mod delete;
pub mod end;
pub mod reroll;
pub mod start;

pub const MIN_DURATION_SECS: i64 = 10;
pub const MAX_DURATION_SECS: i64 = 60 * 60 * 24 * 7 * 4;
pub const MAX_WINNERS: i64 = 20;

/// Checks the user-supplied duration and winner count, returning seconds and winners.
pub fn validate_request(duration: &str, winners: i64) -> Result<(i64, u32), ResponseError> {
    let Some(duration) = Duration::parse(duration) else {
        return Err(ResponseError::Execution(
            "Invalid duration",
            Some("Use a duration like `30m`, `1h30m` or `2d`.".to_string()),
        ));
    };
    let Some(seconds) = duration.as_seconds().filter(|seconds| *seconds <= MAX_DURATION_SECS) else {
        return Err(ResponseError::Execution(
            "Duration too long",
            Some("Giveaways cannot last longer than 4 weeks.".to_string()),
        ));
    };
    if seconds < MIN_DURATION_SECS {
        return Err(ResponseError::Execution(
            "Duration too short",
            Some(format!("Giveaways must last at least {MIN_DURATION_SECS} seconds.")),
        ));
    }
    if !(1..=MAX_WINNERS).contains(&winners) {
        return Err(ResponseError::Execution(
            "Invalid number of winners",
            Some(format!("A giveaway can have between 1 and {MAX_WINNERS} winners.")),
        ));
    }
    Ok((seconds, winners as u32))
}

fn id_option(description: &'static str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, "id", description).required(true)
}

fn winners_option(description: &'static str, required: bool) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Integer, "winners", description)
        .min_int_value(1)
        .max_int_value(MAX_WINNERS as u64)
        .required(required)
}

pub struct GiveawayCommand;

#[async_trait::async_trait]
impl Command for GiveawayCommand {
    fn name(&self) -> &'static str {
        "giveaway"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("giveaway")
            .description("Giveaway commands")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "start",
                    "Start a new giveaway in this channel",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "duration",
                        "How long the giveaway runs, e.g. 1h30m",
                    )
                    .required(true),
                )
                .add_sub_option(winners_option("The number of winners", true))
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "prize",
                        "The prize for the giveaway",
                    )
                    .required(false),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "end",
                    "End a giveaway early",
                )
                .add_sub_option(id_option("The message ID of the giveaway to end")),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "reroll",
                    "Pick new winners for a finished giveaway",
                )
                .add_sub_option(id_option("The message ID of the giveaway to reroll"))
                .add_sub_option(winners_option("The number of new winners (default: 1)", false)),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "delete",
                    "Delete a running giveaway without picking winners",
                )
                .add_sub_option(id_option("The message ID of the giveaway to delete")),
            )
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        for option in &cmd.data.options {
            match option.name.as_str() {
                "start" => return start::start(handler, ctx, cmd).await,
                "end" => return end::end(handler, ctx, cmd).await,
                "reroll" => return reroll::reroll(handler, ctx, cmd).await,
                "delete" => return delete::delete(handler, ctx, cmd).await,
                _ => continue,
            }
        }

        Err(ResponseError::Execution(
            "Invalid command",
            Some("You must specify a subcommand to use this command!".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_normal_request() {
        assert!(matches!(validate_request("1h30m", 3), Ok((5400, 3))));
        assert!(matches!(validate_request("10", 1), Ok((10, 1))));
        assert!(matches!(validate_request("4w", 20), Ok((2_419_200, 20))));
    }

    #[test]
    fn rejects_out_of_range_durations() {
        assert!(matches!(
            validate_request("9s", 1),
            Err(ResponseError::Execution("Duration too short", _))
        ));
        assert!(matches!(
            validate_request("4w1s", 1),
            Err(ResponseError::Execution("Duration too long", _))
        ));
        assert!(matches!(
            validate_request("soon", 1),
            Err(ResponseError::Execution("Invalid duration", _))
        ));
    }

    #[test]
    fn oversized_durations_are_too_long() {
        assert!(matches!(
            validate_request("99999999999999w", 1),
            Err(ResponseError::Execution("Duration too long", _))
        ));
        assert!(matches!(
            validate_request("9223372036854775807s9223372036854775807s", 1),
            Err(ResponseError::Execution("Duration too long", _))
        ));
    }

    #[test]
    fn rejects_out_of_range_winners() {
        assert!(validate_request("1h", 0).is_err());
        assert!(validate_request("1h", 21).is_err());
    }
}
