use std::sync::atomic::Ordering;

use serenity::{
    all::{CommandInteraction, Message},
    builder::{
        CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
        EditInteractionResponse,
    },
};
use tracing::{debug, error};

use crate::models::{
    command::{CommandContext, CommandContextReply, FailedCommandContext},
    response::{Response, ResponseError, ResponseResult},
};

fn create_message(response: Response) -> CreateInteractionResponseMessage {
    let mut reply = CreateInteractionResponseMessage::new();
    if let Some(content) = response.content {
        reply = reply.content(content);
    }
    if let Some(embeds) = response.embeds {
        reply = reply.embeds(embeds);
    }
    if let Some(allowed_mentions) = response.allowed_mentions {
        reply = reply.allowed_mentions(allowed_mentions);
    }
    if response.ephemeral {
        reply = reply.ephemeral(true);
    }
    reply
}

fn error_response(error: ResponseError) -> Response {
    let embed = match error {
        ResponseError::Execution(title, description) => {
            let embed = CreateEmbed::new().title(title).color(0xFF0000);
            match description {
                Some(description) => embed.description(description),
                None => embed,
            }
        }
        ResponseError::Serenity(err) => CreateEmbed::new()
            .title("Something went wrong")
            .description(format!("Discord returned an error: {err}"))
            .color(0xFF0000),
    };
    Response::new().embed(embed).ephemeral(true)
}

#[async_trait::async_trait]
impl CommandContextReply for CommandContext {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError> {
        let start = std::time::Instant::now();
        let message = if self.has_responsed.load(Ordering::Relaxed) {
            let mut edit = EditInteractionResponse::new();
            if let Some(content) = response.content {
                edit = edit.content(content);
            }
            if let Some(embeds) = response.embeds {
                edit = edit.embeds(embeds);
            }
            if let Some(allowed_mentions) = response.allowed_mentions {
                edit = edit.allowed_mentions(allowed_mentions);
            }

            match cmd.edit_response(&self.ctx.http, edit).await {
                Ok(message) => message,
                Err(err) => {
                    error!("Attempted to edit a response to a command, failed with error: {err}");
                    return Err(ResponseError::Serenity(err));
                }
            }
        } else {
            match cmd
                .create_response(
                    &self.ctx.http,
                    CreateInteractionResponse::Message(create_message(response)),
                )
                .await
            {
                Ok(()) => {
                    self.has_responsed.store(true, Ordering::Relaxed);
                    match cmd.get_response(&self.ctx.http).await {
                        Ok(message) => message,
                        Err(err) => {
                            error!(
                                "A message was sent, but failed to fetch, failed with error: {err}"
                            );
                            return Err(ResponseError::Serenity(err));
                        }
                    }
                }
                Err(err) => {
                    error!("Attempted to create a response to a command, failed with error: {err}");
                    return Err(ResponseError::Serenity(err));
                }
            }
        };
        debug!("Took {:?} to reply to a command", start.elapsed());
        Ok(message)
    }

    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult {
        self.reply_get_message(cmd, response).await?;
        Ok(())
    }

    async fn error_message(&self, cmd: &CommandInteraction, error: ResponseError) -> ResponseResult {
        self.reply(cmd, error_response(error)).await
    }
}

#[async_trait::async_trait]
impl CommandContextReply for FailedCommandContext {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError> {
        let start = std::time::Instant::now();
        let message = match cmd
            .create_response(
                &self.ctx.http,
                CreateInteractionResponse::Message(create_message(response)),
            )
            .await
        {
            Ok(()) => match cmd.get_response(&self.ctx.http).await {
                Ok(message) => message,
                Err(err) => {
                    error!("A message was sent, but failed to fetch, failed with error: {err}");
                    return Err(ResponseError::Serenity(err));
                }
            },
            Err(err) => {
                error!("Attempted to create a response to a command, failed with error: {err}");
                return Err(ResponseError::Serenity(err));
            }
        };

        debug!("Took {:?} to reply to a command", start.elapsed());
        Ok(message)
    }

    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult {
        self.reply_get_message(cmd, response).await?;
        Ok(())
    }

    async fn error_message(&self, cmd: &CommandInteraction, error: ResponseError) -> ResponseResult {
        self.reply(cmd, error_response(error)).await
    }
}
