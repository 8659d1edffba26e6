use std::sync::{atomic::AtomicBool, Arc};

use serenity::{
    all::{CommandInteraction, Message},
    builder::CreateCommand,
    prelude::Context as IncomingContext,
};

use crate::common::gateway::SerenityGateway;

use super::{
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
};

#[async_trait::async_trait]
pub trait CommandContextReply {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError>;
    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult;
    async fn error_message(&self, cmd: &CommandInteraction, error: ResponseError) -> ResponseResult;
}

pub struct CommandContext {
    pub ctx: IncomingContext,
    pub has_responsed: AtomicBool,
    pub guild_id: u64,
    pub gateway: Arc<SerenityGateway>,
}

pub struct FailedCommandContext {
    pub ctx: IncomingContext,
}

#[async_trait::async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;
    fn register(&self) -> CreateCommand;
    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        command: &CommandInteraction,
    ) -> ResponseResult;
}
