use serenity::http::HttpError;

use super::display::DisplayPayload;

/// Failure of a single Discord REST call, classified by the JSON error code Discord returns.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("unknown message")]
    MessageNotFound,
    #[error("unknown channel")]
    ChannelNotFound,
    #[error("missing access")]
    MissingAccess,
    #[error("missing permissions")]
    MissingPermissions,
    #[error("{0}")]
    Other(String),
}

impl GatewayError {
    pub fn from_code(code: i64, message: &str) -> Self {
        match code {
            10008 => GatewayError::MessageNotFound,
            10003 => GatewayError::ChannelNotFound,
            50001 => GatewayError::MissingAccess,
            50013 => GatewayError::MissingPermissions,
            _ => GatewayError::Other(format!("{code}: {message}")),
        }
    }

    /// The target is gone and will never accept another edit.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            GatewayError::MessageNotFound | GatewayError::ChannelNotFound
        )
    }

    /// The bot may get its permissions back later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingAccess | GatewayError::MissingPermissions
        )
    }
}

impl From<serenity::Error> for GatewayError {
    fn from(err: serenity::Error) -> Self {
        match err {
            serenity::Error::Http(http) => classify_http(&http),
            other => GatewayError::Other(other.to_string()),
        }
    }
}

fn classify_http(err: &HttpError) -> GatewayError {
    match err {
        HttpError::UnsuccessfulRequest(response) => {
            GatewayError::from_code(response.error.code as i64, &response.error.message)
        }
        other => GatewayError::Other(other.to_string()),
    }
}

/// Everything the giveaway engine needs from Discord.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    fn self_id(&self) -> u64;

    /// Whether the bot can post, embed and react in the channel.
    fn can_post(&self, guild_id: u64, channel_id: u64) -> bool;

    /// Color of the bot's highest colored role in the guild.
    fn self_color(&self, guild_id: u64) -> Option<u32>;

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        payload: &DisplayPayload,
    ) -> Result<(), GatewayError>;

    /// Returns the id of the created message.
    async fn send_message(
        &self,
        channel_id: u64,
        payload: &DisplayPayload,
    ) -> Result<u64, GatewayError>;

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), GatewayError>;

    async fn fetch_reaction_users(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
        limit: u8,
    ) -> Result<Vec<u64>, GatewayError>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError>;
}
