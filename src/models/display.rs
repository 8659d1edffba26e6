use serenity::{
    builder::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage, EditMessage},
    model::Timestamp,
};
use time::OffsetDateTime;

/// A rendered giveaway message: the text line above the embed and the embed itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayPayload {
    pub content: String,
    pub embed: Option<EmbedPayload>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedPayload {
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: String,
    pub color: u32,
    pub footer: String,
    pub timestamp: OffsetDateTime,
}

impl DisplayPayload {
    pub fn text(content: String) -> Self {
        DisplayPayload {
            content,
            embed: None,
        }
    }

    pub fn to_edit(&self) -> EditMessage {
        let mut edit = EditMessage::new().content(self.content.clone());
        if let Some(embed) = &self.embed {
            edit = edit.embed(CreateEmbed::from(embed));
        }
        edit
    }

    pub fn to_message(&self) -> CreateMessage {
        let mut message = CreateMessage::new().content(self.content.clone());
        if let Some(embed) = &self.embed {
            message = message.embed(CreateEmbed::from(embed));
        }
        message
    }
}

impl From<&EmbedPayload> for CreateEmbed {
    fn from(value: &EmbedPayload) -> Self {
        let mut embed = CreateEmbed::new()
            .description(value.description.clone())
            .color(value.color)
            .footer(CreateEmbedFooter::new(value.footer.clone()));
        if let Some(author) = &value.author {
            embed = embed.author(CreateEmbedAuthor::new(author.clone()));
        }
        if let Some(title) = &value.title {
            embed = embed.title(title.clone());
        }
        if let Ok(timestamp) = Timestamp::from_unix_timestamp(value.timestamp.unix_timestamp()) {
            embed = embed.timestamp(timestamp);
        }
        embed
    }
}
