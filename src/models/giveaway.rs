use time::OffsetDateTime;

/// Longest prize text kept on a giveaway, in characters.
pub const PRIZE_MAX: usize = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum GiveawayStatus {
    Run,
    EndNow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Giveaway {
    pub message_id: u64,
    pub channel_id: u64,
    pub guild_id: u64,
    pub end: OffsetDateTime,
    pub winners: u32,
    pub prize: Option<String>,
}

impl Giveaway {
    pub fn new(
        message_id: u64,
        channel_id: u64,
        guild_id: u64,
        end: OffsetDateTime,
        winners: u32,
        prize: Option<&str>,
    ) -> Self {
        Giveaway {
            message_id,
            channel_id,
            guild_id,
            end,
            winners: winners.max(1),
            prize: normalize_prize(prize),
        }
    }

    /// Same giveaway, bound to the message that announces it.
    pub fn with_message(self, message_id: u64) -> Self {
        Giveaway { message_id, ..self }
    }
}

pub fn normalize_prize(prize: Option<&str>) -> Option<String> {
    let prize = prize?.trim();
    if prize.is_empty() {
        return None;
    }
    Some(prize.chars().take(PRIZE_MAX).collect())
}

#[derive(sqlx::FromRow)]
pub struct DatabaseGiveaway {
    pub message_id: i64,
    pub channel_id: i64,
    pub guild_id: i64,
    pub end_time: OffsetDateTime,
    pub winners: i32,
    pub prize: Option<String>,
}

impl From<DatabaseGiveaway> for Giveaway {
    fn from(value: DatabaseGiveaway) -> Self {
        Giveaway {
            message_id: value.message_id as u64,
            channel_id: value.channel_id as u64,
            guild_id: value.guild_id as u64,
            end: value.end_time,
            winners: u32::try_from(value.winners).unwrap_or(1).max(1),
            prize: normalize_prize(value.prize.as_deref()),
        }
    }
}
