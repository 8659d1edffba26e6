use time::OffsetDateTime;

use crate::{
    common::duration::format_countdown,
    models::{
        config::TADA,
        display::{DisplayPayload, EmbedPayload},
        giveaway::Giveaway,
    },
};

pub const BLURPLE: u32 = 0x7289DA;
pub const URGENT: u32 = 0xFF0000;
pub const ENDED: u32 = 0x000001;

pub fn mention(user_id: u64) -> String {
    format!("<@{user_id}>")
}

pub fn is_closing(giveaway: &Giveaway, now: OffsetDateTime, closing_window: time::Duration) -> bool {
    now + closing_window > giveaway.end
}

pub fn seconds_remaining(giveaway: &Giveaway, now: OffsetDateTime) -> i64 {
    (giveaway.end - now).whole_seconds().max(0)
}

fn footer(winners: u32, suffix: &str) -> String {
    if winners == 1 {
        suffix.to_string()
    } else {
        format!("{winners} Winners | {suffix}")
    }
}

/// Open giveaway with its live countdown.
pub fn render(
    giveaway: &Giveaway,
    now: OffsetDateTime,
    accent: Option<u32>,
    closing_window: time::Duration,
) -> DisplayPayload {
    let closing = is_closing(giveaway, now, closing_window);
    let (content, color, title) = if closing {
        (
            format!("{TADA} **G I V E A W A Y** {TADA}"),
            URGENT,
            Some("Last chance to enter!!!".to_string()),
        )
    } else {
        (
            format!("{TADA}   **GIVEAWAY**   {TADA}"),
            accent.unwrap_or(BLURPLE),
            None,
        )
    };

    DisplayPayload {
        content,
        embed: Some(EmbedPayload {
            author: giveaway.prize.clone(),
            title,
            description: format!(
                "React with {TADA} to enter!\nTime remaining: {}",
                format_countdown(seconds_remaining(giveaway, now))
            ),
            color,
            footer: footer(giveaway.winners, "Ends at"),
            timestamp: giveaway.end,
        }),
    }
}

/// Final state of the giveaway message. An empty `winners` slice renders the
/// "could not determine a winner" outcome.
pub fn render_ended(giveaway: &Giveaway, winners: &[u64]) -> DisplayPayload {
    let description = match winners {
        [] => "Could not determine a winner!".to_string(),
        [winner] => format!("Winner: {}", mention(*winner)),
        _ => {
            let mut description = "Winners:".to_string();
            for winner in winners {
                description.push('\n');
                description.push_str(&mention(*winner));
            }
            description
        }
    };

    DisplayPayload {
        content: format!("{TADA} **GIVEAWAY ENDED** {TADA}"),
        embed: Some(EmbedPayload {
            author: giveaway.prize.clone(),
            title: None,
            description,
            color: ENDED,
            footer: footer(giveaway.winners, "Ended at"),
            timestamp: giveaway.end,
        }),
    }
}

/// The plain text message that pings the winners.
pub fn announcement(giveaway: &Giveaway, winners: &[u64]) -> String {
    if winners.is_empty() {
        return "A winner could not be determined!".to_string();
    }
    let mentions = winners
        .iter()
        .map(|winner| mention(*winner))
        .collect::<Vec<_>>()
        .join(", ");
    match &giveaway.prize {
        Some(prize) => format!("Congratulations {mentions}! You won the **{prize}**!"),
        None => format!("Congratulations {mentions}! You won!"),
    }
}

pub fn reroll_announcement(winners: &[u64]) -> String {
    match winners {
        [] => "Could not determine a new winner!".to_string(),
        [winner] => format!("The new winner is {}! Congratulations!", mention(*winner)),
        _ => format!(
            "The new winners are {}! Congratulations!",
            winners
                .iter()
                .map(|winner| mention(*winner))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::duration::Duration;

    fn at(seconds: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(seconds).unwrap()
    }

    fn giveaway(winners: u32, prize: Option<&str>) -> Giveaway {
        Giveaway::new(100, 200, 300, at(10_000), winners, prize)
    }

    fn window() -> time::Duration {
        time::Duration::seconds(6)
    }

    fn embed(payload: &DisplayPayload) -> &EmbedPayload {
        payload.embed.as_ref().unwrap()
    }

    #[test]
    fn far_from_deadline_uses_accent_or_blurple() {
        let giveaway = giveaway(1, Some("Game"));
        let payload = render(&giveaway, at(5_000), Some(0x123456), window());
        assert_eq!(embed(&payload).color, 0x123456);
        assert_eq!(embed(&payload).title, None);
        assert_eq!(payload.content, "🎉   **GIVEAWAY**   🎉");

        let payload = render(&giveaway, at(5_000), None, window());
        assert_eq!(embed(&payload).color, BLURPLE);
    }

    #[test]
    fn closing_window_overrides_accent_with_urgency() {
        let giveaway = giveaway(1, None);
        for now in [9_995, 9_999, 10_000, 10_003] {
            let payload = render(&giveaway, at(now), Some(0x00FF00), window());
            assert_eq!(embed(&payload).color, URGENT);
            assert_eq!(embed(&payload).title.as_deref(), Some("Last chance to enter!!!"));
            assert_eq!(payload.content, "🎉 **G I V E A W A Y** 🎉");
        }

        // exactly six seconds out is not yet closing
        let payload = render(&giveaway, at(9_994), Some(0x00FF00), window());
        assert_eq!(embed(&payload).color, 0x00FF00);
    }

    #[test]
    fn footer_mentions_winner_count_only_when_plural() {
        let payload = render(&giveaway(1, None), at(0), None, window());
        assert_eq!(embed(&payload).footer, "Ends at");

        let payload = render(&giveaway(3, None), at(0), None, window());
        assert_eq!(embed(&payload).footer, "3 Winners | Ends at");
        assert_eq!(embed(&payload).timestamp, at(10_000));
    }

    #[test]
    fn prize_is_the_author_line() {
        let payload = render(&giveaway(1, Some("Nitro")), at(0), None, window());
        assert_eq!(embed(&payload).author.as_deref(), Some("Nitro"));

        let payload = render(&giveaway(1, None), at(0), None, window());
        assert_eq!(embed(&payload).author, None);
    }

    #[test]
    fn countdown_strictly_decreases_until_zero_at_end() {
        let giveaway = giveaway(1, None);
        let mut previous = i64::MAX;
        for now in (9_000..=10_000).step_by(7).chain([10_000]) {
            let description = render(&giveaway, at(now), None, window())
                .embed
                .unwrap()
                .description;
            let countdown = description
                .split("Time remaining: ")
                .nth(1)
                .unwrap()
                .replace('*', "");
            let seconds = Duration::parse(&countdown).unwrap().as_seconds().unwrap();
            assert_eq!(seconds, 10_000 - now);
            assert!(seconds < previous);
            previous = seconds;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn ended_description_branches_on_winner_count() {
        let giveaway = giveaway(2, Some("Game"));

        let payload = render_ended(&giveaway, &[]);
        assert_eq!(embed(&payload).description, "Could not determine a winner!");

        let payload = render_ended(&giveaway, &[11]);
        assert_eq!(embed(&payload).description, "Winner: <@11>");

        let payload = render_ended(&giveaway, &[11, 22]);
        assert_eq!(embed(&payload).description, "Winners:\n<@11>\n<@22>");
        assert_eq!(embed(&payload).color, ENDED);
        assert_eq!(embed(&payload).footer, "2 Winners | Ended at");
        assert_eq!(embed(&payload).timestamp, at(10_000));
        assert_eq!(payload.content, "🎉 **GIVEAWAY ENDED** 🎉");
    }

    #[test]
    fn announcement_joins_winners_and_names_the_prize() {
        let with_prize = giveaway(3, Some("Game"));
        assert_eq!(
            announcement(&with_prize, &[1, 2, 3]),
            "Congratulations <@1>, <@2>, <@3>! You won the **Game**!"
        );
        assert_eq!(
            announcement(&giveaway(1, None), &[1]),
            "Congratulations <@1>! You won!"
        );
        assert_eq!(
            announcement(&with_prize, &[]),
            "A winner could not be determined!"
        );
    }

    #[test]
    fn reroll_announcement_handles_plurals() {
        assert_eq!(
            reroll_announcement(&[4]),
            "The new winner is <@4>! Congratulations!"
        );
        assert_eq!(
            reroll_announcement(&[4, 5]),
            "The new winners are <@4>, <@5>! Congratulations!"
        );
        assert_eq!(reroll_announcement(&[]), "Could not determine a new winner!");
    }
}
