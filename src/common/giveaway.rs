use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::{
    common::{
        render::{announcement, render, render_ended},
        winners::{eligible, select_winners},
    },
    models::{
        config::UpdaterConfig,
        display::DisplayPayload,
        gateway::{Gateway, GatewayError},
        giveaway::{Giveaway, GiveawayStatus},
        store::GiveawayStore,
    },
};

/// Posts a new giveaway message and stores it.
///
/// Returns `false` without posting anything when the bot cannot send, embed and react in
/// the channel, or when the requested giveaway could never run.
#[allow(clippy::too_many_arguments)]
pub async fn start_giveaway(
    store: &dyn GiveawayStore,
    gateway: &dyn Gateway,
    config: &UpdaterConfig,
    guild_id: u64,
    channel_id: u64,
    now: OffsetDateTime,
    seconds: i64,
    winners: u32,
    prize: Option<&str>,
) -> bool {
    if seconds <= 0 || winners == 0 {
        warn!(
            "Refusing to start a giveaway lasting {}s with {} winners",
            seconds, winners
        );
        return false;
    }
    if !gateway.can_post(guild_id, channel_id) {
        debug!(
            "Missing permissions to start a giveaway in channel {}",
            channel_id
        );
        return false;
    }

    let color = gateway.self_color(guild_id);
    if let Err(err) = store.set_community_color(guild_id, color).await {
        warn!(
            "Could not store accent color for guild {}. Failed with error: {:?}",
            guild_id, err
        );
    }

    let end = now + time::Duration::seconds(seconds);
    let draft = Giveaway::new(0, channel_id, guild_id, end, winners, prize);
    let payload = render(&draft, now, color, config.closing_window);

    let message_id = match gateway.send_message(channel_id, &payload).await {
        Ok(message_id) => message_id,
        Err(err) => {
            warn!("Unable to start giveaway: {}", err);
            return true;
        }
    };
    if let Err(err) = gateway
        .add_reaction(channel_id, message_id, &config.emoji)
        .await
    {
        warn!(
            "Could not react to giveaway {}. Failed with error: {:?}",
            message_id, err
        );
    }

    let giveaway = draft.with_message(message_id);
    match store.create(&giveaway).await {
        Ok(()) => info!(
            "Started giveaway {} in channel {}, running for {}",
            message_id,
            channel_id,
            pretty_duration::pretty_duration(&std::time::Duration::from_secs(seconds as u64), None)
        ),
        Err(err) => error!(
            "Could not store giveaway {}. Failed with error: {:?}",
            message_id, err
        ),
    }
    true
}

/// Flags a live giveaway so the next tick finalizes it, whatever its end time.
pub async fn end_giveaway_now(store: &dyn GiveawayStore, channel_id: u64, message_id: u64) -> bool {
    match store.get(message_id).await {
        Ok(Some(giveaway)) if giveaway.channel_id == channel_id => {}
        Ok(_) => return false,
        Err(err) => {
            error!(
                "Could not get giveaway {} from database. Failed with error: {:?}",
                message_id, err
            );
            return false;
        }
    }

    match store.set_status(message_id, GiveawayStatus::EndNow).await {
        Ok(flagged) => flagged,
        Err(err) => {
            error!(
                "Could not flag giveaway {} to end. Failed with error: {:?}",
                message_id, err
            );
            false
        }
    }
}

/// Removes the giveaway message and record without drawing winners.
pub async fn delete_giveaway(
    store: &dyn GiveawayStore,
    gateway: &dyn Gateway,
    channel_id: u64,
    message_id: u64,
) -> bool {
    if let Err(err) = gateway.delete_message(channel_id, message_id).await {
        debug!(
            "Could not delete giveaway message {}. Failed with error: {:?}",
            message_id, err
        );
    }
    match store.delete(message_id).await {
        Ok(deleted) => deleted,
        Err(err) => {
            error!(
                "Could not delete giveaway {} from database. Failed with error: {:?}",
                message_id, err
            );
            false
        }
    }
}

/// Draws new winners from the reactions on an already ended giveaway.
pub async fn reroll<R: Rng + ?Sized>(
    gateway: &dyn Gateway,
    config: &UpdaterConfig,
    channel_id: u64,
    message_id: u64,
    count: usize,
    rng: &mut R,
) -> Result<Vec<u64>, GatewayError> {
    let reactors = gateway
        .fetch_reaction_users(channel_id, message_id, &config.emoji, config.participant_limit)
        .await?;
    let candidates = eligible(reactors, gateway.self_id());
    Ok(select_winners(&candidates, count, rng))
}

/// Draws winners for a giveaway whose record has already been removed, then edits the
/// message and announces the result. Nothing here is retried.
pub async fn finalize(
    gateway: Arc<dyn Gateway>,
    giveaway: Giveaway,
    emoji: String,
    participant_limit: u8,
    seed: u64,
) -> Vec<u64> {
    let winners = match gateway
        .fetch_reaction_users(
            giveaway.channel_id,
            giveaway.message_id,
            &emoji,
            participant_limit,
        )
        .await
    {
        Ok(reactors) => {
            let candidates = eligible(reactors, gateway.self_id());
            let mut rng = StdRng::seed_from_u64(seed);
            select_winners(&candidates, giveaway.winners as usize, &mut rng)
        }
        Err(err) => {
            warn!(
                "Could not fetch entrants for giveaway {}. Failed with error: {:?}",
                giveaway.message_id, err
            );
            Vec::new()
        }
    };

    let ended = render_ended(&giveaway, &winners);
    let text = DisplayPayload::text(announcement(&giveaway, &winners));
    let (edited, sent) = tokio::join!(
        gateway.edit_message(giveaway.channel_id, giveaway.message_id, &ended),
        gateway.send_message(giveaway.channel_id, &text),
    );
    if let Err(err) = edited {
        warn!(
            "Could not update giveaway message to end giveaway {}. Failed with error: {:?}",
            giveaway.message_id, err
        );
    }
    if let Err(err) = sent {
        warn!(
            "Could not send giveaway winner message for giveaway {}. Failed with error: {:?}",
            giveaway.message_id, err
        );
    }

    info!(
        "Ended giveaway {} with {} winner(s)",
        giveaway.message_id,
        winners.len()
    );
    winners
}

/// Re-renders the countdown of a running giveaway.
///
/// A message or channel that no longer exists removes the record. Permission errors leave
/// it in place for the next matching tick.
pub async fn refresh(
    store: Arc<dyn GiveawayStore>,
    gateway: Arc<dyn Gateway>,
    giveaway: Giveaway,
    now: OffsetDateTime,
    closing_window: time::Duration,
) {
    let accent = match store.community_color(giveaway.guild_id).await {
        Ok(color) => color,
        Err(err) => {
            debug!(
                "Could not get accent color for guild {}. Failed with error: {:?}",
                giveaway.guild_id, err
            );
            None
        }
    };
    let payload = render(&giveaway, now, accent, closing_window);

    let Err(err) = gateway
        .edit_message(giveaway.channel_id, giveaway.message_id, &payload)
        .await
    else {
        return;
    };

    if err.is_permanent() {
        match store.delete(giveaway.message_id).await {
            Ok(_) => info!(
                "Removed giveaway {} since its message is gone ({})",
                giveaway.message_id, err
            ),
            Err(store_err) => error!(
                "Could not delete giveaway {} from database. Failed with error: {:?}",
                giveaway.message_id, store_err
            ),
        }
    } else if err.is_transient() {
        debug!(
            "Skipping refresh of giveaway {} for now: {}",
            giveaway.message_id, err
        );
    } else {
        warn!(
            "Could not refresh giveaway {}. Failed with error: {:?}",
            giveaway.message_id, err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::{
            render::{ENDED, URGENT},
            testing::{FakeGateway, BOT_ID},
        },
        database::memory::MemoryStore,
    };

    fn at(seconds: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(seconds).unwrap()
    }

    fn giveaway(message_id: u64, winners: u32, prize: Option<&str>) -> Giveaway {
        Giveaway::new(message_id, 20, 30, at(1_000), winners, prize)
    }

    fn description(payload: &DisplayPayload) -> &str {
        &payload.embed.as_ref().unwrap().description
    }

    #[tokio::test]
    async fn start_is_refused_without_permissions() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::default().with_postable(false);
        let config = UpdaterConfig::default();

        let started =
            start_giveaway(&store, &gateway, &config, 30, 20, at(0), 60, 1, Some("Game")).await;
        assert!(!started);
        assert!(gateway.sent().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn start_posts_reacts_and_stores() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::default().with_color(Some(0x112233));
        let config = UpdaterConfig::default();

        let started =
            start_giveaway(&store, &gateway, &config, 30, 20, at(0), 3_600, 2, Some("Game")).await;
        assert!(started);

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 20);
        let embed = sent[0].1.embed.as_ref().unwrap();
        assert_eq!(embed.color, 0x112233);
        assert_eq!(embed.footer, "2 Winners | Ends at");
        assert_eq!(embed.author.as_deref(), Some("Game"));

        let reactions = gateway.reactions.lock().unwrap().clone();
        assert_eq!(reactions, vec![(20, 5000, "🎉".to_string())]);

        let stored = store.get(5000).await.unwrap().unwrap();
        assert_eq!(stored, Giveaway::new(5000, 20, 30, at(3_600), 2, Some("Game")));
        assert_eq!(store.community_color(30).await.unwrap(), Some(0x112233));
    }

    #[tokio::test]
    async fn start_rejects_giveaways_that_never_run() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::default();
        let config = UpdaterConfig::default();

        assert!(!start_giveaway(&store, &gateway, &config, 30, 20, at(0), 0, 1, None).await);
        assert!(!start_giveaway(&store, &gateway, &config, 30, 20, at(0), 60, 0, None).await);
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn end_now_flags_only_matching_giveaways() {
        let store = MemoryStore::new();
        store.create(&giveaway(7, 1, None)).await.unwrap();

        assert!(!end_giveaway_now(&store, 21, 7).await);
        assert!(!end_giveaway_now(&store, 20, 8).await);
        assert!(end_giveaway_now(&store, 20, 7).await);

        let flagged = store
            .list_with_status(GiveawayStatus::EndNow)
            .await
            .unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].message_id, 7);
    }

    #[tokio::test]
    async fn delete_removes_message_and_record_once() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::default();
        store.create(&giveaway(7, 1, None)).await.unwrap();

        assert!(delete_giveaway(&store, &gateway, 20, 7).await);
        assert!(!delete_giveaway(&store, &gateway, 20, 7).await);
        assert_eq!(gateway.deleted.lock().unwrap()[0], (20, 7));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn finalize_picks_one_of_three_reactors() {
        let gateway = Arc::new(FakeGateway::default().with_reactors(7, Ok(vec![BOT_ID, 1, 2, 3])));

        let winners = finalize(
            gateway.clone(),
            giveaway(7, 1, Some("Game")),
            "🎉".to_string(),
            100,
            42,
        )
        .await;
        assert_eq!(winners.len(), 1);
        assert!([1, 2, 3].contains(&winners[0]));

        let mention = format!("<@{}>", winners[0]);
        let edits = gateway.edits();
        assert_eq!(edits.len(), 1);
        assert_eq!(description(&edits[0].2), format!("Winner: {mention}"));
        assert_eq!(edits[0].2.embed.as_ref().unwrap().color, ENDED);

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.content.contains(&mention));
        assert!(sent[0].1.content.contains("Game"));
    }

    #[tokio::test]
    async fn finalize_with_only_the_bot_reacting_has_no_winner() {
        let gateway = Arc::new(FakeGateway::default().with_reactors(7, Ok(vec![BOT_ID])));

        let winners = finalize(gateway.clone(), giveaway(7, 2, None), "🎉".to_string(), 100, 1).await;
        assert!(winners.is_empty());
        assert_eq!(description(&gateway.edits()[0].2), "Could not determine a winner!");
        assert_eq!(gateway.sent()[0].1.content, "A winner could not be determined!");
    }

    #[tokio::test]
    async fn finalize_degrades_when_reactions_cannot_be_fetched() {
        let gateway = Arc::new(
            FakeGateway::default().with_reactors(7, Err(GatewayError::MissingAccess)),
        );

        let winners = finalize(gateway.clone(), giveaway(7, 1, None), "🎉".to_string(), 100, 1).await;
        assert!(winners.is_empty());
        assert_eq!(description(&gateway.edits()[0].2), "Could not determine a winner!");
        assert_eq!(gateway.sent()[0].1.content, "A winner could not be determined!");
    }

    #[tokio::test]
    async fn finalize_respects_participant_limit() {
        let reactors = (1..=50).collect::<Vec<u64>>();
        let gateway = Arc::new(FakeGateway::default().with_reactors(7, Ok(reactors)));

        let winners = finalize(gateway, giveaway(7, 20, None), "🎉".to_string(), 10, 3).await;
        assert_eq!(winners.len(), 10);
        assert!(winners.iter().all(|winner| *winner <= 10));
    }

    #[tokio::test]
    async fn refresh_renders_with_the_stored_accent() {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(FakeGateway::default());
        store.set_community_color(30, Some(0x445566)).await.unwrap();
        store.create(&giveaway(7, 1, None)).await.unwrap();

        refresh(
            store.clone(),
            gateway.clone(),
            giveaway(7, 1, None),
            at(0),
            time::Duration::seconds(6),
        )
        .await;
        assert_eq!(gateway.edits()[0].2.embed.as_ref().unwrap().color, 0x445566);

        refresh(
            store.clone(),
            gateway.clone(),
            giveaway(7, 1, None),
            at(998),
            time::Duration::seconds(6),
        )
        .await;
        assert_eq!(gateway.edits()[1].2.embed.as_ref().unwrap().color, URGENT);
    }

    #[tokio::test]
    async fn refresh_drops_giveaways_whose_message_is_gone() {
        for err in [GatewayError::MessageNotFound, GatewayError::ChannelNotFound] {
            let store = Arc::new(MemoryStore::new());
            let gateway = Arc::new(FakeGateway::default().with_edit_error(7, err));
            store.create(&giveaway(7, 1, None)).await.unwrap();

            refresh(store.clone(), gateway, giveaway(7, 1, None), at(0), time::Duration::seconds(6))
                .await;
            assert!(store.is_empty());
        }
    }

    #[tokio::test]
    async fn refresh_keeps_giveaways_on_other_errors() {
        for err in [
            GatewayError::MissingAccess,
            GatewayError::MissingPermissions,
            GatewayError::Other("rate limited".to_string()),
        ] {
            let store = Arc::new(MemoryStore::new());
            let gateway = Arc::new(FakeGateway::default().with_edit_error(7, err));
            store.create(&giveaway(7, 1, None)).await.unwrap();

            refresh(store.clone(), gateway, giveaway(7, 1, None), at(0), time::Duration::seconds(6))
                .await;
            assert_eq!(store.len(), 1);
        }
    }

    #[tokio::test]
    async fn reroll_draws_from_current_reactors() {
        let gateway = FakeGateway::default().with_reactors(7, Ok(vec![BOT_ID, 4, 5]));
        let config = UpdaterConfig::default();

        let winners = reroll(&gateway, &config, 20, 7, 5, &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();
        let mut sorted = winners.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![4, 5]);
    }
}
