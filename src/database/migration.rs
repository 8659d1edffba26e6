use std::path::Path;

use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::models::{
    giveaway::Giveaway,
    store::{GiveawayStore, StoreError},
};

/// Parses one line of the legacy flat file:
/// `guild  channel  message  end_epoch  winners  prize`, separated by two spaces.
/// A prize of `none` means no prize.
pub fn parse_line(line: &str) -> Option<Giveaway> {
    let parts = line.splitn(6, "  ").collect::<Vec<_>>();
    let [guild_id, channel_id, message_id, end, winners, prize] = parts.as_slice() else {
        return None;
    };

    let end = OffsetDateTime::from_unix_timestamp(end.trim().parse().ok()?).ok()?;
    let winners = winners.trim().parse::<u32>().ok().filter(|winners| *winners >= 1)?;
    let prize = prize.trim_end_matches(['\r', '\n']);

    Some(Giveaway::new(
        message_id.trim().parse().ok()?,
        channel_id.trim().parse().ok()?,
        guild_id.trim().parse().ok()?,
        end,
        winners,
        (prize != "none").then_some(prize),
    ))
}

/// Imports every parseable line into the store, returning how many were created.
pub async fn import_lines(store: &dyn GiveawayStore, contents: &str) -> usize {
    let mut count = 0;
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(giveaway) = parse_line(line) else {
            warn!("Skipping malformed giveaway migration line {}", number + 1);
            continue;
        };
        match store.create(&giveaway).await {
            Ok(()) => count += 1,
            Err(StoreError::Duplicate(id)) => warn!("Giveaway {} was already migrated", id),
            Err(err) => error!(
                "Could not migrate giveaway {}. Failed with error: {:?}",
                giveaway.message_id, err
            ),
        }
    }
    count
}

/// Decodes ISO-8859-1, where every byte is the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

pub async fn import_file(store: &dyn GiveawayStore, path: &Path) -> usize {
    // the legacy file was written as ISO-8859-1
    let contents = match tokio::fs::read(path).await {
        Ok(bytes) => decode_latin1(&bytes),
        Err(err) => {
            error!(
                "Could not read giveaway migration file {}. Failed with error: {:?}",
                path.display(),
                err
            );
            return 0;
        }
    };
    let count = import_lines(store, &contents).await;
    info!("Migrated {} giveaways from {}", count, path.display());
    count
}
