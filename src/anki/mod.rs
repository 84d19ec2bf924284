use std::{
    collections::HashMap,
    time::{
        Duration,
        Instant,
    },
};

use tokio::time::sleep;

use crate::core::{
    CardRecord,
    CardType,
    CollectionDump,
    KanjiGridError,
    NoteFields,
};

pub mod api;

pub use api::AnkiConnect;
use api::{
    deck_query,
    Card,
};

const CARDS_PER_REQUEST: usize = 500;

/// Negative AnkiConnect intervals are seconds, positive ones days.
pub fn interval_days(interval: i64) -> f64 {
    if interval >= 0 {
        interval as f64
    } else {
        interval.unsigned_abs() as f64 / 86400.0
    }
}

impl TryFrom<&Card> for CardRecord {
    type Error = KanjiGridError;

    fn try_from(card: &Card) -> Result<Self, Self::Error> {
        let card_type = CardType::try_from(card.card_type).map_err(KanjiGridError::AnkiConnect)?;
        Ok(CardRecord {
            card_id: card.card_id,
            note_id: card.note,
            // Card ids are creation timestamps, which gives "order found" its meaning
            sequence: card.card_id,
            card_type,
            interval: interval_days(card.interval),
            due: card.due,
            original_due: card.odue,
            modified: card.modified,
        })
    }
}

fn note_fields(card: &Card) -> NoteFields {
    let mut fields: Vec<_> = card.fields.iter().collect();
    fields.sort_by_key(|(_, field)| field.order);
    fields.into_iter().map(|(name, field)| (name.clone(), field.value.clone())).collect()
}

/// Fetches every card of `deck` (`*` for all decks) along with its note's fields.
pub async fn collect_records(
    anki: &AnkiConnect,
    deck: &str,
) -> Result<CollectionDump, KanjiGridError> {
    let start = Instant::now();
    let mut card_ids = anki.find_cards(&deck_query(deck)).await?;
    card_ids.sort_unstable();
    log::info!(
        "Found {} cards in deck {} ({:.1}s)",
        card_ids.len(),
        deck,
        start.elapsed().as_secs_f32()
    );

    let mut cards = Vec::with_capacity(card_ids.len());
    let mut notes: HashMap<u64, NoteFields> = HashMap::new();
    let mut skipped = 0usize;

    for chunk in card_ids.chunks(CARDS_PER_REQUEST) {
        for card in anki.cards_info(chunk).await? {
            match CardRecord::try_from(&card) {
                Ok(record) => {
                    notes.entry(card.note).or_insert_with(|| note_fields(&card));
                    cards.push(record);
                }
                Err(e) => {
                    log::warn!("Skipping card {}: {}", card.card_id, e);
                    skipped += 1;
                }
            }
        }
        log::debug!("  cardsInfo: {}/{} cards", cards.len() + skipped, card_ids.len());
    }

    log::info!(
        "Loaded {} cards from {} notes ({:.1}s total)",
        cards.len(),
        notes.len(),
        start.elapsed().as_secs_f32()
    );
    Ok(CollectionDump { cards, notes })
}

pub async fn wait_awake(anki: &AnkiConnect, wait_time: u64, max_attempts: u32) -> bool {
    for attempt in 1..=max_attempts {
        match anki.version().await {
            Ok(version) => {
                log::info!("AnkiConnect is online. Version: {}", version);
                return true;
            }
            Err(err) => {
                log::warn!(
                    "AnkiConnect attempt {} of {} failed. Retrying in {} seconds... Error: {}",
                    attempt,
                    max_attempts,
                    wait_time,
                    err
                );
                if attempt < max_attempts {
                    sleep(Duration::from_secs(wait_time)).await;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anki::api::Field;

    fn card(card_type: u8, interval: i64) -> Card {
        Card {
            card_id: 42,
            note: 7,
            deck_name: "Default".to_string(),
            fields: HashMap::from([(
                "Kanji".to_string(),
                Field { value: "山".to_string(), order: 0 },
            )]),
            interval,
            card_type,
            queue: 2,
            due: 900,
            odue: 0,
            modified: 1234,
        }
    }

    #[test]
    fn converts_intervals_to_days() {
        assert_eq!(interval_days(12), 12.0);
        assert_eq!(interval_days(-43200), 0.5);
        assert_eq!(interval_days(0), 0.0);
    }

    #[test]
    fn card_becomes_record_sequenced_by_id() {
        let record = CardRecord::try_from(&card(2, 30)).unwrap();
        assert_eq!(record.sequence, 42);
        assert_eq!(record.note_id, 7);
        assert_eq!(record.card_type, CardType::Review);
        assert_eq!(record.interval, 30.0);
        assert_eq!(note_fields(&card(2, 30)), vec![("Kanji".to_string(), "山".to_string())]);
    }

    #[test]
    fn note_fields_follow_field_order() {
        let mut card = card(2, 30);
        card.fields = HashMap::from([
            ("Reading".to_string(), Field { value: "やま".to_string(), order: 2 }),
            ("kanji".to_string(), Field { value: "岳".to_string(), order: 1 }),
            ("Kanji".to_string(), Field { value: "山".to_string(), order: 0 }),
        ]);
        let names: Vec<String> = note_fields(&card).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Kanji", "kanji", "Reading"]);
    }

    #[test]
    fn unknown_card_type_is_rejected() {
        assert!(matches!(CardRecord::try_from(&card(7, 1)), Err(KanjiGridError::AnkiConnect(_))));
    }
}
