use std::{
    collections::{
        BTreeSet,
        HashMap,
    },
    time::Instant,
};

use crate::core::{
    unicode::is_ideograph,
    CardRecord,
    FieldPattern,
    GridConfig,
    IgnoreList,
    NoteFields,
    UnitMap,
    UnitProfile,
};

/// Field access for the note behind a card.
pub trait NoteSource {
    fn note_fields(&self, note_id: u64) -> Option<&NoteFields>;
}

impl NoteSource for HashMap<u64, NoteFields> {
    fn note_fields(&self, note_id: u64) -> Option<&NoteFields> {
        self.get(&note_id)
    }
}

/// Folds cards into per-unit profiles.
///
/// Unit keys are extracted once per note and reused for every later card of
/// that note, so a shared field is scanned once while each card still counts.
pub fn aggregate_with<'c, I, E>(cards: I, mut extract: E) -> UnitMap
where
    I: IntoIterator<Item = &'c CardRecord>,
    E: FnMut(&CardRecord) -> BTreeSet<char>,
{
    let mut units = UnitMap::new();
    let mut note_units: HashMap<u64, BTreeSet<char>> = HashMap::new();

    for card in cards {
        let keys = note_units.entry(card.note_id).or_insert_with(|| extract(card));
        for &unit in keys.iter() {
            units.entry(unit).or_insert_with(|| UnitProfile::new(unit)).add_card(card);
        }
    }

    units
}

pub struct Aggregator<'a> {
    fields: &'a [FieldPattern],
    ignore: &'a IgnoreList,
    kanji_only: bool,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a GridConfig, ignore: &'a IgnoreList) -> Self {
        Self { fields: &config.fields, ignore, kanji_only: config.kanji_only }
    }

    pub fn accepts(&self, unit: char) -> bool {
        !self.ignore.contains(unit) && (!self.kanji_only || is_ideograph(unit))
    }

    /// Every accepted character of the first field, in note order, matching each pattern.
    pub fn note_units(&self, fields: &NoteFields) -> BTreeSet<char> {
        let mut units = BTreeSet::new();
        for pattern in self.fields {
            if let Some((_, text)) = fields.iter().find(|(name, _)| pattern.matches(name)) {
                units.extend(text.chars().filter(|&c| self.accepts(c)));
            }
        }
        units
    }

    pub fn aggregate<'c, I, N>(&self, cards: I, notes: &N) -> UnitMap
    where
        I: IntoIterator<Item = &'c CardRecord>,
        N: NoteSource + ?Sized,
    {
        let start = Instant::now();
        let mut missing_notes = 0usize;

        let units = aggregate_with(cards, |card| match notes.note_fields(card.note_id) {
            Some(fields) => self.note_units(fields),
            None => {
                missing_notes += 1;
                BTreeSet::new()
            }
        });

        if missing_notes > 0 {
            log::warn!("{} note(s) referenced by cards were not available", missing_notes);
        }
        log::debug!(
            "Aggregated {} units ({} reviewed) in {:.2}s",
            units.len(),
            units.values().filter(|unit| unit.is_reviewed()).count(),
            start.elapsed().as_secs_f32()
        );
        units
    }
}
