//! Kanji proficiency grids built from spaced-repetition review history.
//!
//! Cards are folded into per-character [`UnitProfile`]s, scored against an
//! interval considered strong, ordered or grouped, and laid out as a
//! [`grid::Report`] that renders to HTML or exports as JSON.

pub mod anki;
pub mod core;
pub mod grid;
pub mod groups;
pub mod persistence;

pub use crate::core::{
    CardRecord,
    CardType,
    CollectionDump,
    GridConfig,
    IgnoreList,
    KanjiGridError,
    NoteFields,
    OrderingMode,
    SortOrder,
    UnitMap,
    UnitProfile,
};
pub use grid::{
    generate,
    GridOutput,
};
pub use groups::GroupSet;
