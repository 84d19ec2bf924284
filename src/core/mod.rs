pub mod config;
pub mod errors;
pub mod ignore_list;
pub mod models;
pub mod unicode;

pub use config::{
    FieldPattern,
    GridConfig,
    OrderingMode,
    SortOrder,
};
pub use errors::KanjiGridError;
pub use ignore_list::IgnoreList;
pub use models::{
    CardRecord,
    CardType,
    CollectionDump,
    NoteFields,
    UnitMap,
    UnitProfile,
};
