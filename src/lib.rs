// Library crate for the competition data model
// Wrap a data source in an EventGroup and read editions, people, countries,
// scores, awards, ranks and statistics from it

pub mod cache;
pub mod config;
pub mod model;
pub mod shared;
pub mod source;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::GroupConfig;
pub use model::{
    Award, AwardCounts, Country, CountryEvent, Event, EventGroup, EventRankings, EventType,
    Paper, ParticipationType, Person, PersonEvent,
};
pub use shared::{CountryId, DataError, EntityKind, EventId, PersonId, Result};
pub use source::{
    AttrValue, CountryEventAttr, CountryRow, DataSource, EventAttr, EventRow, GroupAttr,
    MemorySnapshot, MemorySource, PersonEventAttr, PersonEventKey, PersonRow,
};
pub use stats::MeanStdDev;
