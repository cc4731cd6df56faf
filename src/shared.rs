use std::fmt;

use thiserror::Error;

pub type EventId = u32;
pub type PersonId = u32;
pub type CountryId = u32;

pub type Result<T, E = DataError> = std::result::Result<T, E>;

/// The kinds of entity the data-source port answers questions about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Group,
    Event,
    Person,
    Country,
    PersonEvent,
    CountryEvent,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EntityKind::Group => "event group",
                EntityKind::Event => "event",
                EntityKind::Person => "person",
                EntityKind::Country => "country",
                EntityKind::PersonEvent => "person at event",
                EntityKind::CountryEvent => "country at event",
            }
        )
    }
}

/// Every way reading the model can fail.
///
/// All of these mean the data (or the calling code) is wrong; none is
/// retried and none is cached, so reading the same attribute again fails
/// the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: u32 },

    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: EntityKind, id: u32 },

    #[error("unsupported {kind} attribute: {name}")]
    UnsupportedAttribute { kind: EntityKind, name: String },

    #[error("{kind} attribute {name} is not {expected}")]
    AttributeType {
        kind: EntityKind,
        name: String,
        expected: &'static str,
    },

    #[error(
        "total score not as expected for person {person_id} at event {event_id}: \
         declared {declared}, computed {computed}"
    )]
    TotalScoreMismatch {
        person_id: PersonId,
        event_id: EventId,
        declared: i64,
        computed: i64,
    },

    #[error(
        "award not as expected for person {person_id} at event {event_id}: \
         declared {declared:?}, computed {computed:?}"
    )]
    AwardMismatch {
        person_id: PersonId,
        event_id: EventId,
        declared: Option<String>,
        computed: Option<String>,
    },

    #[error("{matches} countries called {name:?} at event {event_id}")]
    CountryName {
        event_id: EventId,
        name: String,
        matches: usize,
    },

    #[error("person {person_id} listed more than once for country {country_id} at event {event_id}")]
    DuplicateParticipation {
        person_id: PersonId,
        event_id: EventId,
        country_id: CountryId,
    },

    #[error("person {person_id} is not a contestant at event {event_id}")]
    NotContestant {
        person_id: PersonId,
        event_id: EventId,
    },

    #[error("score {value} outside the possible range 0..={max}")]
    ScoreOutOfRange { value: i64, max: i64 },

    #[error("invalid date: {value}")]
    InvalidDate { value: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl DataError {
    pub fn unsupported(kind: EntityKind, name: impl Into<String>) -> Self {
        DataError::UnsupportedAttribute {
            kind,
            name: name.into(),
        }
    }
}
