//! The data-source port.
//!
//! Every backing store (exported files, a live registration database, an
//! in-memory fixture) implements [`DataSource`]; the model in
//! [`crate::model`] depends on nothing else. Attributes are addressed by
//! closed, per-kind name sets ([`GroupAttr`], [`EventAttr`],
//! [`PersonEventAttr`], [`CountryEventAttr`]).

mod attrs;
pub mod memory;
mod value;

pub use attrs::{Attribute, CountryEventAttr, EventAttr, GroupAttr, PersonEventAttr};
pub use memory::{CountryRow, EventRow, MemorySnapshot, MemorySource, PersonRow};
pub use value::{AttrValue, FromAttr};

use serde::{Deserialize, Serialize};

use crate::shared::{CountryId, EventId, PersonId, Result};

/// Identifies one participation record: a person, at an edition, with a
/// country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonEventKey {
    pub person_id: PersonId,
    pub event_id: EventId,
    pub country_id: CountryId,
}

impl PersonEventKey {
    pub fn new(person_id: PersonId, event_id: EventId, country_id: CountryId) -> Self {
        Self {
            person_id,
            event_id,
            country_id,
        }
    }
}

/// Contract every backing store implements.
///
/// Getters return [`AttrValue::Absent`] for unset optional values and
/// [`crate::shared::DataError::UnsupportedAttribute`] for names the store
/// does not carry at all. The `*_have_attr` predicates default to "no":
/// for inheritable edition settings that means "use the group default",
/// for declared totals and awards "nothing to cross-check", and for
/// country rosters "derive by filtering the edition's people".
pub trait DataSource {
    fn group_attr(&self, attr: GroupAttr) -> Result<AttrValue>;

    fn event_exists(&self, id: EventId) -> bool;
    fn person_exists(&self, id: PersonId) -> bool;
    fn country_exists(&self, id: CountryId) -> bool;
    fn person_event_exists(&self, person_id: PersonId, event_id: EventId) -> bool;
    fn country_event_exists(&self, country_id: CountryId, event_id: EventId) -> bool;

    /// The countries a person takes part in an edition with, one entry per
    /// stored record (so a repeated id means a duplicated record).
    fn person_event_country_ids(
        &self,
        person_id: PersonId,
        event_id: EventId,
    ) -> Result<Vec<CountryId>>;

    fn event_attr(&self, id: EventId, attr: EventAttr) -> Result<AttrValue>;

    fn event_have_attr(&self, _id: EventId, _attr: EventAttr) -> bool {
        false
    }

    fn person_event_attr(&self, key: PersonEventKey, attr: PersonEventAttr) -> Result<AttrValue>;

    fn person_event_have_attr(&self, _key: PersonEventKey, _attr: PersonEventAttr) -> bool {
        false
    }

    fn country_event_attr(
        &self,
        country_id: CountryId,
        event_id: EventId,
        attr: CountryEventAttr,
    ) -> Result<AttrValue>;

    fn country_event_have_attr(
        &self,
        _country_id: CountryId,
        _event_id: EventId,
        _attr: CountryEventAttr,
    ) -> bool {
        false
    }
}
