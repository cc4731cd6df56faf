//! The entity graph built over a [`DataSource`](crate::source::DataSource).
//!
//! [`EventGroup`] owns everything. Entities are stored once, as records
//! behind `Rc`, in the group's and each edition's identity maps; the
//! public types ([`Event`], [`Person`], [`PersonEvent`], [`Country`],
//! [`CountryEvent`]) are cheap views pairing a record with the group it
//! belongs to. Records refer to each other by id only.

/// Generates plain getters that read one port attribute each.
macro_rules! port_getters {
    ($attr:ident { $($(#[$doc:meta])* $name:ident: $ty:ty = $variant:ident,)* }) => {
        $(
            $(#[$doc])*
            pub fn $name(&self) -> Result<$ty> {
                self.attr($attr::$variant)
            }
        )*
    };
}

mod award;
mod country;
mod country_event;
mod event;
mod event_stats;
mod group;
mod paper;
mod person;
mod person_event;
mod role;

pub use award::{Award, AwardCounts, MedalBoundaries};
pub use country::Country;
pub use country_event::CountryEvent;
pub use event::Event;
pub use event_stats::EventRankings;
pub use group::EventGroup;
pub use paper::Paper;
pub use person::Person;
pub use person_event::{PersonEvent, PersonEventSortKey};
pub use role::{contestant_suffix, is_contestant_role, EventType, ParticipationType};

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::shared::{DataError, EntityKind, Result};

/// Case-insensitive collation key for sorting by name.
pub fn collation_key(text: &str) -> String {
    text.to_lowercase()
}

fn parse_date(raw: Option<String>) -> Result<Option<NaiveDate>> {
    raw.map(|value| {
        NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| DataError::InvalidDate { value })
    })
    .transpose()
}

fn parse_text<T: FromStr>(
    raw: Option<String>,
    kind: EntityKind,
    name: &str,
    expected: &'static str,
) -> Result<Option<T>> {
    raw.map(|value| {
        value.parse().map_err(|_| DataError::AttributeType {
            kind,
            name: name.to_string(),
            expected,
        })
    })
    .transpose()
}

/// Completed years from `born` to `on`, or `None` if `on` is earlier.
fn whole_years_between(born: NaiveDate, on: NaiveDate) -> Option<u32> {
    let mut years = on.year() - born.year();
    if (on.month(), on.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
