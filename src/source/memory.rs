use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    AttrValue, CountryEventAttr, DataSource, EventAttr, GroupAttr, PersonEventAttr,
    PersonEventKey,
};
use crate::config::GroupConfig;
use crate::shared::{CountryId, DataError, EntityKind, EventId, PersonId, Result};

/// One edition's stored attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub event_id: EventId,
    #[serde(default)]
    pub attrs: BTreeMap<EventAttr, AttrValue>,
}

impl EventRow {
    pub fn new(event_id: EventId) -> Self {
        Self {
            event_id,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with(mut self, attr: EventAttr, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(attr, value.into());
        self
    }

    /// Year, problem count and per-problem maxima in one go.
    pub fn with_problems(self, year: &str, marks_per_problem: Vec<i64>) -> Self {
        let num_problems = marks_per_problem.len() as i64;
        self.with(EventAttr::Year, year)
            .with(EventAttr::NumProblems, num_problems)
            .with(EventAttr::MarksPerProblem, marks_per_problem)
    }

    pub fn with_boundaries(self, gold: i64, silver: i64, bronze: i64) -> Self {
        self.with(EventAttr::GoldBoundary, gold)
            .with(EventAttr::SilverBoundary, silver)
            .with(EventAttr::BronzeBoundary, bronze)
    }
}

/// One country's stored attributes at one edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRow {
    pub event_id: EventId,
    pub country_id: CountryId,
    #[serde(default)]
    pub attrs: BTreeMap<CountryEventAttr, AttrValue>,
}

impl CountryRow {
    pub fn new(event_id: EventId, country_id: CountryId, code: &str, name: &str) -> Self {
        Self {
            event_id,
            country_id,
            attrs: BTreeMap::new(),
        }
        .with(CountryEventAttr::Code, code)
        .with(CountryEventAttr::Name, name)
    }

    pub fn with(mut self, attr: CountryEventAttr, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(attr, value.into());
        self
    }
}

/// One participation record: a person at an edition with a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRow {
    pub event_id: EventId,
    pub person_id: PersonId,
    pub country_id: CountryId,
    #[serde(default)]
    pub attrs: BTreeMap<PersonEventAttr, AttrValue>,
}

impl PersonRow {
    pub fn new(
        event_id: EventId,
        person_id: PersonId,
        country_id: CountryId,
        given_name: &str,
        family_name: &str,
        primary_role: &str,
    ) -> Self {
        Self {
            event_id,
            person_id,
            country_id,
            attrs: BTreeMap::new(),
        }
        .with(PersonEventAttr::GivenName, given_name)
        .with(PersonEventAttr::FamilyName, family_name)
        .with(PersonEventAttr::PrimaryRole, primary_role)
    }

    pub fn with(mut self, attr: PersonEventAttr, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(attr, value.into());
        self
    }

    pub fn with_scores(self, scores: Vec<Option<i64>>) -> Self {
        self.with(PersonEventAttr::ProblemScores, scores)
    }

    fn key(&self) -> PersonEventKey {
        PersonEventKey::new(self.person_id, self.event_id, self.country_id)
    }
}

/// Everything a [`MemorySource`] holds, in serializable form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySnapshot {
    pub config: GroupConfig,
    pub events: Vec<EventRow>,
    pub countries: Vec<CountryRow>,
    pub people: Vec<PersonRow>,
}

/// In-memory implementation of [`DataSource`].
///
/// Rows are added up front; once handed to an `EventGroup` the source is
/// only ever read.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    config: GroupConfig,
    events: BTreeMap<EventId, EventRow>,
    countries: BTreeMap<EventId, BTreeMap<CountryId, CountryRow>>,
    people: BTreeMap<EventId, Vec<PersonRow>>,
    person_ids: BTreeSet<PersonId>,
    country_ids: BTreeSet<CountryId>,
}

impl MemorySource {
    pub fn new(config: GroupConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn from_snapshot(snapshot: MemorySnapshot) -> Result<Self> {
        snapshot.config.validate()?;
        let mut source = Self::new(snapshot.config);
        for event in snapshot.events {
            source.add_event(event)?;
        }
        for country in snapshot.countries {
            source.add_country(country)?;
        }
        for person in snapshot.people {
            source.add_person(person)?;
        }
        Ok(source)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: MemorySnapshot =
            serde_json::from_str(json).map_err(|e| DataError::Config(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn add_event(&mut self, row: EventRow) -> Result<()> {
        let id = row.event_id;
        if self.events.contains_key(&id) {
            return Err(DataError::DuplicateId {
                kind: EntityKind::Event,
                id,
            });
        }
        debug!(event_id = id, "Adding event to memory source");
        self.events.insert(id, row);
        self.countries.entry(id).or_default();
        self.people.entry(id).or_default();
        Ok(())
    }

    pub fn add_country(&mut self, row: CountryRow) -> Result<()> {
        let countries = self
            .countries
            .get_mut(&row.event_id)
            .ok_or(DataError::NotFound {
                kind: EntityKind::Event,
                id: row.event_id,
            })?;
        if countries.contains_key(&row.country_id) {
            return Err(DataError::DuplicateId {
                kind: EntityKind::CountryEvent,
                id: row.country_id,
            });
        }
        self.country_ids.insert(row.country_id);
        countries.insert(row.country_id, row);
        Ok(())
    }

    /// Records are not deduplicated here; a person listed twice for the same
    /// country is reported when the edition's roster is built.
    pub fn add_person(&mut self, row: PersonRow) -> Result<()> {
        let people = self.people.get_mut(&row.event_id).ok_or(DataError::NotFound {
            kind: EntityKind::Event,
            id: row.event_id,
        })?;
        self.person_ids.insert(row.person_id);
        people.push(row);
        Ok(())
    }

    pub fn with_event(mut self, row: EventRow) -> Result<Self> {
        self.add_event(row)?;
        Ok(self)
    }

    pub fn with_country(mut self, row: CountryRow) -> Result<Self> {
        self.add_country(row)?;
        Ok(self)
    }

    pub fn with_person(mut self, row: PersonRow) -> Result<Self> {
        self.add_person(row)?;
        Ok(self)
    }

    fn event_row(&self, id: EventId) -> Result<&EventRow> {
        self.events.get(&id).ok_or(DataError::NotFound {
            kind: EntityKind::Event,
            id,
        })
    }

    fn country_row(&self, country_id: CountryId, event_id: EventId) -> Result<&CountryRow> {
        self.countries
            .get(&event_id)
            .and_then(|countries| countries.get(&country_id))
            .ok_or(DataError::NotFound {
                kind: EntityKind::CountryEvent,
                id: country_id,
            })
    }

    fn person_row(&self, key: PersonEventKey) -> Result<&PersonRow> {
        self.people
            .get(&key.event_id)
            .and_then(|people| people.iter().find(|row| row.key() == key))
            .ok_or(DataError::NotFound {
                kind: EntityKind::PersonEvent,
                id: key.person_id,
            })
    }

    fn event_people(&self, event_id: EventId) -> impl Iterator<Item = &PersonRow> {
        self.people.get(&event_id).into_iter().flatten()
    }
}

impl DataSource for MemorySource {
    fn group_attr(&self, attr: GroupAttr) -> Result<AttrValue> {
        let config = &self.config;
        Ok(match attr {
            GroupAttr::ShortName => config.short_name.clone().into(),
            GroupAttr::ShortNamePlural => config.short_name_plural().into(),
            GroupAttr::LongName => config.long_name.clone().into(),
            GroupAttr::DistinguishOfficial => config.distinguish_official.into(),
            GroupAttr::RankTopN => config.rank_top_n.into(),
            GroupAttr::HonourableMentionsAvailable => config.honourable_mentions_available.into(),
            GroupAttr::AgeDayDesc => config.age_day_desc.clone().into(),
            GroupAttr::EventIds => self.events.keys().copied().collect::<Vec<_>>().into(),
            GroupAttr::PersonIds => self.person_ids.iter().copied().collect::<Vec<_>>().into(),
            GroupAttr::CountryIds => self.country_ids.iter().copied().collect::<Vec<_>>().into(),
        })
    }

    fn event_exists(&self, id: EventId) -> bool {
        self.events.contains_key(&id)
    }

    fn person_exists(&self, id: PersonId) -> bool {
        self.person_ids.contains(&id)
    }

    fn country_exists(&self, id: CountryId) -> bool {
        self.country_ids.contains(&id)
    }

    fn person_event_exists(&self, person_id: PersonId, event_id: EventId) -> bool {
        self.event_people(event_id)
            .any(|row| row.person_id == person_id)
    }

    fn country_event_exists(&self, country_id: CountryId, event_id: EventId) -> bool {
        self.countries
            .get(&event_id)
            .is_some_and(|countries| countries.contains_key(&country_id))
    }

    fn person_event_country_ids(
        &self,
        person_id: PersonId,
        event_id: EventId,
    ) -> Result<Vec<CountryId>> {
        Ok(self
            .event_people(event_id)
            .filter(|row| row.person_id == person_id)
            .map(|row| row.country_id)
            .collect())
    }

    fn event_attr(&self, id: EventId, attr: EventAttr) -> Result<AttrValue> {
        let row = self.event_row(id)?;
        Ok(match attr {
            EventAttr::PersonIds => {
                let mut seen = BTreeSet::new();
                self.event_people(id)
                    .map(|row| row.person_id)
                    .filter(|person_id| seen.insert(*person_id))
                    .collect::<Vec<_>>()
                    .into()
            }
            EventAttr::CountryIds => self
                .countries
                .get(&id)
                .map(|countries| countries.keys().copied().collect::<Vec<_>>())
                .unwrap_or_default()
                .into(),
            _ => row.attrs.get(&attr).cloned().unwrap_or_default(),
        })
    }

    fn event_have_attr(&self, id: EventId, attr: EventAttr) -> bool {
        self.events
            .get(&id)
            .is_some_and(|row| row.attrs.contains_key(&attr))
    }

    fn person_event_attr(&self, key: PersonEventKey, attr: PersonEventAttr) -> Result<AttrValue> {
        let row = self.person_row(key)?;
        Ok(row.attrs.get(&attr).cloned().unwrap_or_default())
    }

    fn person_event_have_attr(&self, key: PersonEventKey, attr: PersonEventAttr) -> bool {
        attr.is_cross_checked()
            && self
                .person_row(key)
                .is_ok_and(|row| row.attrs.contains_key(&attr))
    }

    fn country_event_attr(
        &self,
        country_id: CountryId,
        event_id: EventId,
        attr: CountryEventAttr,
    ) -> Result<AttrValue> {
        let row = self.country_row(country_id, event_id)?;
        Ok(row.attrs.get(&attr).cloned().unwrap_or_default())
    }

    fn country_event_have_attr(
        &self,
        country_id: CountryId,
        event_id: EventId,
        attr: CountryEventAttr,
    ) -> bool {
        matches!(attr, CountryEventAttr::PersonIds | CountryEventAttr::GuideIds)
            && self
                .country_row(country_id, event_id)
                .is_ok_and(|row| row.attrs.contains_key(&attr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_source() -> MemorySource {
        MemorySource::new(GroupConfig::default())
            .with_event(EventRow::new(1).with_problems("2021", vec![7, 7]))
            .unwrap()
            .with_country(CountryRow::new(1, 10, "ABC", "Atlantis"))
            .unwrap()
            .with_person(PersonRow::new(1, 100, 10, "Ada", "Lovelace", "Contestant 1"))
            .unwrap()
    }

    #[test]
    fn rejects_duplicate_events_and_countries() {
        let mut source = sample_source();

        assert_eq!(
            source.add_event(EventRow::new(1)),
            Err(DataError::DuplicateId {
                kind: EntityKind::Event,
                id: 1
            })
        );
        assert_eq!(
            source.add_country(CountryRow::new(1, 10, "ABC", "Atlantis")),
            Err(DataError::DuplicateId {
                kind: EntityKind::CountryEvent,
                id: 10
            })
        );
    }

    #[test]
    fn rows_for_unknown_events_are_rejected() {
        let mut source = sample_source();
        let result = source.add_person(PersonRow::new(9, 1, 1, "A", "B", "Leader"));
        assert!(matches!(result, Err(DataError::NotFound { .. })));
    }

    #[test]
    fn unset_values_are_absent() {
        let source = sample_source();
        let key = PersonEventKey::new(100, 1, 10);

        assert_eq!(
            source.person_event_attr(key, PersonEventAttr::Diet).unwrap(),
            AttrValue::Absent
        );
        assert!(!source.person_event_have_attr(key, PersonEventAttr::TotalScore));
    }

    #[test]
    fn inheritable_attributes_report_presence() {
        let source = MemorySource::new(GroupConfig::default())
            .with_event(EventRow::new(1).with(EventAttr::RankTopN, 2u32))
            .unwrap();

        assert!(source.event_have_attr(1, EventAttr::RankTopN));
        assert!(!source.event_have_attr(1, EventAttr::ShortName));
    }

    #[test]
    fn loads_from_json_snapshot() {
        let json = r#"{
            "config": {"short_name": "EGMO"},
            "events": [{"event_id": 3, "attrs": {"year": {"text": "2019"}}}],
            "countries": [{"event_id": 3, "country_id": 5,
                           "attrs": {"code": {"text": "XYZ"}}}],
            "people": []
        }"#;

        let source = MemorySource::from_json_str(json).unwrap();

        assert!(source.event_exists(3));
        assert!(source.country_event_exists(5, 3));
        assert_eq!(
            source.event_attr(3, EventAttr::Year).unwrap(),
            AttrValue::Text("2019".to_string())
        );
        assert_eq!(
            source.group_attr(GroupAttr::ShortName).unwrap(),
            AttrValue::Text("EGMO".to_string())
        );
    }
}
