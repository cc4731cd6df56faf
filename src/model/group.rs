use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use tracing::debug;

use super::country::CountryRecord;
use super::event::EventRecord;
use super::person::PersonRecord;
use super::{Country, CountryEvent, Event, Person, PersonEvent};
use crate::cache::{AttrCache, LazyMap, Memo};
use crate::source::{AttrValue, Attribute, DataSource, FromAttr, GroupAttr};
use crate::shared::{CountryId, EntityKind, EventId, PersonId, Result};

/// Every edition of one competition, with everyone and every country that
/// ever took part.
///
/// An `EventGroup` is a read-only snapshot of its data source. Everything
/// reachable from it is built on first access and cached for the group's
/// lifetime; if the underlying store changes, build a new group.
pub struct EventGroup {
    source: Rc<dyn DataSource>,
    pub(super) events: LazyMap<EventRecord>,
    pub(super) people: LazyMap<PersonRecord>,
    pub(super) countries: LazyMap<CountryRecord>,
    attrs: AttrCache<GroupAttr>,
    event_list: Memo<Vec<Rc<EventRecord>>>,
    contestants: Memo<Vec<Rc<PersonRecord>>>,
}

impl EventGroup {
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self::from_source(Rc::new(source))
    }

    pub fn from_source(source: Rc<dyn DataSource>) -> Self {
        let events = {
            let (exists, build, list) = (source.clone(), source.clone(), source.clone());
            LazyMap::new(
                EntityKind::Event,
                move |id| Ok(exists.event_exists(id)),
                move |id| Ok(EventRecord::new(build.clone(), id)),
                move || id_list(list.as_ref(), GroupAttr::EventIds),
            )
        };
        let people = {
            let (exists, list) = (source.clone(), source.clone());
            LazyMap::new(
                EntityKind::Person,
                move |id| Ok(exists.person_exists(id)),
                |id| Ok(PersonRecord::new(id)),
                move || id_list(list.as_ref(), GroupAttr::PersonIds),
            )
        };
        let countries = {
            let (exists, list) = (source.clone(), source.clone());
            LazyMap::new(
                EntityKind::Country,
                move |id| Ok(exists.country_exists(id)),
                |id| Ok(CountryRecord::new(id)),
                move || id_list(list.as_ref(), GroupAttr::CountryIds),
            )
        };

        Self {
            source,
            events,
            people,
            countries,
            attrs: AttrCache::new(),
            event_list: Memo::new(),
            contestants: Memo::new(),
        }
    }

    pub(super) fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// Raw group-level value, used by editions that inherit a setting.
    pub(super) fn group_value(&self, attr: GroupAttr) -> Result<AttrValue> {
        self.attrs
            .get_or_fetch(attr, || self.source.group_attr(attr))
    }

    fn attr<T: FromAttr>(&self, attr: GroupAttr) -> Result<T> {
        self.attrs.typed(attr, || self.source.group_attr(attr))
    }

    port_getters!(GroupAttr {
        /// Abbreviated name, typically all upper case.
        short_name: String = ShortName,
        long_name: String = LongName,
        age_day_desc: Option<String> = AgeDayDesc,
        rank_top_n: Option<u32> = RankTopN,
    });

    pub fn short_name_plural(&self) -> Result<String> {
        match self.attr::<Option<String>>(GroupAttr::ShortNamePlural)? {
            Some(plural) => Ok(plural),
            None => Ok(format!("{}s", self.short_name()?)),
        }
    }

    pub fn distinguish_official(&self) -> Result<bool> {
        Ok(self
            .attr::<Option<bool>>(GroupAttr::DistinguishOfficial)?
            .unwrap_or(false))
    }

    pub fn honourable_mentions_available(&self) -> Result<bool> {
        Ok(self
            .attr::<Option<bool>>(GroupAttr::HonourableMentionsAvailable)?
            .unwrap_or(false))
    }

    pub fn event(&self, id: EventId) -> Result<Event<'_>> {
        Ok(Event::new(self, self.events.require(id)?))
    }

    pub fn find_event(&self, id: EventId) -> Result<Option<Event<'_>>> {
        Ok(self.events.get(id)?.map(|record| Event::new(self, record)))
    }

    pub fn person(&self, id: PersonId) -> Result<Person<'_>> {
        Ok(Person::new(self, self.people.require(id)?))
    }

    pub fn find_person(&self, id: PersonId) -> Result<Option<Person<'_>>> {
        Ok(self.people.get(id)?.map(|record| Person::new(self, record)))
    }

    pub fn country(&self, id: CountryId) -> Result<Country<'_>> {
        Ok(Country::new(self, self.countries.require(id)?))
    }

    pub fn find_country(&self, id: CountryId) -> Result<Option<Country<'_>>> {
        Ok(self.countries.get(id)?.map(|record| Country::new(self, record)))
    }

    /// All editions, in chronological (id) order.
    pub fn event_list(&self) -> Result<Vec<Event<'_>>> {
        let records = self.event_list.get_or_try_init(|| {
            let mut records = self.events.values()?;
            records.sort_by_key(|record| record.id);
            debug!(events = records.len(), "Materialized event list");
            Ok(records)
        })?;
        Ok(records
            .iter()
            .map(|record| Event::new(self, record.clone()))
            .collect())
    }

    pub fn person_list(&self) -> Result<Vec<Person<'_>>> {
        Ok(self
            .people
            .values()?
            .into_iter()
            .map(|record| Person::new(self, record))
            .collect())
    }

    pub fn country_list(&self) -> Result<Vec<Country<'_>>> {
        Ok(self
            .countries
            .values()?
            .into_iter()
            .map(|record| Country::new(self, record))
            .collect())
    }

    /// People who were a contestant at least once.
    pub fn contestant_list(&self) -> Result<Vec<Person<'_>>> {
        let records = self.contestants.get_or_try_init(|| {
            let mut contestants = Vec::new();
            for person in self.person_list()? {
                if person.num_participations()? > 0 {
                    contestants.push(person.record.clone());
                }
            }
            Ok(contestants)
        })?;
        Ok(records
            .iter()
            .map(|record| Person::new(self, record.clone()))
            .collect())
    }

    /// Every participation by every person, edition by edition.
    pub fn person_event_list(&self) -> Result<Vec<PersonEvent<'_>>> {
        let mut all = Vec::new();
        for event in self.event_list()? {
            all.extend(event.person_list()?);
        }
        Ok(all)
    }

    pub fn country_event_list(&self) -> Result<Vec<CountryEvent<'_>>> {
        let mut all = Vec::new();
        for event in self.event_list()? {
            all.extend(event.country_list()?);
        }
        Ok(all)
    }

    /// Most problems set at any edition, if any edition says.
    pub fn max_num_problems(&self) -> Result<Option<u32>> {
        let mut max = None;
        for event in self.event_list()? {
            max = max.max(event.num_problems()?);
        }
        Ok(max)
    }

    pub fn distinguish_official_varies(&self) -> Result<bool> {
        self.varies(|event| event.distinguish_official())
    }

    pub fn honourable_mentions_available_varies(&self) -> Result<bool> {
        self.varies(|event| event.honourable_mentions_available())
    }

    pub fn rank_top_n_varies(&self) -> Result<bool> {
        self.varies(|event| event.rank_top_n())
    }

    pub fn age_day_desc_varies(&self) -> Result<bool> {
        self.varies(|event| event.age_day_desc())
    }

    /// Whether the editions' effective values of a setting differ.
    fn varies<T: Eq + Hash>(&self, value: impl Fn(&Event<'_>) -> Result<T>) -> Result<bool> {
        let mut seen = HashSet::new();
        for event in self.event_list()? {
            seen.insert(value(&event)?);
        }
        Ok(seen.len() > 1)
    }
}

impl fmt::Debug for EventGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventGroup")
            .field("events", &self.events)
            .field("people", &self.people)
            .field("countries", &self.countries)
            .finish_non_exhaustive()
    }
}

fn id_list(source: &dyn DataSource, attr: GroupAttr) -> Result<Vec<u32>> {
    source.group_attr(attr)?.into_typed(GroupAttr::KIND, attr.name())
}
