use std::fmt;
use std::rc::Rc;

use super::country_event::CountryEventRecord;
use super::event::EventRecord;
use super::{collation_key, CountryEvent, Event, EventGroup};
use crate::cache::Memo;
use crate::shared::{CountryId, DataError, EntityKind, Result};

pub(super) struct CountryRecord {
    id: CountryId,
    participations: Memo<Vec<(Rc<EventRecord>, Rc<CountryEventRecord>)>>,
    hosted: Memo<Vec<Rc<EventRecord>>>,
}

impl CountryRecord {
    pub(super) fn new(id: CountryId) -> Self {
        Self {
            id,
            participations: Memo::new(),
            hosted: Memo::new(),
        }
    }
}

/// A team across every edition it took part in: usually a national team,
/// sometimes a second team, sometimes a container for an edition's staff.
#[derive(Clone)]
pub struct Country<'g> {
    group: &'g EventGroup,
    record: Rc<CountryRecord>,
}

impl<'g> Country<'g> {
    pub(super) fn new(group: &'g EventGroup, record: Rc<CountryRecord>) -> Self {
        Self { group, record }
    }

    pub fn id(&self) -> CountryId {
        self.record.id
    }

    /// Participations in chronological order.
    pub fn participation_list(&self) -> Result<Vec<CountryEvent<'g>>> {
        let records = self.record.participations.get_or_try_init(|| {
            let mut participations = Vec::new();
            for event in self.group.event_list()? {
                if let Some(country) = event.find_country(self.record.id)? {
                    participations.push((event.record.clone(), country.record.clone()));
                }
            }
            Ok(participations)
        })?;
        Ok(records
            .iter()
            .map(|(event, record)| CountryEvent::new(self.group, event.clone(), record.clone()))
            .collect())
    }

    pub fn num_participations(&self) -> Result<usize> {
        Ok(self.participation_list()?.len())
    }

    /// Editions this country hosted.
    pub fn host_list(&self) -> Result<Vec<Event<'g>>> {
        let records = self.record.hosted.get_or_try_init(|| {
            let mut hosted = Vec::new();
            for event in self.group.event_list()? {
                if event.host_country_id()? == Some(self.record.id) {
                    hosted.push(event.record.clone());
                }
            }
            Ok(hosted)
        })?;
        Ok(records
            .iter()
            .map(|record| Event::new(self.group, record.clone()))
            .collect())
    }

    /// Most problems at any edition this country sent contestants to.
    pub fn max_num_problems(&self) -> Result<Option<u32>> {
        let mut max = None;
        for participation in self.participation_list()? {
            if participation.num_contestants()? > 0 {
                max = max.max(participation.event().num_problems()?);
            }
        }
        Ok(max)
    }

    fn latest(&self) -> Result<CountryEvent<'g>> {
        self.participation_list()?
            .pop()
            .ok_or(DataError::NotFound {
                kind: EntityKind::CountryEvent,
                id: self.record.id,
            })
    }

    pub fn code(&self) -> Result<String> {
        self.latest()?.code()
    }

    pub fn name(&self) -> Result<String> {
        self.latest()?.name()
    }

    pub fn flag_url(&self) -> Result<Option<String>> {
        self.latest()?.flag_url()
    }

    pub fn name_with_code(&self) -> Result<String> {
        Ok(format!("{} ({})", self.name()?, self.code()?))
    }

    /// The most recent official status the store gave explicitly.
    pub fn is_official(&self) -> Result<Option<bool>> {
        for participation in self.participation_list()?.iter().rev() {
            if let Some(official) = participation.declared_official()? {
                return Ok(Some(official));
            }
        }
        Ok(None)
    }

    pub fn sort_key(&self) -> Result<(String, String, CountryId)> {
        Ok((
            collation_key(&self.code()?),
            collation_key(&self.name()?),
            self.record.id,
        ))
    }
}

impl PartialEq for Country<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record.id == other.record.id
    }
}

impl fmt::Debug for Country<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Country").field("id", &self.record.id).finish()
    }
}
