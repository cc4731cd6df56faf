use std::cmp::Reverse;
use std::fmt;
use std::rc::Rc;

use super::event::EventRecord;
use super::person_event::PersonEventRecord;
use super::{collation_key, AwardCounts, Country, EventGroup, PersonEvent};
use crate::cache::Memo;
use crate::shared::{DataError, EntityKind, PersonId, Result};

type Participations = Vec<(Rc<EventRecord>, Rc<PersonEventRecord>)>;

pub(super) struct PersonRecord {
    id: PersonId,
    participations: Memo<Participations>,
    contestants: Memo<Participations>,
    awards: Memo<AwardCounts>,
}

impl PersonRecord {
    pub(super) fn new(id: PersonId) -> Self {
        Self {
            id,
            participations: Memo::new(),
            contestants: Memo::new(),
            awards: Memo::new(),
        }
    }
}

/// One individual, across every edition they attended.
///
/// A person's name and photo are whatever their latest participation
/// says.
#[derive(Clone)]
pub struct Person<'g> {
    group: &'g EventGroup,
    pub(super) record: Rc<PersonRecord>,
}

impl<'g> Person<'g> {
    pub(super) fn new(group: &'g EventGroup, record: Rc<PersonRecord>) -> Self {
        Self { group, record }
    }

    pub fn id(&self) -> PersonId {
        self.record.id
    }

    /// Every participation, ordered by [`PersonEvent::sort_key`] (so
    /// chronologically).
    pub fn participation_list(&self) -> Result<Vec<PersonEvent<'g>>> {
        let records = self.record.participations.get_or_try_init(|| {
            let mut participations = Vec::new();
            for event in self.group.event_list()? {
                for participation in event.person_events(self.record.id)? {
                    let key = participation.sort_key()?;
                    participations.push((key, participation));
                }
            }
            participations.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(participations
                .into_iter()
                .map(|(_, p)| (p.event().record.clone(), p.record.clone()))
                .collect())
        })?;
        Ok(self.views(records))
    }

    fn views(&self, records: &Participations) -> Vec<PersonEvent<'g>> {
        records
            .iter()
            .map(|(event, record)| PersonEvent::new(self.group, event.clone(), record.clone()))
            .collect()
    }

    pub fn contestant_list(&self) -> Result<Vec<PersonEvent<'g>>> {
        let records = self.record.contestants.get_or_try_init(|| {
            let mut contestants = Vec::new();
            for participation in self.participation_list()? {
                if participation.is_contestant()? {
                    let event = participation.event().record.clone();
                    contestants.push((event, participation.record.clone()));
                }
            }
            Ok(contestants)
        })?;
        Ok(self.views(records))
    }

    /// Number of times this person was a contestant.
    pub fn num_participations(&self) -> Result<usize> {
        Ok(self.contestant_list()?.len())
    }

    pub fn num_awards(&self) -> Result<AwardCounts> {
        self.record
            .awards
            .get_or_try_init(|| {
                let mut counts = AwardCounts::default();
                for participation in self.contestant_list()? {
                    if let Some(award) = participation.award()? {
                        counts.record(award);
                    }
                }
                Ok(counts)
            })
            .copied()
    }

    /// Distinct countries this person was a contestant for, in order of
    /// first appearance.
    pub fn country_list(&self) -> Result<Vec<Country<'g>>> {
        let mut countries: Vec<Country<'g>> = Vec::new();
        for participation in self.contestant_list()? {
            let country_id = participation.country_id();
            if !countries.iter().any(|c| c.id() == country_id) {
                countries.push(self.group.country(country_id)?);
            }
        }
        Ok(countries)
    }

    fn latest(&self) -> Result<PersonEvent<'g>> {
        self.participation_list()?
            .pop()
            .ok_or(DataError::NotFound {
                kind: EntityKind::PersonEvent,
                id: self.record.id,
            })
    }

    pub fn given_name(&self) -> Result<String> {
        self.latest()?.given_name()
    }

    pub fn family_name(&self) -> Result<String> {
        self.latest()?.family_name()
    }

    pub fn name(&self) -> Result<String> {
        self.latest()?.name()
    }

    /// The most recent registration photo, if any participation has one.
    pub fn photo_url(&self) -> Result<Option<String>> {
        for participation in self.participation_list()?.iter().rev() {
            if let Some(url) = participation.photo_url()? {
                return Ok(Some(url));
            }
        }
        Ok(None)
    }

    pub fn sort_key_alpha(&self) -> Result<(String, String, PersonId)> {
        Ok((
            collation_key(&self.family_name()?),
            collation_key(&self.given_name()?),
            self.record.id,
        ))
    }

    /// Most golds first, then silvers, bronzes and honourable mentions,
    /// then alphabetical.
    #[allow(clippy::type_complexity)]
    pub fn sort_key_hall_of_fame(
        &self,
    ) -> Result<(Reverse<u32>, Reverse<u32>, Reverse<u32>, Reverse<u32>, String, String, PersonId)>
    {
        let awards = self.num_awards()?;
        let (family, given, id) = self.sort_key_alpha()?;
        Ok((
            Reverse(awards.gold),
            Reverse(awards.silver),
            Reverse(awards.bronze),
            Reverse(awards.honourable_mention),
            family,
            given,
            id,
        ))
    }
}

impl PartialEq for Person<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record.id == other.record.id
    }
}

impl fmt::Debug for Person<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Person").field("id", &self.record.id).finish()
    }
}
