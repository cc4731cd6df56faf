use std::fmt;
use std::rc::Rc;

use super::event::EventRecord;
use super::person_event::PersonEventRecord;
use super::{
    collation_key, parse_text, AwardCounts, Country, Event, EventGroup, ParticipationType,
    PersonEvent,
};
use crate::cache::{AttrCache, Memo};
use crate::source::{Attribute, CountryEventAttr, FromAttr};
use crate::shared::{CountryId, DataError, EntityKind, EventId, PersonId, Result};
use crate::stats::top_n_sum;

pub(super) struct CountryEventRecord {
    country_id: CountryId,
    event_id: EventId,
    attrs: AttrCache<CountryEventAttr>,
    people: Memo<Vec<Rc<PersonEventRecord>>>,
    contestants: Memo<Vec<Rc<PersonEventRecord>>>,
    guides: Memo<Vec<Rc<PersonEventRecord>>>,
    awards: Memo<Option<AwardCounts>>,
}

impl CountryEventRecord {
    pub(super) fn new(country_id: CountryId, event_id: EventId) -> Self {
        Self {
            country_id,
            event_id,
            attrs: AttrCache::new(),
            people: Memo::new(),
            contestants: Memo::new(),
            guides: Memo::new(),
            awards: Memo::new(),
        }
    }
}

/// One country's participation in one edition: its team, its scores and
/// its place.
#[derive(Clone)]
pub struct CountryEvent<'g> {
    group: &'g EventGroup,
    event: Rc<EventRecord>,
    pub(super) record: Rc<CountryEventRecord>,
}

impl<'g> CountryEvent<'g> {
    pub(super) fn new(
        group: &'g EventGroup,
        event: Rc<EventRecord>,
        record: Rc<CountryEventRecord>,
    ) -> Self {
        Self {
            group,
            event,
            record,
        }
    }

    pub fn country_id(&self) -> CountryId {
        self.record.country_id
    }

    pub fn event_id(&self) -> EventId {
        self.record.event_id
    }

    pub fn event(&self) -> Event<'g> {
        Event::new(self.group, self.event.clone())
    }

    pub fn country(&self) -> Result<Country<'g>> {
        self.group.country(self.record.country_id)
    }

    fn attr<T: FromAttr>(&self, attr: CountryEventAttr) -> Result<T> {
        self.record.attrs.typed(attr, || {
            self.group
                .source()
                .country_event_attr(self.record.country_id, self.record.event_id, attr)
        })
    }

    fn have_attr(&self, attr: CountryEventAttr) -> bool {
        self.group
            .source()
            .country_event_have_attr(self.record.country_id, self.record.event_id, attr)
    }

    port_getters!(CountryEventAttr {
        annual_url: Option<String> = AnnualUrl,
        code: String = Code,
        name: String = Name,
        flag_url: Option<String> = FlagUrl,
        flag_filename: Option<String> = FlagFilename,
        contact_emails: Vec<String> = ContactEmails,
        expected_leaders: Option<u32> = ExpectedLeaders,
        expected_deputies: Option<u32> = ExpectedDeputies,
        expected_contestants: Option<u32> = ExpectedContestants,
        expected_observers_a: Option<u32> = ExpectedObserversA,
        expected_observers_b: Option<u32> = ExpectedObserversB,
        expected_observers_c: Option<u32> = ExpectedObserversC,
        expected_single_rooms: Option<u32> = ExpectedSingleRooms,
        generic_id: Option<u32> = GenericId,
    });

    /// E.g. "Utopia (UTO)".
    pub fn name_with_code(&self) -> Result<String> {
        Ok(format!("{} ({})", self.name()?, self.code()?))
    }

    pub fn expected_numbers_confirmed(&self) -> Result<bool> {
        Ok(self
            .attr::<Option<bool>>(CountryEventAttr::ExpectedNumbersConfirmed)?
            .unwrap_or(false))
    }

    pub fn participation_type(&self) -> Result<Option<ParticipationType>> {
        parse_text(
            self.attr(CountryEventAttr::ParticipationType)?,
            CountryEventAttr::KIND,
            CountryEventAttr::ParticipationType.name(),
            "a participation type",
        )
    }

    /// The value the store gives for this edition alone, if any.
    pub(super) fn declared_official(&self) -> Result<Option<bool>> {
        self.attr(CountryEventAttr::IsOfficial)
    }

    /// Whether this is an official country at this edition.
    ///
    /// `None` when the edition does not distinguish official countries.
    /// Otherwise the edition's own value, else the country's most recent
    /// one, else not official.
    pub fn is_official(&self) -> Result<Option<bool>> {
        if !self.event().distinguish_official()? {
            return Ok(None);
        }
        if let Some(official) = self.declared_official()? {
            return Ok(Some(official));
        }
        Ok(Some(self.country()?.is_official()?.unwrap_or(false)))
    }

    /// Normal countries send teams; the rest are containers for staff.
    pub fn is_normal(&self) -> Result<bool> {
        Ok(self
            .attr::<Option<bool>>(CountryEventAttr::IsNormal)?
            .unwrap_or(true))
    }

    /// Everyone attending for this country, from the store's roster if it
    /// keeps one, else by filtering the edition's people.
    pub fn person_list(&self) -> Result<Vec<PersonEvent<'g>>> {
        let records = self.record.people.get_or_try_init(|| {
            if self.have_attr(CountryEventAttr::PersonIds) {
                let ids: Vec<PersonId> = self.attr(CountryEventAttr::PersonIds)?;
                self.member_records(&ids)
            } else {
                let mut people = Vec::new();
                for person in self.event().person_list()? {
                    if person.country_id() == self.record.country_id {
                        people.push(person.record.clone());
                    }
                }
                Ok(people)
            }
        })?;
        Ok(self.views(records))
    }

    pub fn contestant_list(&self) -> Result<Vec<PersonEvent<'g>>> {
        let records = self.record.contestants.get_or_try_init(|| {
            let mut contestants = Vec::new();
            for person in self.person_list()? {
                if person.is_contestant()? {
                    contestants.push(person.record.clone());
                }
            }
            Ok(contestants)
        })?;
        Ok(self.views(records))
    }

    pub fn num_contestants(&self) -> Result<usize> {
        Ok(self.contestant_list()?.len())
    }

    /// The guides assigned to this country.
    pub fn guide_list(&self) -> Result<Vec<PersonEvent<'g>>> {
        let records = self.record.guides.get_or_try_init(|| {
            if self.have_attr(CountryEventAttr::GuideIds) {
                let ids: Vec<PersonId> = self.attr(CountryEventAttr::GuideIds)?;
                self.guide_records(&ids)
            } else {
                let mut guides = Vec::new();
                for person in self.event().person_list()? {
                    if person.guides_country(self.record.country_id)? {
                        guides.push(person.record.clone());
                    }
                }
                Ok(guides)
            }
        })?;
        Ok(self.views(records))
    }

    /// The edition's records for the people on this country's roster.
    ///
    /// Each must have taken part with this country, either directly or
    /// through a staff role folded into another participation.
    fn member_records(&self, ids: &[PersonId]) -> Result<Vec<Rc<PersonEventRecord>>> {
        let country_id = self.record.country_id;
        self.records_for(ids, |participations| {
            participations
                .iter()
                .find(|p| p.country_id() == country_id)
                .or_else(|| {
                    participations
                        .iter()
                        .find(|p| p.record.folded_staff.contains(&country_id))
                })
        })
    }

    /// Guides usually attend with a staff country, so any participation
    /// of theirs will do, preferring one with this country.
    fn guide_records(&self, ids: &[PersonId]) -> Result<Vec<Rc<PersonEventRecord>>> {
        let country_id = self.record.country_id;
        self.records_for(ids, |participations| {
            participations
                .iter()
                .find(|p| p.country_id() == country_id)
                .or_else(|| participations.first())
        })
    }

    fn records_for(
        &self,
        ids: &[PersonId],
        choose: impl for<'p> Fn(&'p [PersonEvent<'g>]) -> Option<&'p PersonEvent<'g>>,
    ) -> Result<Vec<Rc<PersonEventRecord>>> {
        let event = self.event();
        let mut records = Vec::with_capacity(ids.len());
        for &id in ids {
            let participations = event.person_events(id)?;
            match choose(participations.as_slice()) {
                Some(person) => records.push(person.record.clone()),
                None => {
                    return Err(DataError::NotFound {
                        kind: EntityKind::PersonEvent,
                        id,
                    })
                }
            }
        }
        Ok(records)
    }

    fn views(&self, records: &[Rc<PersonEventRecord>]) -> Vec<PersonEvent<'g>> {
        records
            .iter()
            .map(|record| PersonEvent::new(self.group, self.event.clone(), record.clone()))
            .collect()
    }

    /// Award totals; `None` until scores are final.
    pub fn num_awards(&self) -> Result<Option<AwardCounts>> {
        self.record
            .awards
            .get_or_try_init(|| {
                if !self.event().scores_final()? {
                    return Ok(None);
                }
                let mut counts = AwardCounts::default();
                for person in self.contestant_list()? {
                    if let Some(award) = person.award()? {
                        counts.record(award);
                    }
                }
                Ok(Some(counts))
            })
            .copied()
    }

    fn contestant_totals(&self) -> Result<Vec<i64>> {
        self.contestant_list()?
            .iter()
            .map(PersonEvent::total_score)
            .collect()
    }

    fn contestant_max_totals(&self) -> Result<Vec<i64>> {
        self.contestant_list()?
            .iter()
            .map(PersonEvent::max_total_score)
            .collect()
    }

    pub fn total_score(&self) -> Result<i64> {
        Ok(self.contestant_totals()?.iter().sum())
    }

    pub fn max_total_score(&self) -> Result<i64> {
        Ok(self.contestant_max_totals()?.iter().sum())
    }

    /// The country's ranking key: the sum of its best `rank_top_n`
    /// contestant totals, or of all of them.
    pub fn total_score_for_rank(&self) -> Result<i64> {
        Ok(top_n_sum(&self.contestant_totals()?, self.event().rank_top_n()?))
    }

    pub fn max_total_score_for_rank(&self) -> Result<i64> {
        Ok(top_n_sum(
            &self.contestant_max_totals()?,
            self.event().rank_top_n()?,
        ))
    }

    /// Sum of the known scores on each problem.
    pub fn problem_totals(&self) -> Result<Vec<i64>> {
        self.per_problem(|score, _| score.unwrap_or(0))
    }

    /// Like [`CountryEvent::problem_totals`], counting unknown scores as
    /// full marks.
    pub fn max_problem_totals(&self) -> Result<Vec<i64>> {
        self.per_problem(|score, max| score.unwrap_or(max))
    }

    fn per_problem(&self, value: impl Fn(Option<i64>, i64) -> i64) -> Result<Vec<i64>> {
        let event = self.event();
        let marks = event.marks_per_problem()?;
        let mut totals = vec![0; event.problem_count()?];
        for person in self.contestant_list()? {
            let scores = person.problem_scores()?;
            for (n, total) in totals.iter_mut().enumerate() {
                let max = marks.get(n).copied().unwrap_or(0);
                *total += value(scores.get(n).copied().flatten(), max);
            }
        }
        Ok(totals)
    }

    pub fn have_any_scores(&self) -> Result<bool> {
        for person in self.contestant_list()? {
            if person.have_any_scores()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// For each problem, whether any contestant has a score on it.
    pub fn have_any_problem_scores(&self) -> Result<Vec<bool>> {
        let mut have = vec![false; self.event().problem_count()?];
        for person in self.contestant_list()? {
            let scores = person.problem_scores()?;
            for (n, flag) in have.iter_mut().enumerate() {
                *flag |= scores.get(n).copied().flatten().is_some();
            }
        }
        Ok(have)
    }

    /// Rank among countries with contestants; `None` for a country with
    /// no contestants.
    pub fn rank(&self) -> Result<Option<u32>> {
        Ok(self
            .event()
            .compute_all_ranks()?
            .countries
            .rank(&self.record.country_id))
    }

    pub fn rank_official(&self) -> Result<Option<u32>> {
        Ok(self
            .event()
            .compute_all_ranks()?
            .countries
            .rank_official(&self.record.country_id))
    }

    pub fn sort_key(&self) -> Result<(EventId, String, String, CountryId)> {
        Ok((
            self.record.event_id,
            collation_key(&self.code()?),
            collation_key(&self.name()?),
            self.record.country_id,
        ))
    }
}

impl PartialEq for CountryEvent<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record.country_id == other.record.country_id
            && self.record.event_id == other.record.event_id
    }
}

impl fmt::Debug for CountryEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountryEvent")
            .field("country_id", &self.record.country_id)
            .field("event_id", &self.record.event_id)
            .finish()
    }
}
