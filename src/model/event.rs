use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;

use super::country_event::CountryEventRecord;
use super::event_stats::EventRankings;
use super::person_event::PersonEventRecord;
use super::{
    collation_key, parse_date, parse_text, Country, CountryEvent, EventGroup, EventType,
    MedalBoundaries, Paper, PersonEvent,
};
use crate::cache::{AttrCache, LazyMap, Memo};
use crate::source::{Attribute, DataSource, EventAttr, FromAttr};
use crate::shared::{CountryId, DataError, EntityKind, EventId, PersonId, Result};

/// Everything cached for one edition.
pub(super) struct EventRecord {
    pub(super) id: EventId,
    /// Person id -> that person's participation records (usually one)
    pub(super) people: LazyMap<Vec<Rc<PersonEventRecord>>>,
    pub(super) countries: LazyMap<CountryEventRecord>,
    pub(super) attrs: AttrCache<EventAttr>,
    pub(super) contestants: Memo<Vec<Rc<PersonEventRecord>>>,
    pub(super) normal_people: Memo<Vec<Rc<PersonEventRecord>>>,
    pub(super) staff: Memo<Vec<Rc<PersonEventRecord>>>,
    pub(super) rooms: Memo<BTreeMap<String, Vec<Rc<PersonEventRecord>>>>,
    pub(super) languages: Memo<Vec<String>>,
    pub(super) countries_with_contestants: Memo<Vec<Rc<CountryEventRecord>>>,
    pub(super) rankings: Memo<EventRankings>,
    pub(super) problem_stats: Memo<Vec<Vec<u32>>>,
}

impl EventRecord {
    pub(super) fn new(source: Rc<dyn DataSource>, id: EventId) -> Self {
        let people = {
            let (exists, build, list) = (source.clone(), source.clone(), source.clone());
            LazyMap::new(
                EntityKind::PersonEvent,
                move |person_id| Ok(exists.person_event_exists(person_id, id)),
                move |person_id| PersonEventRecord::build_all(build.as_ref(), person_id, id),
                move || event_id_list(list.as_ref(), id, EventAttr::PersonIds),
            )
        };
        let countries = {
            let (exists, list) = (source.clone(), source);
            LazyMap::new(
                EntityKind::CountryEvent,
                move |country_id| Ok(exists.country_event_exists(country_id, id)),
                move |country_id| Ok(CountryEventRecord::new(country_id, id)),
                move || event_id_list(list.as_ref(), id, EventAttr::CountryIds),
            )
        };

        Self {
            id,
            people,
            countries,
            attrs: AttrCache::new(),
            contestants: Memo::new(),
            normal_people: Memo::new(),
            staff: Memo::new(),
            rooms: Memo::new(),
            languages: Memo::new(),
            countries_with_contestants: Memo::new(),
            rankings: Memo::new(),
            problem_stats: Memo::new(),
        }
    }
}

fn event_id_list(source: &dyn DataSource, id: EventId, attr: EventAttr) -> Result<Vec<u32>> {
    source.event_attr(id, attr)?.into_typed(EventAttr::KIND, attr.name())
}

/// One edition of the competition.
///
/// Values the store does not know yet (boundaries before marking is done,
/// a host city that was never entered) read as `None`.
#[derive(Clone)]
pub struct Event<'g> {
    pub(super) group: &'g EventGroup,
    pub(super) record: Rc<EventRecord>,
}

impl<'g> Event<'g> {
    pub(super) fn new(group: &'g EventGroup, record: Rc<EventRecord>) -> Self {
        Self { group, record }
    }

    pub fn id(&self) -> EventId {
        self.record.id
    }

    pub fn event_group(&self) -> &'g EventGroup {
        self.group
    }

    pub(super) fn attr<T: FromAttr>(&self, attr: EventAttr) -> Result<T> {
        self.record
            .attrs
            .typed(attr, || self.group.source().event_attr(self.record.id, attr))
    }

    /// Reads a setting the edition may override, falling back to the
    /// group-wide value.
    fn inherited<T: FromAttr>(&self, attr: EventAttr) -> Result<T> {
        let source = self.group.source();
        self.record.attrs.typed(attr, || {
            match attr.group_default() {
                Some(group_attr) if !source.event_have_attr(self.record.id, attr) => {
                    self.group.group_value(group_attr)
                }
                _ => source.event_attr(self.record.id, attr),
            }
        })
    }

    pub(super) fn view_person(&self, record: Rc<PersonEventRecord>) -> PersonEvent<'g> {
        PersonEvent::new(self.group, self.record.clone(), record)
    }

    pub(super) fn view_country(&self, record: Rc<CountryEventRecord>) -> CountryEvent<'g> {
        CountryEvent::new(self.group, self.record.clone(), record)
    }

    pub fn short_name(&self) -> Result<String> {
        self.inherited(EventAttr::ShortName)
    }

    pub fn long_name(&self) -> Result<String> {
        self.inherited(EventAttr::LongName)
    }

    pub fn distinguish_official(&self) -> Result<bool> {
        Ok(self
            .inherited::<Option<bool>>(EventAttr::DistinguishOfficial)?
            .unwrap_or(false))
    }

    pub fn rank_top_n(&self) -> Result<Option<u32>> {
        self.inherited(EventAttr::RankTopN)
    }

    pub fn honourable_mentions_available(&self) -> Result<bool> {
        Ok(self
            .inherited::<Option<bool>>(EventAttr::HonourableMentionsAvailable)?
            .unwrap_or(false))
    }

    /// Description of the day contestant ages are taken at.
    pub fn age_day_desc(&self) -> Result<Option<String>> {
        self.inherited(EventAttr::AgeDayDesc)
    }

    port_getters!(EventAttr {
        year: String = Year,
        host_country_id: Option<CountryId> = HostCountryId,
        host_country_name: Option<String> = HostCountryName,
        /// The host country's name as used after "in", e.g. "the Netherlands".
        host_country_name_in: Option<String> = HostCountryNameIn,
        host_city: Option<String> = HostCity,
        home_page_url: Option<String> = HomePageUrl,
        contact_name: Option<String> = ContactName,
        contact_email: Option<String> = ContactEmail,
        num_exams: Option<u32> = NumExams,
        num_problems: Option<u32> = NumProblems,
        /// Maximum mark on each problem, in problem order.
        marks_per_problem: Vec<i64> = MarksPerProblem,
        gold_boundary: Option<i64> = GoldBoundary,
        silver_boundary: Option<i64> = SilverBoundary,
        bronze_boundary: Option<i64> = BronzeBoundary,
        paper_list: Vec<Paper> = PaperList,
    });

    pub fn registration_active(&self) -> Result<bool> {
        Ok(self
            .attr::<Option<bool>>(EventAttr::RegistrationActive)?
            .unwrap_or(false))
    }

    pub fn event_type(&self) -> Result<Option<EventType>> {
        parse_text(
            self.attr(EventAttr::EventType)?,
            EventAttr::KIND,
            EventAttr::EventType.name(),
            "an event type",
        )
    }

    pub fn start_date(&self) -> Result<Option<NaiveDate>> {
        parse_date(self.attr(EventAttr::StartDate)?)
    }

    pub fn end_date(&self) -> Result<Option<NaiveDate>> {
        parse_date(self.attr(EventAttr::EndDate)?)
    }

    /// E.g. "XMO 2021".
    pub fn short_name_with_year(&self) -> Result<String> {
        Ok(format!("{} {}", self.short_name()?, self.year()?))
    }

    /// E.g. "XMO 2021 in Utopia".
    pub fn short_name_with_year_and_country(&self) -> Result<String> {
        let with_year = self.short_name_with_year()?;
        let country = match self.host_country_name_in()? {
            Some(name) => Some(name),
            None => self.host_country_name()?,
        };
        Ok(match country {
            Some(country) => format!("{} in {}", with_year, country),
            None => with_year,
        })
    }

    pub fn host_location(&self) -> Result<Option<String>> {
        Ok(match (self.host_city()?, self.host_country_name()?) {
            (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
            (None, country) => country,
            (city, None) => city,
        })
    }

    /// Name, email or both, e.g. "Jo Bloggs (jo@example.org)".
    pub fn contact(&self) -> Result<Option<String>> {
        Ok(match (self.contact_name()?, self.contact_email()?) {
            (Some(name), Some(email)) => Some(format!("{} ({})", name, email)),
            (None, email) => email,
            (name, None) => name,
        })
    }

    pub fn host_country(&self) -> Result<Option<Country<'g>>> {
        self.host_country_id()?
            .map(|id| self.group.country(id))
            .transpose()
    }

    pub(super) fn problem_count(&self) -> Result<usize> {
        let marks = self.marks_per_problem()?;
        if !marks.is_empty() {
            return Ok(marks.len());
        }
        Ok(self.num_problems()?.unwrap_or(0) as usize)
    }

    pub fn max_marks_per_problem(&self) -> Result<Option<i64>> {
        Ok(self.marks_per_problem()?.into_iter().max())
    }

    pub fn marks_total(&self) -> Result<i64> {
        Ok(self.marks_per_problem()?.iter().sum())
    }

    /// Scores are final once the gold boundary is known.
    pub fn scores_final(&self) -> Result<bool> {
        Ok(self.gold_boundary()?.is_some())
    }

    pub(super) fn medal_boundaries(&self) -> Result<Option<MedalBoundaries>> {
        let Some(gold) = self.gold_boundary()? else {
            return Ok(None);
        };
        Ok(Some(MedalBoundaries {
            gold,
            silver: self.silver_boundary()?.unwrap_or(i64::MAX),
            bronze: self.bronze_boundary()?.unwrap_or(i64::MAX),
        }))
    }

    /// Every participation at this edition, in store order.
    pub fn person_list(&self) -> Result<Vec<PersonEvent<'g>>> {
        Ok(self
            .record
            .people
            .values()?
            .iter()
            .flat_map(|records| records.iter().cloned())
            .map(|record| self.view_person(record))
            .collect())
    }

    /// The participations of one person: more than one only when they
    /// took part with several non-staff countries.
    pub fn person_events(&self, person_id: PersonId) -> Result<Vec<PersonEvent<'g>>> {
        Ok(self
            .record
            .people
            .get(person_id)?
            .map(|records| {
                records
                    .iter()
                    .map(|record| self.view_person(record.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// The participation of a person with one country.
    pub fn person_event(&self, person_id: PersonId, country_id: CountryId) -> Result<PersonEvent<'g>> {
        self.person_events(person_id)?
            .into_iter()
            .find(|p| p.country_id() == country_id)
            .ok_or(DataError::NotFound {
                kind: EntityKind::PersonEvent,
                id: person_id,
            })
    }

    pub fn contestant_list(&self) -> Result<Vec<PersonEvent<'g>>> {
        self.filtered_people(&self.record.contestants, PersonEvent::is_contestant)
    }

    /// Keeps the people for whom `keep` holds, filtering the full list
    /// only on the first call.
    fn filtered_people(
        &self,
        memo: &Memo<Vec<Rc<PersonEventRecord>>>,
        keep: impl Fn(&PersonEvent<'g>) -> Result<bool>,
    ) -> Result<Vec<PersonEvent<'g>>> {
        let records = memo.get_or_try_init(|| {
            let mut kept = Vec::new();
            for person in self.person_list()? {
                if keep(&person)? {
                    kept.push(person.record.clone());
                }
            }
            Ok(kept)
        })?;
        Ok(self.view_people(records))
    }

    fn view_people(&self, records: &[Rc<PersonEventRecord>]) -> Vec<PersonEvent<'g>> {
        records
            .iter()
            .map(|record| self.view_person(record.clone()))
            .collect()
    }

    pub fn num_contestants(&self) -> Result<usize> {
        Ok(self.contestant_list()?.len())
    }

    /// Contestants from official countries; `None` when the edition does
    /// not tell official countries apart.
    pub fn num_contestants_official(&self) -> Result<Option<usize>> {
        if !self.distinguish_official()? {
            return Ok(None);
        }
        let mut total = 0;
        for country in self.country_list()? {
            if country.is_official()? == Some(true) {
                total += country.num_contestants()?;
            }
        }
        Ok(Some(total))
    }

    /// People at the edition on behalf of a normal country.
    pub fn normal_person_list(&self) -> Result<Vec<PersonEvent<'g>>> {
        self.filtered_people(&self.record.normal_people, |person| {
            Ok(!person.is_staff()?)
        })
    }

    pub fn staff_list(&self) -> Result<Vec<PersonEvent<'g>>> {
        self.filtered_people(&self.record.staff, PersonEvent::is_staff)
    }

    /// People grouped by room number; people without a room are left out.
    pub fn room_groups(&self) -> Result<BTreeMap<String, Vec<PersonEvent<'g>>>> {
        let rooms = self.record.rooms.get_or_try_init(|| {
            let mut rooms: BTreeMap<String, Vec<Rc<PersonEventRecord>>> = BTreeMap::new();
            for person in self.person_list()? {
                if let Some(room) = person.room_number()? {
                    rooms.entry(room).or_default().push(person.record.clone());
                }
            }
            Ok(rooms)
        })?;
        Ok(rooms
            .iter()
            .map(|(room, records)| (room.clone(), self.view_people(records)))
            .collect())
    }

    /// Every language anyone at the edition listed, without repeats.
    pub fn language_list(&self) -> Result<Vec<String>> {
        let languages = self.record.languages.get_or_try_init(|| {
            let mut languages = Vec::new();
            for person in self.person_list()? {
                languages.extend(person.languages()?);
            }
            languages.sort_by_key(|language| (collation_key(language), language.clone()));
            languages.dedup();
            Ok(languages)
        })?;
        Ok(languages.clone())
    }

    pub fn country_list(&self) -> Result<Vec<CountryEvent<'g>>> {
        Ok(self
            .record
            .countries
            .values()?
            .into_iter()
            .map(|record| self.view_country(record))
            .collect())
    }

    pub fn country(&self, country_id: CountryId) -> Result<CountryEvent<'g>> {
        Ok(self.view_country(self.record.countries.require(country_id)?))
    }

    pub fn find_country(&self, country_id: CountryId) -> Result<Option<CountryEvent<'g>>> {
        Ok(self
            .record
            .countries
            .get(country_id)?
            .map(|record| self.view_country(record)))
    }

    /// Countries at the edition whose name is exactly `name`.
    pub(super) fn country_ids_named(&self, name: &str) -> Result<Vec<CountryId>> {
        let mut ids = Vec::new();
        for country in self.country_list()? {
            if country.name()? == name {
                ids.push(country.country_id());
            }
        }
        Ok(ids)
    }

    pub fn country_with_contestants_list(&self) -> Result<Vec<CountryEvent<'g>>> {
        let records = self.record.countries_with_contestants.get_or_try_init(|| {
            let mut countries = Vec::new();
            for country in self.country_list()? {
                if country.num_contestants()? > 0 {
                    countries.push(country.record.clone());
                }
            }
            Ok(countries)
        })?;
        Ok(records
            .iter()
            .map(|record| self.view_country(record.clone()))
            .collect())
    }

    pub fn num_countries(&self) -> Result<usize> {
        Ok(self.country_with_contestants_list()?.len())
    }

    /// Official countries with contestants; `None` when the edition does
    /// not tell official countries apart.
    pub fn num_countries_official(&self) -> Result<Option<usize>> {
        if !self.distinguish_official()? {
            return Ok(None);
        }
        let mut total = 0;
        for country in self.country_with_contestants_list()? {
            if country.is_official()? == Some(true) {
                total += 1;
            }
        }
        Ok(Some(total))
    }

    pub fn normal_country_list(&self) -> Result<Vec<CountryEvent<'g>>> {
        let mut countries = Vec::new();
        for country in self.country_list()? {
            if country.is_normal()? {
                countries.push(country);
            }
        }
        Ok(countries)
    }

    pub fn staff_country_list(&self) -> Result<Vec<CountryEvent<'g>>> {
        let mut countries = Vec::new();
        for country in self.country_list()? {
            if !country.is_normal()? {
                countries.push(country);
            }
        }
        Ok(countries)
    }

    /// Whether top-N truncation changes any country's ranking total.
    pub fn rank_top_n_matters(&self) -> Result<bool> {
        let Some(top_n) = self.rank_top_n()? else {
            return Ok(false);
        };
        for country in self.country_list()? {
            if country.num_contestants()? > top_n as usize {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn rank_top_n_if_matters(&self) -> Result<Option<u32>> {
        if self.rank_top_n_matters()? {
            self.rank_top_n()
        } else {
            Ok(None)
        }
    }

    pub fn sort_key(&self) -> EventId {
        self.record.id
    }
}

impl PartialEq for Event<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record.id == other.record.id
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event").field("id", &self.record.id).finish()
    }
}
