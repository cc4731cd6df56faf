use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;
use tracing::debug;

use super::event::EventRecord;
use super::{
    collation_key, contestant_suffix, parse_date, whole_years_between, Award, CountryEvent,
    Event, EventGroup, Person,
};
use crate::cache::{AttrCache, Memo};
use crate::source::{
    AttrValue, Attribute, CountryEventAttr, DataSource, FromAttr, PersonEventAttr, PersonEventKey,
};
use crate::shared::{CountryId, DataError, EntityKind, EventId, PersonId, Result};

/// Sort key: edition, country code, role, family name, given name,
/// country id, person id.
pub type PersonEventSortKey = (EventId, String, String, String, String, CountryId, PersonId);

/// Everything cached for one participation.
pub(super) struct PersonEventRecord {
    pub(super) key: PersonEventKey,
    /// Staff countries whose roles were folded into this record
    pub(super) folded_staff: Vec<CountryId>,
    attrs: AttrCache<PersonEventAttr>,
    other_roles: Memo<Vec<String>>,
    guide_for: Memo<Vec<CountryId>>,
    total_score: Memo<i64>,
    award: Memo<Option<Award>>,
}

impl PersonEventRecord {
    fn new(key: PersonEventKey, folded_staff: Vec<CountryId>) -> Self {
        Self {
            key,
            folded_staff,
            attrs: AttrCache::new(),
            other_roles: Memo::new(),
            guide_for: Memo::new(),
            total_score: Memo::new(),
            award: Memo::new(),
        }
    }

    /// Builds the records for one person at one edition.
    ///
    /// There is one record per non-staff country. Staff participations
    /// become extra roles on the first non-staff record, or on the first
    /// staff record if the person only came as staff.
    pub(super) fn build_all(
        source: &dyn DataSource,
        person_id: PersonId,
        event_id: EventId,
    ) -> Result<Vec<Rc<PersonEventRecord>>> {
        let mut country_ids = source.person_event_country_ids(person_id, event_id)?;
        let mut seen = HashSet::with_capacity(country_ids.len());
        for &country_id in &country_ids {
            if !seen.insert(country_id) {
                return Err(DataError::DuplicateParticipation {
                    person_id,
                    event_id,
                    country_id,
                });
            }
        }
        country_ids.sort_unstable();

        let mut normal = Vec::new();
        let mut staff = Vec::new();
        for country_id in country_ids {
            let is_normal: Option<bool> = source
                .country_event_attr(country_id, event_id, CountryEventAttr::IsNormal)?
                .into_typed(CountryEventAttr::KIND, CountryEventAttr::IsNormal.name())?;
            if is_normal.unwrap_or(true) {
                normal.push(country_id);
            } else {
                staff.push(country_id);
            }
        }
        if normal.is_empty() {
            normal = staff.drain(..staff.len().min(1)).collect();
        }
        if !staff.is_empty() {
            debug!(person_id, event_id, staff = ?staff, "Folding staff roles into participation");
        }

        let mut folded = Some(staff);
        Ok(normal
            .into_iter()
            .map(|country_id| {
                let key = PersonEventKey::new(person_id, event_id, country_id);
                Rc::new(PersonEventRecord::new(key, folded.take().unwrap_or_default()))
            })
            .collect())
    }
}

/// One person's participation in one edition, with one country.
#[derive(Clone)]
pub struct PersonEvent<'g> {
    group: &'g EventGroup,
    event: Rc<EventRecord>,
    pub(super) record: Rc<PersonEventRecord>,
}

impl<'g> PersonEvent<'g> {
    pub(super) fn new(
        group: &'g EventGroup,
        event: Rc<EventRecord>,
        record: Rc<PersonEventRecord>,
    ) -> Self {
        Self {
            group,
            event,
            record,
        }
    }

    pub fn key(&self) -> PersonEventKey {
        self.record.key
    }

    pub fn person_id(&self) -> PersonId {
        self.record.key.person_id
    }

    pub fn event_id(&self) -> EventId {
        self.record.key.event_id
    }

    pub fn country_id(&self) -> CountryId {
        self.record.key.country_id
    }

    pub fn event(&self) -> Event<'g> {
        Event::new(self.group, self.event.clone())
    }

    pub fn person(&self) -> Result<Person<'g>> {
        self.group.person(self.person_id())
    }

    pub fn country(&self) -> Result<CountryEvent<'g>> {
        self.event().country(self.country_id())
    }

    fn attr<T: FromAttr>(&self, attr: PersonEventAttr) -> Result<T> {
        self.record
            .attrs
            .typed(attr, || self.group.source().person_event_attr(self.key(), attr))
    }

    fn not_contestant(&self) -> DataError {
        DataError::NotContestant {
            person_id: self.person_id(),
            event_id: self.event_id(),
        }
    }

    fn require_contestant(&self) -> Result<()> {
        if self.is_contestant()? {
            Ok(())
        } else {
            Err(self.not_contestant())
        }
    }

    port_getters!(PersonEventAttr {
        /// This person's page in the edition's registration system.
        annual_url: Option<String> = AnnualUrl,
        primary_role: String = PrimaryRole,
        given_name: String = GivenName,
        family_name: String = FamilyName,
        /// Scores on each problem; `None` where not yet known.
        problem_scores: Vec<Option<i64>> = ProblemScores,
        extra_awards: Vec<String> = ExtraAwards,
        photo_url: Option<String> = PhotoUrl,
        photo_filename: Option<String> = PhotoFilename,
        consent_form_url: Option<String> = ConsentFormUrl,
        consent_form_filename: Option<String> = ConsentFormFilename,
        languages: Vec<String> = Languages,
        diet: Option<String> = Diet,
        room_type: Option<String> = RoomType,
        room_number: Option<String> = RoomNumber,
        room_share_with: Option<String> = RoomShareWith,
        phone_number: Option<String> = PhoneNumber,
        gender: Option<String> = Gender,
        tshirt: Option<String> = Tshirt,
        nationality: Option<String> = Nationality,
        passport_number: Option<String> = PassportNumber,
        passport_given_name: Option<String> = PassportGivenName,
        passport_family_name: Option<String> = PassportFamilyName,
        arrival_place: Option<String> = ArrivalPlace,
        arrival_time: Option<String> = ArrivalTime,
        arrival_flight: Option<String> = ArrivalFlight,
        departure_place: Option<String> = DeparturePlace,
        departure_time: Option<String> = DepartureTime,
        departure_flight: Option<String> = DepartureFlight,
        generic_id: Option<u32> = GenericId,
    });

    pub fn name(&self) -> Result<String> {
        Ok(format!("{} {}", self.given_name()?, self.family_name()?))
    }

    pub fn date_of_birth(&self) -> Result<Option<NaiveDate>> {
        parse_date(self.attr(PersonEventAttr::DateOfBirth)?)
    }

    pub fn arrival_date(&self) -> Result<Option<NaiveDate>> {
        parse_date(self.attr(PersonEventAttr::ArrivalDate)?)
    }

    pub fn departure_date(&self) -> Result<Option<NaiveDate>> {
        parse_date(self.attr(PersonEventAttr::DepartureDate)?)
    }

    pub fn remote_participant(&self) -> Result<bool> {
        Ok(self
            .attr::<Option<bool>>(PersonEventAttr::RemoteParticipant)?
            .unwrap_or(false))
    }

    pub fn basic_data_missing(&self) -> Result<bool> {
        Ok(self
            .attr::<Option<bool>>(PersonEventAttr::BasicDataMissing)?
            .unwrap_or(false))
    }

    /// Roles other than the primary one, including the roles of any staff
    /// participation folded into this one.
    pub fn other_roles(&self) -> Result<Vec<String>> {
        let roles = self.record.other_roles.get_or_try_init(|| {
            let mut roles: Vec<String> = self.attr(PersonEventAttr::OtherRoles)?;
            let source = self.group.source();
            for &country_id in &self.record.folded_staff {
                let key = PersonEventKey::new(self.person_id(), self.event_id(), country_id);
                let primary: String = source
                    .person_event_attr(key, PersonEventAttr::PrimaryRole)?
                    .into_typed(PersonEventAttr::KIND, PersonEventAttr::PrimaryRole.name())?;
                let others: Vec<String> = source
                    .person_event_attr(key, PersonEventAttr::OtherRoles)?
                    .into_typed(PersonEventAttr::KIND, PersonEventAttr::OtherRoles.name())?;
                for role in std::iter::once(primary).chain(others) {
                    if !roles.contains(&role) {
                        roles.push(role);
                    }
                }
            }
            Ok(roles)
        })?;
        Ok(roles.clone())
    }

    /// Countries this person guided, including those guided under a folded
    /// staff participation.
    ///
    /// Stores may list guided countries by id or by name; a name must match
    /// exactly one country at the edition.
    pub fn guide_for(&self) -> Result<Vec<CountryEvent<'g>>> {
        let ids = self.record.guide_for.get_or_try_init(|| {
            let mut ids = self.resolve_guide_for(self.key())?;
            for &country_id in &self.record.folded_staff {
                let key = PersonEventKey::new(self.person_id(), self.event_id(), country_id);
                for id in self.resolve_guide_for(key)? {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
            Ok(ids)
        })?;
        let event = self.event();
        ids.iter().map(|&id| event.country(id)).collect()
    }

    pub(super) fn guides_country(&self, country_id: CountryId) -> Result<bool> {
        self.guide_for()?;
        Ok(self
            .record
            .guide_for
            .get()
            .is_some_and(|ids| ids.contains(&country_id)))
    }

    fn resolve_guide_for(&self, key: PersonEventKey) -> Result<Vec<CountryId>> {
        let raw = if key == self.key() {
            self.record
                .attrs
                .get_or_fetch(PersonEventAttr::GuideFor, || {
                    self.group.source().person_event_attr(key, PersonEventAttr::GuideFor)
                })?
        } else {
            self.group
                .source()
                .person_event_attr(key, PersonEventAttr::GuideFor)?
        };

        match raw {
            AttrValue::Absent => Ok(Vec::new()),
            AttrValue::IdList(ids) => Ok(ids),
            AttrValue::TextList(names) => {
                let event = self.event();
                let mut ids = Vec::with_capacity(names.len());
                for name in names {
                    let matches = event.country_ids_named(&name)?;
                    match matches.as_slice() {
                        [id] => ids.push(*id),
                        _ => {
                            return Err(DataError::CountryName {
                                event_id: self.event_id(),
                                name,
                                matches: matches.len(),
                            })
                        }
                    }
                }
                Ok(ids)
            }
            _ => Err(DataError::AttributeType {
                kind: EntityKind::PersonEvent,
                name: PersonEventAttr::GuideFor.name().to_string(),
                expected: "a list of country ids or names",
            }),
        }
    }

    pub fn is_contestant(&self) -> Result<bool> {
        Ok(contestant_suffix(&self.primary_role()?).is_some())
    }

    /// Staff are people attending on behalf of a country that is not a
    /// normal country.
    pub fn is_staff(&self) -> Result<bool> {
        Ok(!self.country()?.is_normal()?)
    }

    /// Country code followed by contestant number, e.g. "ABC3".
    pub fn contestant_code(&self) -> Result<String> {
        let role = self.primary_role()?;
        let suffix = contestant_suffix(&role).ok_or_else(|| self.not_contestant())?;
        Ok(format!("{}{}", self.country()?.code()?, suffix))
    }

    /// Age as recorded by the store, else completed years from date of
    /// birth to the start of the edition.
    pub fn contestant_age(&self) -> Result<Option<u32>> {
        if let Some(age) = self.attr::<Option<u32>>(PersonEventAttr::ContestantAge)? {
            return Ok(Some(age));
        }
        let (Some(born), Some(start)) = (self.date_of_birth()?, self.event().start_date()?) else {
            return Ok(None);
        };
        Ok(whole_years_between(born, start))
    }

    /// Sum of the known problem scores.
    ///
    /// Fails if the store declares a different total.
    pub fn total_score(&self) -> Result<i64> {
        self.record
            .total_score
            .get_or_try_init(|| {
                self.require_contestant()?;
                let computed: i64 = self.problem_scores()?.into_iter().flatten().sum();
                let source = self.group.source();
                if source.person_event_have_attr(self.key(), PersonEventAttr::TotalScore) {
                    let declared: Option<i64> = self.attr(PersonEventAttr::TotalScore)?;
                    if let Some(declared) = declared.filter(|&d| d != computed) {
                        return Err(DataError::TotalScoreMismatch {
                            person_id: self.person_id(),
                            event_id: self.event_id(),
                            declared,
                            computed,
                        });
                    }
                }
                Ok(computed)
            })
            .copied()
    }

    /// Total counting every unknown score as full marks.
    pub fn max_total_score(&self) -> Result<i64> {
        self.require_contestant()?;
        let marks = self.event().marks_per_problem()?;
        let scores = self.problem_scores()?;
        Ok((0..marks.len().max(scores.len()))
            .map(|n| match scores.get(n).copied().flatten() {
                Some(score) => score,
                None => marks.get(n).copied().unwrap_or(0),
            })
            .sum())
    }

    pub fn have_any_scores(&self) -> Result<bool> {
        Ok(self.problem_scores()?.iter().any(Option::is_some))
    }

    /// The award derived from the medal boundaries; `None` until scores are
    /// final.
    ///
    /// Fails if the store declares a different award.
    pub fn award(&self) -> Result<Option<Award>> {
        self.record
            .award
            .get_or_try_init(|| {
                self.require_contestant()?;
                let event = self.event();
                let Some(boundaries) = event.medal_boundaries()? else {
                    return Ok(None);
                };

                let marks = event.marks_per_problem()?;
                let perfect = self
                    .problem_scores()?
                    .iter()
                    .zip(&marks)
                    .any(|(score, max)| *score == Some(*max));
                let computed = Award::derive(
                    self.total_score()?,
                    boundaries,
                    event.honourable_mentions_available()?,
                    perfect,
                );

                let source = self.group.source();
                if source.person_event_have_attr(self.key(), PersonEventAttr::Award) {
                    let declared: Option<String> = self.attr(PersonEventAttr::Award)?;
                    let computed_name = computed.map(|award| award.to_string());
                    if declared != computed_name {
                        return Err(DataError::AwardMismatch {
                            person_id: self.person_id(),
                            event_id: self.event_id(),
                            declared,
                            computed: computed_name,
                        });
                    }
                }
                Ok(computed)
            })
            .copied()
    }

    /// The award followed by any extra awards, comma separated.
    pub fn awards_str(&self) -> Result<String> {
        let mut awards = Vec::new();
        if self.is_contestant()? {
            if let Some(award) = self.award()? {
                awards.push(award.to_string());
            }
        }
        awards.extend(self.extra_awards()?);
        Ok(awards.join(", "))
    }

    pub fn rank(&self) -> Result<u32> {
        self.require_contestant()?;
        self.event()
            .compute_all_ranks()?
            .contestants
            .rank(&self.key())
            .ok_or_else(|| self.not_contestant())
    }

    /// Rank among contestants from official countries; `None` for
    /// unofficial countries or when the edition does not distinguish them.
    pub fn rank_official(&self) -> Result<Option<u32>> {
        self.require_contestant()?;
        Ok(self
            .event()
            .compute_all_ranks()?
            .contestants
            .rank_official(&self.key()))
    }

    pub fn sort_key(&self) -> Result<PersonEventSortKey> {
        Ok((
            self.event_id(),
            collation_key(&self.country()?.code()?),
            collation_key(&self.primary_role()?),
            collation_key(&self.family_name()?),
            collation_key(&self.given_name()?),
            self.country_id(),
            self.person_id(),
        ))
    }

    /// Orders contestants by contestant number for exam seating.
    pub fn sort_key_exams(&self) -> Result<(EventId, String, String, PersonId)> {
        Ok((
            self.event_id(),
            collation_key(&self.primary_role()?),
            collation_key(&self.country()?.code()?),
            self.person_id(),
        ))
    }
}

impl PartialEq for PersonEvent<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record.key == other.record.key
    }
}

impl fmt::Debug for PersonEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonEvent")
            .field("key", &self.record.key)
            .field("folded_staff", &self.record.folded_staff)
            .finish()
    }
}
