#![allow(dead_code)] // Test utilities may not all be used in every test

use olympiad_data::{
    CountryEventAttr, CountryRow, EventGroup, EventRow, GroupConfig, MemorySource,
    PersonEventAttr, PersonRow,
};

// ============================================================================
// Data Source Builder
// ============================================================================

/// Builds a [`MemorySource`] edition by edition.
///
/// Events get the year `2000 + id`. Contestants are added with a slot number
/// and per-problem scores; their names are derived from their person id.
pub struct SourceBuilder {
    source: MemorySource,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::with_config(GroupConfig::default())
    }

    pub fn with_config(config: GroupConfig) -> Self {
        Self {
            source: MemorySource::new(config),
        }
    }

    pub fn event_row(mut self, row: EventRow) -> Self {
        self.source.add_event(row).unwrap();
        self
    }

    /// An edition with the given per-problem maxima.
    pub fn event(self, event_id: u32, marks_per_problem: Vec<i64>) -> Self {
        let year = (2000 + event_id).to_string();
        self.event_row(EventRow::new(event_id).with_problems(&year, marks_per_problem))
    }

    /// An edition with final scores.
    pub fn final_event(
        self,
        event_id: u32,
        marks_per_problem: Vec<i64>,
        (gold, silver, bronze): (i64, i64, i64),
    ) -> Self {
        let year = (2000 + event_id).to_string();
        self.event_row(
            EventRow::new(event_id)
                .with_problems(&year, marks_per_problem)
                .with_boundaries(gold, silver, bronze),
        )
    }

    pub fn country_row(mut self, row: CountryRow) -> Self {
        self.source.add_country(row).unwrap();
        self
    }

    pub fn country(self, event_id: u32, country_id: u32, code: &str, name: &str) -> Self {
        self.country_row(CountryRow::new(event_id, country_id, code, name))
    }

    pub fn official_country(
        self,
        event_id: u32,
        country_id: u32,
        code: &str,
        name: &str,
        official: bool,
    ) -> Self {
        self.country_row(
            CountryRow::new(event_id, country_id, code, name)
                .with(CountryEventAttr::IsOfficial, official),
        )
    }

    pub fn staff_country(self, event_id: u32, country_id: u32, name: &str) -> Self {
        self.country_row(
            CountryRow::new(event_id, country_id, "STF", name)
                .with(CountryEventAttr::IsNormal, false),
        )
    }

    pub fn person_row(mut self, row: PersonRow) -> Self {
        self.source.add_person(row).unwrap();
        self
    }

    pub fn contestant(
        self,
        event_id: u32,
        person_id: u32,
        country_id: u32,
        slot: u32,
        scores: Vec<Option<i64>>,
    ) -> Self {
        let role = format!("Contestant {}", slot);
        self.person_row(
            PersonRow::new(
                event_id,
                person_id,
                country_id,
                &format!("Given{}", person_id),
                &format!("Family{}", person_id),
                &role,
            )
            .with_scores(scores),
        )
    }

    /// Contestants with one score each, on a single-problem edition.
    pub fn contestants_with_totals(
        mut self,
        event_id: u32,
        country_id: u32,
        first_person_id: u32,
        totals: &[i64],
    ) -> Self {
        for (i, total) in totals.iter().enumerate() {
            self = self.contestant(
                event_id,
                first_person_id + i as u32,
                country_id,
                i as u32 + 1,
                vec![Some(*total)],
            );
        }
        self
    }

    pub fn staff(self, event_id: u32, person_id: u32, country_id: u32, role: &str) -> Self {
        self.person_row(PersonRow::new(
            event_id,
            person_id,
            country_id,
            &format!("Given{}", person_id),
            &format!("Family{}", person_id),
            role,
        ))
    }

    pub fn guide(
        self,
        event_id: u32,
        person_id: u32,
        country_id: u32,
        guide_for: Vec<&str>,
    ) -> Self {
        self.person_row(
            PersonRow::new(
                event_id,
                person_id,
                country_id,
                &format!("Given{}", person_id),
                &format!("Family{}", person_id),
                "Guide",
            )
            .with(PersonEventAttr::GuideFor, guide_for),
        )
    }

    pub fn build(self) -> MemorySource {
        self.source
    }

    pub fn group(self) -> EventGroup {
        EventGroup::new(self.source)
    }
}
