use tracing::debug;

use super::{AwardCounts, Event, PersonEvent};
use crate::source::PersonEventKey;
use crate::shared::{CountryId, Result};
use crate::stats::{corr_coeff, dense_ranks, histogram, mean_std_dev, MeanStdDev, Rankings};

/// Every rank at one edition, computed in a single pass.
///
/// Countries without contestants have no rank at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRankings {
    pub contestants: Rankings<PersonEventKey>,
    pub countries: Rankings<CountryId>,
}

impl<'g> Event<'g> {
    /// Ranks every contestant and every country with contestants.
    ///
    /// Runs once per edition; individual `rank` getters read from the
    /// result.
    pub fn compute_all_ranks(&self) -> Result<&EventRankings> {
        self.record.rankings.get_or_try_init(|| {
            let distinguish = self.distinguish_official()?;

            let mut contestants = Vec::new();
            let mut official_contestants = Vec::new();
            for person in self.contestant_list()? {
                let entry = (person.key(), person.total_score()?);
                if distinguish && person.country()?.is_official()? == Some(true) {
                    official_contestants.push(entry);
                }
                contestants.push(entry);
            }

            let mut countries = Vec::new();
            let mut official_countries = Vec::new();
            for country in self.country_with_contestants_list()? {
                let entry = (country.country_id(), country.total_score_for_rank()?);
                if distinguish && country.is_official()? == Some(true) {
                    official_countries.push(entry);
                }
                countries.push(entry);
            }

            debug!(
                event_id = self.id(),
                contestants = contestants.len(),
                countries = countries.len(),
                "Computed edition rankings"
            );
            Ok(EventRankings {
                contestants: Rankings {
                    all: dense_ranks(contestants),
                    official: dense_ranks(official_contestants),
                },
                countries: Rankings {
                    all: dense_ranks(countries),
                    official: dense_ranks(official_countries),
                },
            })
        })
    }

    /// Award totals; `None` until scores are final.
    pub fn num_awards(&self) -> Result<Option<AwardCounts>> {
        if !self.scores_final()? {
            return Ok(None);
        }
        self.count_awards(self.contestant_list()?).map(Some)
    }

    /// Award totals for official countries; `None` until scores are final
    /// or when the edition does not tell official countries apart.
    pub fn num_awards_official(&self) -> Result<Option<AwardCounts>> {
        if !self.scores_final()? || !self.distinguish_official()? {
            return Ok(None);
        }
        self.count_awards(self.official_contestants()?).map(Some)
    }

    fn count_awards(&self, contestants: Vec<PersonEvent<'g>>) -> Result<AwardCounts> {
        let mut counts = AwardCounts::default();
        for person in contestants {
            if let Some(award) = person.award()? {
                counts.record(award);
            }
        }
        Ok(counts)
    }

    fn official_contestants(&self) -> Result<Vec<PersonEvent<'g>>> {
        let mut official = Vec::new();
        for person in self.contestant_list()? {
            if person.country()?.is_official()? == Some(true) {
                official.push(person);
            }
        }
        Ok(official)
    }

    /// For each problem, how many contestants received each score:
    /// `problem_stats()[n][s]` counts score `s` on problem `n + 1`.
    pub fn problem_stats(&self) -> Result<Vec<Vec<u32>>> {
        let stats = self.record.problem_stats.get_or_try_init(|| {
            let marks = self.marks_per_problem()?;
            let contestants = self.contestant_list()?;
            let mut scores: Vec<Vec<i64>> = vec![Vec::new(); self.problem_count()?];
            for person in &contestants {
                for (n, score) in person.problem_scores()?.into_iter().enumerate() {
                    if let (Some(score), Some(column)) = (score, scores.get_mut(n)) {
                        column.push(score);
                    }
                }
            }
            debug!(event_id = self.id(), contestants = contestants.len(), "Computed problem statistics");
            scores
                .into_iter()
                .enumerate()
                .map(|(n, column)| histogram(column, marks.get(n).copied().unwrap_or(0)))
                .collect()
        })?;
        Ok(stats.clone())
    }

    /// How many contestants received each total score.
    pub fn total_stats(&self) -> Result<Vec<u32>> {
        self.total_histogram(self.contestant_list()?, |p| p.total_score())
    }

    pub fn total_stats_official(&self) -> Result<Option<Vec<u32>>> {
        if !self.distinguish_official()? {
            return Ok(None);
        }
        self.total_histogram(self.official_contestants()?, |p| p.total_score())
            .map(Some)
    }

    /// Like [`Event::total_stats`], counting each missing score as full
    /// marks.
    pub fn max_total_stats(&self) -> Result<Vec<u32>> {
        self.total_histogram(self.contestant_list()?, |p| p.max_total_score())
    }

    pub fn max_total_stats_official(&self) -> Result<Option<Vec<u32>>> {
        if !self.distinguish_official()? {
            return Ok(None);
        }
        self.total_histogram(self.official_contestants()?, |p| p.max_total_score())
            .map(Some)
    }

    fn total_histogram(
        &self,
        contestants: Vec<PersonEvent<'g>>,
        total: impl Fn(&PersonEvent<'g>) -> Result<i64>,
    ) -> Result<Vec<u32>> {
        let totals = contestants
            .iter()
            .map(total)
            .collect::<Result<Vec<_>>>()?;
        histogram(totals, self.marks_total()?)
    }

    /// Mean and spread of each problem over contestants with a known
    /// score on it.
    pub fn problem_mean_std_dev(&self) -> Result<Vec<Option<MeanStdDev>>> {
        let columns = self.score_columns()?;
        Ok(columns
            .iter()
            .map(|column| mean_std_dev(column.iter().copied()))
            .collect())
    }

    pub fn total_mean_std_dev(&self) -> Result<Option<MeanStdDev>> {
        let mut totals = Vec::new();
        for person in self.contestant_list()? {
            totals.push(Some(person.total_score()?));
        }
        Ok(mean_std_dev(totals))
    }

    /// Correlation of each problem's score with the total score.
    pub fn problem_corr_with_total(&self) -> Result<Vec<Option<f64>>> {
        let columns = self.score_columns()?;
        let mut totals = Vec::new();
        for person in self.contestant_list()? {
            totals.push(Some(person.total_score()?));
        }
        Ok(columns
            .iter()
            .map(|column| corr_coeff(column.iter().copied().zip(totals.iter().copied())))
            .collect())
    }

    /// Correlation between each pair of problems: `problem_corr()[a][b]`.
    pub fn problem_corr(&self) -> Result<Vec<Vec<Option<f64>>>> {
        let columns = self.score_columns()?;
        Ok(columns
            .iter()
            .map(|a| {
                columns
                    .iter()
                    .map(|b| corr_coeff(a.iter().copied().zip(b.iter().copied())))
                    .collect()
            })
            .collect())
    }

    /// Per-problem scores, one column per problem and one row per
    /// contestant in contestant-list order.
    fn score_columns(&self) -> Result<Vec<Vec<Option<i64>>>> {
        let contestants = self.contestant_list()?;
        let mut columns = vec![Vec::with_capacity(contestants.len()); self.problem_count()?];
        for person in &contestants {
            let scores = person.problem_scores()?;
            for (n, column) in columns.iter_mut().enumerate() {
                column.push(scores.get(n).copied().flatten());
            }
        }
        Ok(columns)
    }
}
