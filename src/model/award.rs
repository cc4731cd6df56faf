use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// An individual award, in order of precedence.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
pub enum Award {
    #[strum(serialize = "Gold Medal")]
    #[serde(rename = "Gold Medal")]
    Gold,
    #[strum(serialize = "Silver Medal")]
    #[serde(rename = "Silver Medal")]
    Silver,
    #[strum(serialize = "Bronze Medal")]
    #[serde(rename = "Bronze Medal")]
    Bronze,
    #[strum(serialize = "Honourable Mention")]
    #[serde(rename = "Honourable Mention")]
    HonourableMention,
}

impl Award {
    /// Band a total score against the medal boundaries.
    ///
    /// Below bronze, an honourable mention goes to anyone who scored full
    /// marks on at least one problem, if the edition gives them at all.
    pub fn derive(
        total: i64,
        boundaries: MedalBoundaries,
        honourable_mentions: bool,
        perfect_on_some_problem: bool,
    ) -> Option<Award> {
        if total >= boundaries.gold {
            Some(Award::Gold)
        } else if total >= boundaries.silver {
            Some(Award::Silver)
        } else if total >= boundaries.bronze {
            Some(Award::Bronze)
        } else if honourable_mentions && perfect_on_some_problem {
            Some(Award::HonourableMention)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedalBoundaries {
    pub gold: i64,
    pub silver: i64,
    pub bronze: i64,
}

/// How many of each award a contestant, country or edition received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AwardCounts {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub honourable_mention: u32,
}

impl AwardCounts {
    pub fn record(&mut self, award: Award) {
        match award {
            Award::Gold => self.gold += 1,
            Award::Silver => self.silver += 1,
            Award::Bronze => self.bronze += 1,
            Award::HonourableMention => self.honourable_mention += 1,
        }
    }

    pub fn get(&self, award: Award) -> u32 {
        match award {
            Award::Gold => self.gold,
            Award::Silver => self.silver,
            Award::Bronze => self.bronze,
            Award::HonourableMention => self.honourable_mention,
        }
    }

    pub fn medals(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }

    pub fn total(&self) -> u32 {
        self.medals() + self.honourable_mention
    }
}

impl std::ops::AddAssign for AwardCounts {
    fn add_assign(&mut self, other: Self) {
        self.gold += other.gold;
        self.silver += other.silver;
        self.bronze += other.bronze;
        self.honourable_mention += other.honourable_mention;
    }
}

impl FromIterator<Award> for AwardCounts {
    fn from_iter<I: IntoIterator<Item = Award>>(iter: I) -> Self {
        let mut counts = AwardCounts::default();
        for award in iter {
            counts.record(award);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    const BOUNDARIES: MedalBoundaries = MedalBoundaries {
        gold: 30,
        silver: 25,
        bronze: 20,
    };

    #[rstest]
    #[case(35, false, Some(Award::Gold))]
    #[case(30, false, Some(Award::Gold))]
    #[case(25, true, Some(Award::Silver))]
    #[case(22, true, Some(Award::Bronze))]
    #[case(20, false, Some(Award::Bronze))]
    #[case(19, true, Some(Award::HonourableMention))]
    #[case(19, false, None)]
    #[case(0, false, None)]
    fn bands_totals(#[case] total: i64, #[case] perfect: bool, #[case] expected: Option<Award>) {
        assert_eq!(Award::derive(total, BOUNDARIES, true, perfect), expected);
    }

    #[test]
    fn no_honourable_mentions_when_unavailable() {
        assert_eq!(Award::derive(12, BOUNDARIES, false, true), None);
    }

    #[rstest]
    #[case(Award::Gold, "Gold Medal")]
    #[case(Award::HonourableMention, "Honourable Mention")]
    fn display_names(#[case] award: Award, #[case] name: &str) {
        assert_eq!(award.to_string(), name);
        assert_eq!(Award::from_str(name), Ok(award));
    }

    #[test]
    fn counts_awards() {
        let mut counts: AwardCounts = [Award::Gold, Award::Bronze, Award::Gold].into_iter().collect();
        counts += AwardCounts {
            honourable_mention: 2,
            ..AwardCounts::default()
        };

        assert_eq!(counts.get(Award::Gold), 2);
        assert_eq!(counts.medals(), 3);
        assert_eq!(counts.total(), 5);
    }
}
