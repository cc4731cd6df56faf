use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::shared::{DataError, EntityKind, Result};

/// A closed set of attribute names for one entity kind.
///
/// Each set has a fixed snake_case string form; parsing any other name
/// fails with [`DataError::UnsupportedAttribute`].
pub trait Attribute: Copy + Eq + std::hash::Hash + AsRef<str> + FromStr {
    const KIND: EntityKind;

    fn name(&self) -> &str {
        self.as_ref()
    }

    fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| DataError::unsupported(Self::KIND, name))
    }
}

macro_rules! attribute_set {
    ($(#[$meta:meta])* $name:ident, $kind:expr, [$($variant:ident),* $(,)?]) => {
        $(#[$meta])*
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
            Deserialize,
            AsRefStr,
            Display,
            EnumIter,
            EnumString,
        )]
        #[serde(rename_all = "snake_case")]
        #[strum(serialize_all = "snake_case")]
        pub enum $name {
            $($variant),*
        }

        impl Attribute for $name {
            const KIND: EntityKind = $kind;
        }
    };
}

attribute_set!(
    /// Attributes of the whole event group.
    GroupAttr,
    EntityKind::Group,
    [
        ShortName,
        ShortNamePlural,
        LongName,
        DistinguishOfficial,
        RankTopN,
        HonourableMentionsAvailable,
        AgeDayDesc,
        EventIds,
        PersonIds,
        CountryIds,
    ]
);

attribute_set!(
    /// Attributes of one edition.
    EventAttr,
    EntityKind::Event,
    [
        ShortName,
        LongName,
        DistinguishOfficial,
        RankTopN,
        HonourableMentionsAvailable,
        AgeDayDesc,
        Year,
        HostCountryId,
        HostCountryName,
        HostCountryNameIn,
        HostCity,
        EventType,
        StartDate,
        EndDate,
        HomePageUrl,
        ContactName,
        ContactEmail,
        NumExams,
        NumProblems,
        MarksPerProblem,
        RegistrationActive,
        GoldBoundary,
        SilverBoundary,
        BronzeBoundary,
        PaperList,
        PersonIds,
        CountryIds,
    ]
);

attribute_set!(
    /// Attributes of one person's participation with one country.
    PersonEventAttr,
    EntityKind::PersonEvent,
    [
        AnnualUrl,
        PrimaryRole,
        OtherRoles,
        GuideFor,
        ContestantAge,
        GivenName,
        FamilyName,
        ProblemScores,
        TotalScore,
        Award,
        ExtraAwards,
        PhotoUrl,
        PhotoFilename,
        ConsentFormUrl,
        ConsentFormFilename,
        Languages,
        Diet,
        RoomType,
        RoomNumber,
        RoomShareWith,
        PhoneNumber,
        DateOfBirth,
        Gender,
        Tshirt,
        Nationality,
        PassportNumber,
        PassportGivenName,
        PassportFamilyName,
        ArrivalPlace,
        ArrivalDate,
        ArrivalTime,
        ArrivalFlight,
        DeparturePlace,
        DepartureDate,
        DepartureTime,
        DepartureFlight,
        RemoteParticipant,
        BasicDataMissing,
        GenericId,
    ]
);

attribute_set!(
    /// Attributes of one country's participation in one edition.
    CountryEventAttr,
    EntityKind::CountryEvent,
    [
        AnnualUrl,
        Code,
        Name,
        FlagUrl,
        FlagFilename,
        IsOfficial,
        IsNormal,
        ContactEmails,
        ExpectedLeaders,
        ExpectedDeputies,
        ExpectedContestants,
        ExpectedObserversA,
        ExpectedObserversB,
        ExpectedObserversC,
        ExpectedSingleRooms,
        ExpectedNumbersConfirmed,
        ParticipationType,
        GenericId,
        PersonIds,
        GuideIds,
    ]
);

impl EventAttr {
    /// The group-level attribute an edition inherits when the store does
    /// not provide this one per edition.
    pub fn group_default(self) -> Option<GroupAttr> {
        match self {
            EventAttr::ShortName => Some(GroupAttr::ShortName),
            EventAttr::LongName => Some(GroupAttr::LongName),
            EventAttr::DistinguishOfficial => Some(GroupAttr::DistinguishOfficial),
            EventAttr::RankTopN => Some(GroupAttr::RankTopN),
            EventAttr::HonourableMentionsAvailable => {
                Some(GroupAttr::HonourableMentionsAvailable)
            }
            EventAttr::AgeDayDesc => Some(GroupAttr::AgeDayDesc),
            _ => None,
        }
    }

    pub fn is_inheritable(self) -> bool {
        self.group_default().is_some()
    }
}

impl PersonEventAttr {
    /// Attributes a store may declare alongside values the model derives,
    /// so that the two can be cross-checked.
    pub fn is_cross_checked(self) -> bool {
        matches!(self, PersonEventAttr::TotalScore | PersonEventAttr::Award)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case("gold_boundary", EventAttr::GoldBoundary)]
    #[case("rank_top_n", EventAttr::RankTopN)]
    #[case("host_country_name_in", EventAttr::HostCountryNameIn)]
    fn parses_event_attribute_names(#[case] name: &str, #[case] expected: EventAttr) {
        assert_eq!(EventAttr::from_name(name), Ok(expected));
        assert_eq!(expected.name(), name);
    }

    #[test]
    fn rejects_names_outside_the_closed_set() {
        assert_eq!(
            PersonEventAttr::from_name("shoe_size"),
            Err(DataError::unsupported(EntityKind::PersonEvent, "shoe_size"))
        );
        assert!(CountryEventAttr::from_name("Code").is_err());
    }

    #[test]
    fn every_name_round_trips() {
        for attr in CountryEventAttr::iter() {
            assert_eq!(CountryEventAttr::from_name(attr.name()), Ok(attr));
        }
    }

    #[test]
    fn only_group_wide_settings_are_inheritable() {
        let inheritable: Vec<EventAttr> =
            EventAttr::iter().filter(|a| a.is_inheritable()).collect();
        assert_eq!(
            inheritable,
            vec![
                EventAttr::ShortName,
                EventAttr::LongName,
                EventAttr::DistinguishOfficial,
                EventAttr::RankTopN,
                EventAttr::HonourableMentionsAvailable,
                EventAttr::AgeDayDesc,
            ]
        );
    }
}
