use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

const CONTESTANT_PREFIX: &str = "Contestant ";

/// The contestant slot suffix of a role such as `"Contestant 3"`, or
/// `None` for any other role.
pub fn contestant_suffix(role: &str) -> Option<&str> {
    role.strip_prefix(CONTESTANT_PREFIX)
}

pub fn is_contestant_role(role: &str) -> bool {
    contestant_suffix(role).is_some()
}

/// How an edition, or one country's participation in it, takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    InPerson,
    Hybrid,
    Virtual,
}

/// Country-level participation mode; `Hybrid` only makes sense at a
/// hybrid edition.
pub type ParticipationType = EventType;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Contestant 1", Some("1"))]
    #[case("Contestant 12", Some("12"))]
    #[case("Leader", None)]
    #[case("Contestant", None)]
    #[case("Deputy Leader", None)]
    fn recognises_contestant_slots(#[case] role: &str, #[case] suffix: Option<&str>) {
        assert_eq!(contestant_suffix(role), suffix);
        assert_eq!(is_contestant_role(role), suffix.is_some());
    }

    #[test]
    fn parses_event_types() {
        assert_eq!("in-person".parse::<EventType>(), Ok(EventType::InPerson));
        assert_eq!(EventType::Virtual.to_string(), "virtual");
        assert!("online".parse::<EventType>().is_err());
    }
}
