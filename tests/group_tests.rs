use chrono::NaiveDate;
use olympiad_data::{
    DataError, EntityKind, EventAttr, EventGroup, EventRow, EventType, GroupConfig, MemorySource,
    Paper,
};

mod utils;

use utils::*;

fn three_editions() -> EventGroup {
    SourceBuilder::new()
        .event(3, vec![7, 7, 7])
        .event(1, vec![7, 7, 7, 7, 7, 7])
        .event(2, vec![7, 7, 7])
        .country(1, 10, "ABC", "Atlantis")
        .country(2, 10, "ABC", "Atlantis")
        .country(3, 10, "ABN", "New Atlantis")
        .contestant(1, 100, 10, 1, vec![Some(7); 6])
        .contestant(2, 100, 10, 1, vec![Some(7); 3])
        .staff(3, 100, 10, "Deputy Leader")
        .staff(3, 101, 10, "Leader")
        .group()
}

#[test]
fn test_event_list_is_chronological() {
    init_tracing();
    let group = three_editions();

    let ids: Vec<u32> = group.event_list().unwrap().iter().map(|e| e.id()).collect();

    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(group.max_num_problems().unwrap(), Some(6));
    assert_eq!(group.person_event_list().unwrap().len(), 4);
    assert_eq!(group.country_event_list().unwrap().len(), 3);
}

#[test]
fn test_lookups_report_missing_entities() {
    let group = three_editions();

    assert_eq!(
        group.event(99).unwrap_err(),
        DataError::NotFound {
            kind: EntityKind::Event,
            id: 99
        }
    );
    assert_eq!(group.find_event(99).unwrap(), None);
    assert!(group.find_person(100).unwrap().is_some());
    assert!(matches!(
        group.country(42),
        Err(DataError::NotFound {
            kind: EntityKind::Country,
            ..
        })
    ));
    assert!(matches!(
        group.event(1).unwrap().country(42),
        Err(DataError::NotFound {
            kind: EntityKind::CountryEvent,
            ..
        })
    ));
}

#[test]
fn test_lookups_return_the_same_entity() {
    let group = three_editions();

    assert_eq!(group.event(2).unwrap(), group.event(2).unwrap());
    assert_eq!(group.person(100).unwrap(), group.person(100).unwrap());
    assert_ne!(group.event(1).unwrap(), group.event(2).unwrap());

    let first = group.event(2).unwrap().person_event(100, 10).unwrap();
    let again = group.person(100).unwrap().participation_list().unwrap()[1].clone();
    assert_eq!(first, again);
}

#[test]
fn test_contestants_are_people_who_competed() {
    let group = three_editions();

    let people = group.person_list().unwrap();
    let contestants = group.contestant_list().unwrap();

    assert_eq!(people.len(), 2);
    assert_eq!(contestants.len(), 1);
    assert_eq!(contestants[0].id(), 100);
    assert_eq!(contestants[0].num_participations().unwrap(), 2);
}

#[test]
fn test_country_details_come_from_latest_participation() {
    let group = three_editions();
    let country = group.country(10).unwrap();

    assert_eq!(country.num_participations().unwrap(), 3);
    assert_eq!(country.code().unwrap(), "ABN");
    assert_eq!(country.name_with_code().unwrap(), "New Atlantis (ABN)");
    assert_eq!(country.max_num_problems().unwrap(), Some(6));
}

#[test]
fn test_editions_inherit_group_settings() {
    let config = GroupConfig {
        short_name: "XMO".to_string(),
        rank_top_n: Some(3),
        ..GroupConfig::default()
    };
    let group = SourceBuilder::with_config(config)
        .event(1, vec![7])
        .event_row(
            EventRow::new(2)
                .with_problems("2002", vec![7])
                .with(EventAttr::ShortName, "EGMO")
                .with(EventAttr::RankTopN, Option::<u32>::None),
        )
        .group();
    let first = group.event(1).unwrap();
    let second = group.event(2).unwrap();

    assert_eq!(group.short_name().unwrap(), "XMO");
    assert_eq!(group.short_name_plural().unwrap(), "XMOs");
    assert_eq!(first.short_name().unwrap(), "XMO");
    assert_eq!(second.short_name().unwrap(), "EGMO");
    assert_eq!(first.rank_top_n().unwrap(), Some(3));
    assert_eq!(second.rank_top_n().unwrap(), None);
    assert!(group.rank_top_n_varies().unwrap());
    assert!(!group.distinguish_official_varies().unwrap());
    assert!(!group.honourable_mentions_available_varies().unwrap());
}

#[test]
fn test_edition_descriptions() {
    let group = SourceBuilder::new()
        .event_row(
            EventRow::new(1)
                .with_problems("2021", vec![7, 7, 7])
                .with(EventAttr::HostCountryName, "Utopia")
                .with(EventAttr::HostCity, "Capital City")
                .with(EventAttr::ContactName, "Jo Bloggs")
                .with(EventAttr::ContactEmail, "jo@example.org"),
        )
        .event_row(
            EventRow::new(2)
                .with_problems("2022", vec![7, 7, 7])
                .with(EventAttr::HostCountryName, "Netherlands")
                .with(EventAttr::HostCountryNameIn, "the Netherlands")
                .with(EventAttr::ContactEmail, "info@example.org"),
        )
        .group();
    let first = group.event(1).unwrap();
    let second = group.event(2).unwrap();

    assert_eq!(first.short_name_with_year().unwrap(), "XMO 2021");
    assert_eq!(
        first.short_name_with_year_and_country().unwrap(),
        "XMO 2021 in Utopia"
    );
    assert_eq!(
        second.short_name_with_year_and_country().unwrap(),
        "XMO 2022 in the Netherlands"
    );
    assert_eq!(
        first.host_location().unwrap().as_deref(),
        Some("Capital City, Utopia")
    );
    assert_eq!(second.host_location().unwrap().as_deref(), Some("Netherlands"));
    assert_eq!(
        first.contact().unwrap().as_deref(),
        Some("Jo Bloggs (jo@example.org)")
    );
    assert_eq!(second.contact().unwrap().as_deref(), Some("info@example.org"));
    assert_eq!(first.marks_total().unwrap(), 21);
    assert_eq!(first.max_marks_per_problem().unwrap(), Some(7));
}

#[test]
fn test_edition_dates_and_type() {
    let group = SourceBuilder::new()
        .event_row(
            EventRow::new(1)
                .with_problems("2021", vec![7])
                .with(EventAttr::StartDate, "2021-07-10")
                .with(EventAttr::EndDate, "2021-07-20")
                .with(EventAttr::EventType, "hybrid"),
        )
        .event_row(
            EventRow::new(2)
                .with_problems("2022", vec![7])
                .with(EventAttr::StartDate, "10 July 2022")
                .with(EventAttr::EventType, "on the moon"),
        )
        .group();
    let first = group.event(1).unwrap();
    let second = group.event(2).unwrap();

    assert_eq!(first.start_date().unwrap(), NaiveDate::from_ymd_opt(2021, 7, 10));
    assert_eq!(first.end_date().unwrap(), NaiveDate::from_ymd_opt(2021, 7, 20));
    assert_eq!(first.event_type().unwrap(), Some(EventType::Hybrid));
    assert_eq!(
        second.start_date(),
        Err(DataError::InvalidDate {
            value: "10 July 2022".to_string()
        })
    );
    assert!(matches!(
        second.event_type(),
        Err(DataError::AttributeType { .. })
    ));
    assert_eq!(second.end_date().unwrap(), None);
}

#[test]
fn test_papers_and_hosts() {
    let papers = vec![
        Paper::new(1, "English"),
        Paper::new(2, "English").with_url("https://example.org/day2.pdf"),
    ];
    let group = SourceBuilder::new()
        .event_row(
            EventRow::new(1)
                .with_problems("2021", vec![7])
                .with(EventAttr::HostCountryId, 10u32)
                .with(EventAttr::PaperList, papers.clone()),
        )
        .event(2, vec![7])
        .country(1, 10, "ABC", "Atlantis")
        .group();

    assert_eq!(group.event(1).unwrap().paper_list().unwrap(), papers);
    assert!(group.event(2).unwrap().paper_list().unwrap().is_empty());
    assert_eq!(
        group.event(1).unwrap().host_country().unwrap(),
        Some(group.country(10).unwrap())
    );
    let hosted: Vec<u32> = group
        .country(10)
        .unwrap()
        .host_list()
        .unwrap()
        .iter()
        .map(|e| e.id())
        .collect();
    assert_eq!(hosted, vec![1]);
}

#[test]
fn test_wrongly_shaped_values_name_the_attribute() {
    let group = SourceBuilder::new()
        .event_row(EventRow::new(1).with(EventAttr::Year, 2021i64))
        .group();

    assert_eq!(
        group.event(1).unwrap().year(),
        Err(DataError::AttributeType {
            kind: EntityKind::Event,
            name: "year".to_string(),
            expected: "text",
        })
    );
}

#[test]
fn test_group_from_json_snapshot() {
    let json = r#"{
        "config": {"short_name": "EGMO", "long_name": "European Girls' Mathematical Olympiad"},
        "events": [
            {"event_id": 1, "attrs": {
                "year": {"text": "2012"},
                "marks_per_problem": {"int_list": [7, 7, 7, 7]},
                "gold_boundary": {"int": 21}
            }}
        ],
        "countries": [
            {"event_id": 1, "country_id": 4, "attrs": {
                "code": {"text": "UNK"},
                "name": {"text": "United Kingdom"}
            }}
        ],
        "people": [
            {"event_id": 1, "person_id": 9, "country_id": 4, "attrs": {
                "given_name": {"text": "Ada"},
                "family_name": {"text": "Lovelace"},
                "primary_role": {"text": "Contestant 1"},
                "problem_scores": {"scores": [7, 7, 7, null]}
            }}
        ]
    }"#;
    let group = EventGroup::new(MemorySource::from_json_str(json).unwrap());
    let event = group.event(1).unwrap();
    let contestant = event.person_event(9, 4).unwrap();

    assert_eq!(event.short_name_with_year().unwrap(), "EGMO 2012");
    assert_eq!(contestant.name().unwrap(), "Ada Lovelace");
    assert_eq!(contestant.contestant_code().unwrap(), "UNK1");
    assert_eq!(contestant.total_score().unwrap(), 21);
    assert_eq!(contestant.max_total_score().unwrap(), 28);
    assert_eq!(contestant.rank().unwrap(), 1);
    assert_eq!(
        contestant.award().unwrap(),
        Some(olympiad_data::Award::Gold)
    );
}

#[test]
fn test_snapshot_with_bad_config_is_rejected() {
    let result = MemorySource::from_json_str(r#"{"config": {"rank_top_n": 0}}"#);

    assert!(matches!(result, Err(DataError::Config(_))));
}
