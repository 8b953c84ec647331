//! Integration tests for CSV import feeding the allowance engine.

use chrono::NaiveDate;
use donation_core::models::{OwnerId, RelationshipCode, TaxSystem};
use donation_core::{DonationEngine, EngineConfig, ReferenceData};
use donation_data::{FamilyLoader, LoadedFamily, LoaderError, TaxBracketLoader};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const PEOPLE_CSV: &str = include_str!("../test-data/people.csv");
const LINKS_CSV: &str = include_str!("../test-data/links.csv");
const DONATIONS_CSV: &str = include_str!("../test-data/donations.csv");
const BRACKETS_CSV: &str = include_str!("../test-data/tax_brackets_2026.csv");

fn reference_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 10, 16)
}

fn load_family() -> LoadedFamily {
    let people = FamilyLoader::parse_people(PEOPLE_CSV.as_bytes()).expect("Failed to parse people");
    let links = FamilyLoader::parse_links(LINKS_CSV.as_bytes()).expect("Failed to parse links");
    let donations =
        FamilyLoader::parse_donations(DONATIONS_CSV.as_bytes()).expect("Failed to parse donations");

    FamilyLoader::load(&people, &links, &donations).expect("Failed to load family")
}

fn reference_data() -> ReferenceData {
    let mut config = EngineConfig::french_reference().expect("Failed to load configuration");
    let records =
        TaxBracketLoader::parse(BRACKETS_CSV.as_bytes()).expect("Failed to parse brackets");
    TaxBracketLoader::load(&mut config, &records).expect("Failed to load brackets");
    config
        .into_reference_data()
        .expect("Failed to build reference data")
}

#[test]
fn test_load_full_family() {
    let family = load_family();

    assert_eq!(family.graph.len(), 7);
    assert_eq!(family.graph.people_of(OwnerId(1)).len(), 6);
    assert_eq!(family.graph.people_of(OwnerId(2)).len(), 1);
    assert_eq!(family.graph.donations().count(), 4);
}

#[test]
fn test_bracket_csv_matches_built_in_schedules() {
    let built_in = EngineConfig::french_reference()
        .and_then(EngineConfig::into_reference_data)
        .unwrap();
    let loaded = reference_data();

    assert_eq!(loaded.brackets, built_in.brackets);
}

#[test]
fn test_simulation_counts_loaded_gifts() {
    let family = load_family();
    let data = reference_data();
    let engine = DonationEngine::new(&family.graph, &data);
    let robert = family.person_id("robert").unwrap();
    let jean = family.person_id("jean").unwrap();

    let simulation = engine
        .simulator()
        .simulate(robert, jean, reference_date())
        .unwrap();

    assert_eq!(simulation.relationship_code, RelationshipCode::Enfant);
    let standard = simulation
        .rules
        .iter()
        .find(|r| r.tax_system == TaxSystem::ProgressifDirect)
        .unwrap();
    assert_eq!(standard.consumed, dec!(60000));
    assert_eq!(standard.available, dec!(40000));
}

#[test]
fn test_deceased_donor_has_nothing_to_give() {
    let family = load_family();
    let data = reference_data();
    let engine = DonationEngine::new(&family.graph, &data);
    let odette = family.person_id("odette").unwrap();
    let sophie = family.person_id("sophie").unwrap();

    let simulation = engine
        .simulator()
        .simulate(odette, sophie, reference_date())
        .unwrap();

    assert!(simulation.rules.iter().all(|r| !r.is_valid));
    assert_eq!(simulation.total_available, dec!(0));
}

#[test]
fn test_plan_ignores_other_owners() {
    let family = load_family();
    let data = reference_data();
    let engine = DonationEngine::new(&family.graph, &data);
    let claire = family.person_id("claire").unwrap();

    let plan = engine
        .planner()
        .plan(&family.graph.people_of(OwnerId(1)), reference_date())
        .unwrap();

    assert!(!plan.is_empty());
    assert!(plan
        .iter()
        .all(|e| e.donor != claire && e.beneficiary != claire));
    assert!(plan
        .iter()
        .all(|e| e.relationship_code.is_descending()));
}

#[test]
fn test_unknown_key_in_donations_is_rejected() {
    let people = FamilyLoader::parse_people(PEOPLE_CSV.as_bytes()).unwrap();
    let csv = "donor,beneficiary,amount,created_at,tax_system,tax_paid\n\
               robert,paul,1000,2020-01-01,progressif_direct,0\n";
    let donations = FamilyLoader::parse_donations(csv.as_bytes()).unwrap();

    let result = FamilyLoader::load(&people, &[], &donations);

    let Err(LoaderError::UnknownPerson(key)) = result else {
        panic!("Expected UnknownPerson error, got: {:?}", result.map(|f| f.graph.len()));
    };
    assert_eq!(key, "paul");
}
