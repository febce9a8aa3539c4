use ts_core::model::entry::EntryStatus;
use ts_core::parsers::ts;
use ts_core::services::locations::{self, LocationStyle};
use ts_core::services::{numerus, qa, rebuild, stats};

const FIXTURE: &str = include_str!("fixtures/designer_uk.ts");

#[test]
fn canonical_file_round_trips_byte_for_byte() {
    let catalog = ts::parse(FIXTURE).expect("fixture parses");
    assert_eq!(rebuild::rebuild(&catalog), FIXTURE);
}

#[test]
fn second_generation_is_stable() {
    let first = rebuild::rebuild(&ts::parse(FIXTURE).unwrap());
    let second = rebuild::rebuild(&ts::parse(&first).unwrap());
    assert_eq!(first, second);
}

#[test]
fn every_entry_has_context_and_source() {
    let catalog = ts::parse(FIXTURE).unwrap();
    assert_eq!(catalog.entries.len(), 11);

    for e in &catalog.entries {
        assert!(!e.context.is_empty(), "{} has no context", e.entry_id);
        assert!(
            !e.source.is_empty() || e.is_context_comment(),
            "{} has no source",
            e.entry_id
        );
    }
}

#[test]
fn numerus_slots_match_target_locale() {
    let catalog = ts::parse(FIXTURE).unwrap();
    let expected = numerus::form_count(catalog.language.as_deref().unwrap()).unwrap();
    assert_eq!(expected, 3);

    let numerus: Vec<_> = catalog.entries.iter().filter(|e| e.numerus).collect();
    assert_eq!(numerus.len(), 2);
    assert!(numerus.iter().all(|e| e.numerus_forms.len() == expected));
}

#[test]
fn fixture_passes_integrity_checks() {
    let catalog = ts::parse(FIXTURE).unwrap();
    let issues = qa::run(&catalog);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn duplicate_and_missing_forms_are_caught_after_edit() {
    let mut catalog = ts::parse(FIXTURE).unwrap();
    let mut dup = catalog.entries[0].clone();
    dup.entry_id = "msg-dup".into();
    catalog.entries.insert(1, dup);
    catalog.entries[4].numerus_forms.pop();

    let codes: Vec<String> = qa::run(&catalog).into_iter().map(|i| i.code).collect();
    assert!(codes.contains(&"DUPLICATE_MESSAGE".to_string()));
    assert!(codes.contains(&"NUMERUS_FORM_COUNT".to_string()));
}

#[test]
fn statuses_and_stats() {
    let catalog = ts::parse(FIXTURE).unwrap();
    assert_eq!(catalog.entries[2].status, EntryStatus::Unfinished);
    assert_eq!(catalog.entries[10].status, EntryStatus::Obsolete);
    assert_eq!(catalog.entries[10].source, "Escape\u{1b}sequence");

    let s = stats::collect(&catalog);
    assert_eq!(s.contexts, 5);
    assert_eq!(s.counts.total, 10);
    assert_eq!(s.counts.finished, 6);
    assert_eq!(s.counts.unfinished, 1);
    assert_eq!(s.counts.untranslated, 2);
    assert_eq!(s.counts.obsolete, 1);
    assert_eq!(
        s.summary()[0],
        "Generated 7 translation(s) (6 finished and 1 unfinished)"
    );
}

#[test]
fn location_styles_convert_losslessly() {
    let mut catalog = ts::parse(FIXTURE).unwrap();

    locations::apply(&mut catalog, LocationStyle::Absolute);
    let file = &catalog.entries[7].locations[0];
    assert_eq!(file.filename.as_deref(), Some("../src/tools/designer/mainwindow.cpp"));
    assert_eq!(file.line.as_deref(), Some("127"));

    locations::apply(&mut catalog, LocationStyle::Relative);
    assert_eq!(rebuild::rebuild(&catalog), FIXTURE);
}

#[test]
fn stripped_locations_leave_no_location_elements() {
    let mut catalog = ts::parse(FIXTURE).unwrap();
    locations::apply(&mut catalog, LocationStyle::None);
    assert!(!rebuild::rebuild(&catalog).contains("<location"));
}
