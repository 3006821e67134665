use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use trainer_core::layout::ProjectLayout;
use trainer_core::model::{Mon, PartyVariant};
use trainer_core::roster::Roster;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_layout() -> ProjectLayout {
    ProjectLayout::new(workspace_root().join("tests/fixtures/emerald"))
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {}", path, e))
}

fn load_fixture() -> (Roster, String, String, String) {
    let layout = fixture_layout();
    let parties = read(layout.party_table());
    let trainers = read(layout.trainer_table());
    let registry = read(layout.registry());
    let roster = Roster::parse("trainer_parties.h", &parties, "trainers.h", &trainers)
        .expect("fixture parses");
    (roster, parties, trainers, registry)
}

#[test]
fn canonical_fixture_round_trips_byte_for_byte() {
    let (roster, parties, trainers, registry) = load_fixture();
    let rendered = roster.render().expect("fixture renders");

    assert_eq!(rendered.party_table, parties);
    assert_eq!(rendered.trainer_table, trainers);
    assert_eq!(rendered.registry, registry);
}

#[test]
fn fixture_covers_every_party_variant() {
    let (roster, ..) = load_fixture();
    let variants: Vec<PartyVariant> = roster.parties().values().map(|party| party.variant()).collect();
    assert_eq!(variants, PartyVariant::ALL.to_vec());
}

#[test]
fn reparsing_rendered_output_gives_an_equal_roster() {
    let (mut roster, ..) = load_fixture();
    roster
        .party_mut("sParty_Sawyer1")
        .expect("party exists")
        .append_mon(Mon::new("SPECIES_MACHOP"));
    roster
        .trainer_mut("TRAINER_JOEY")
        .expect("trainer exists")
        .append_item("ITEM_SUPER_POTION");

    let rendered = roster.render().expect("renders");
    let reparsed = Roster::parse(
        "trainer_parties.h",
        &rendered.party_table,
        "trainers.h",
        &rendered.trainer_table,
    )
    .expect("rendered output parses");
    assert_eq!(reparsed, roster);
}

#[test]
fn clearing_a_middle_item_survives_a_reparse() {
    let (mut roster, ..) = load_fixture();
    let roxanne = roster.trainer_mut("TRAINER_ROXANNE_1").expect("trainer exists");
    roxanne.set_item(1, None);
    roxanne.append_item("ITEM_SUPER_POTION");

    let rendered = roster.render().expect("renders");
    assert!(rendered.trainer_table.contains(
        "        .items = {ITEM_POTION, ITEM_NONE, ITEM_NONE, ITEM_SUPER_POTION},\n"
    ));
    let reparsed = Roster::parse(
        "trainer_parties.h",
        &rendered.party_table,
        "trainers.h",
        &rendered.trainer_table,
    )
    .expect("rendered output parses");
    assert_eq!(reparsed, roster);
}

#[test]
fn giving_one_mon_an_item_upgrades_the_whole_party() {
    let (mut roster, ..) = load_fixture();
    roster
        .party_mut("sParty_Laura")
        .expect("party exists")
        .append_mon(Mon::new("SPECIES_MAKUHITA"));
    roster
        .party_mut("sParty_Laura")
        .expect("party exists")
        .edit_mon(1, |mon| mon.set_held_item(Some("ITEM_BLACK_BELT".to_string())));

    let rendered = roster.render().expect("renders");
    assert!(rendered
        .party_table
        .contains("static const struct TrainerMonItemCustomMoves sParty_Laura[] = {\n"));
    assert!(rendered.party_table.contains(
        "    .species = SPECIES_MEDITITE,\n    .heldItem = ITEM_NONE,\n    .moves = MOVE_FOCUS_PUNCH, MOVE_LIGHT_SCREEN, MOVE_REFLECT, MOVE_BULK_UP\n    },\n"
    ));
    assert!(rendered.party_table.contains(
        "    .species = SPECIES_MAKUHITA,\n    .heldItem = ITEM_BLACK_BELT,\n    .moves = MOVE_NONE, MOVE_NONE, MOVE_NONE, MOVE_NONE\n    }\n"
    ));
    assert!(rendered.trainer_table.contains(
        "        .partyFlags = F_TRAINER_PARTY_HELD_ITEM | F_TRAINER_PARTY_CUSTOM_MOVESET,\n        .trainerClass = TRAINER_CLASS_BATTLE_GIRL,"
    ));
    assert!(rendered
        .trainer_table
        .contains("        .party = {.ItemCustomMoves = sParty_Laura},\n"));
}

#[test]
fn created_trainer_gets_the_next_registry_index() {
    let (mut roster, ..) = load_fixture();
    roster
        .create_trainer("TRAINER_BRENDAN_ROUTE_103", "sParty_BrendanRoute103", "BRENDAN")
        .expect("identifiers are free");

    let rendered = roster.render().expect("renders");
    assert!(rendered.registry.contains("#define TRAINER_BRENDAN_ROUTE_103 5\n"));
    assert!(rendered.registry.contains("#define TRAINERS_COUNT            6\n"));
    assert!(rendered.party_table.ends_with(
        "static const struct TrainerMonNoItemDefaultMoves sParty_BrendanRoute103[] = {\n};\n"
    ));
    assert!(rendered.trainer_table.contains(
        "        .partySize = ARRAY_COUNT(sParty_BrendanRoute103),\n        .party = {.NoItemDefaultMoves = sParty_BrendanRoute103},\n"
    ));
}

#[test]
fn renaming_a_party_rewrites_references() {
    let (mut roster, ..) = load_fixture();
    roster
        .rename_party("sParty_Joey", "sParty_Joey1")
        .expect("rename succeeds");

    assert_eq!(
        roster.trainer("TRAINER_JOEY").and_then(|trainer| trainer.party()),
        Some("sParty_Joey1")
    );
    let rendered = roster.render().expect("renders");
    assert!(!rendered.party_table.contains("sParty_Joey[]"));
    assert!(rendered.trainer_table.contains("ARRAY_COUNT(sParty_Joey1)"));
}
