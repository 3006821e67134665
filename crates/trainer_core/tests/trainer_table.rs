use assert_matches::assert_matches;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use trainer_core::gender::Gender;
use trainer_core::lexer::ParseError;
use trainer_core::model::{AiFlag, Mon, Party};
use trainer_core::trainer_table::{parse_trainer_table, write_trainer_table};

const ARTIFACT: &str = "src/data/trainers.h";

const SENTINEL: &str = "\
    [TRAINER_NONE] =
    {
        .partyFlags = 0,
        .trainerClass = TRAINER_CLASS_PKMN_TRAINER_1,
        .encounterMusic_gender = TRAINER_ENCOUNTER_MUSIC_MALE,
        .trainerPic = TRAINER_PIC_HIKER,
        .trainerName = _(\"\"),
        .items = {},
        .doubleBattle = FALSE,
        .aiFlags = 0,
        .partySize = 0,
        .party = {.NoItemDefaultMoves = NULL},
    },
";

fn parties() -> IndexMap<String, Party> {
    let mut party = Party::new("sParty_Lola1");
    party.append_mon(Mon::new("SPECIES_AZURILL"));
    let mut parties = IndexMap::new();
    parties.insert(party.identifier().to_string(), party);
    parties
}

fn table(records: &[&str]) -> String {
    let mut text = String::from("const struct Trainer gTrainers[] = {\n");
    text.push_str(&records.join("\n"));
    text.push_str("};\n");
    text
}

const LOLA: &str = "\
    [TRAINER_LOLA_1] =
    {
        .partyFlags = 0,
        .trainerClass = TRAINER_CLASS_TUBER_F,
        .encounterMusic_gender = F_TRAINER_FEMALE | TRAINER_ENCOUNTER_MUSIC_GIRL,
        .trainerPic = TRAINER_PIC_TUBER_F,
        .trainerName = _(\"LOLA\"),
        .items = {ITEM_POTION, ITEM_NONE},
        .doubleBattle = TRUE,
        .aiFlags = AI_SCRIPT_CHECK_BAD_MOVE | AI_SCRIPT_PREFER_BATON_PASS,
        .partySize = ARRAY_COUNT(sParty_Lola1),
        .party = {.NoItemDefaultMoves = sParty_Lola1},
    },
";

#[test]
fn parses_every_known_field() {
    let trainers =
        parse_trainer_table(ARTIFACT, &table(&[SENTINEL, LOLA]), &parties()).expect("parses");
    assert_eq!(trainers.len(), 2);

    let lola = &trainers["TRAINER_LOLA_1"];
    assert_eq!(lola.name, "LOLA");
    assert_eq!(lola.trainer_class, "TRAINER_CLASS_TUBER_F");
    assert_eq!(lola.music, "TRAINER_ENCOUNTER_MUSIC_GIRL");
    assert_eq!(lola.gender, Gender::Female);
    assert_eq!(lola.trainer_pic, "TRAINER_PIC_TUBER_F");
    assert!(lola.double_battle);
    assert!(lola.ai_flags.contains(AiFlag::CheckBadMove));
    assert!(lola.ai_flags.contains(AiFlag::PreferBatonPass));
    assert_eq!(lola.ai_flags.enabled().count(), 2);
    assert_eq!(
        lola.compact_items().collect::<Vec<_>>(),
        vec!["ITEM_POTION", "ITEM_NONE"]
    );
    assert_eq!(lola.party(), Some("sParty_Lola1"));
}

#[test]
fn sentinel_has_no_party() {
    let trainers = parse_trainer_table(ARTIFACT, &table(&[SENTINEL]), &parties()).expect("parses");
    let sentinel = &trainers["TRAINER_NONE"];
    assert!(sentinel.is_sentinel());
    assert_eq!(sentinel.party(), None);
    assert_eq!(sentinel.name, "");
}

#[test]
fn ignores_unknown_field_tags() {
    let with_extra = LOLA.replace(
        "        .doubleBattle = TRUE,\n",
        "        .doubleBattle = TRUE,\n        .mugshotColor = MUGSHOT_COLOR_PURPLE,\n",
    );
    let trainers =
        parse_trainer_table(ARTIFACT, &table(&[SENTINEL, &with_extra]), &parties()).expect("parses");
    assert!(trainers["TRAINER_LOLA_1"].double_battle);
}

#[test]
fn undefined_party_is_a_missing_reference() {
    let dangling = LOLA.replace(
        "{.NoItemDefaultMoves = sParty_Lola1}",
        "{.NoItemDefaultMoves = sParty_Lola2}",
    );
    let err = parse_trainer_table(ARTIFACT, &table(&[SENTINEL, &dangling]), &parties())
        .expect_err("missing party rejected");
    assert_matches!(err, ParseError::MissingReference { ref identifier, .. } if identifier == "sParty_Lola2");
}

#[test]
fn missing_sentinel_is_rejected() {
    let err = parse_trainer_table(ARTIFACT, &table(&[LOLA]), &parties())
        .expect_err("sentinel required");
    assert_matches!(err, ParseError::Syntax { ref message, .. } if message.contains("TRAINER_NONE"));
}

#[test]
fn sentinel_is_moved_to_the_front() {
    let trainers =
        parse_trainer_table(ARTIFACT, &table(&[LOLA, SENTINEL]), &parties()).expect("parses");
    assert_eq!(trainers.get_index_of("TRAINER_NONE"), Some(0));
    assert_eq!(trainers.get_index_of("TRAINER_LOLA_1"), Some(1));
}

#[test]
fn invalid_double_battle_is_rejected() {
    let odd = LOLA.replace(".doubleBattle = TRUE,", ".doubleBattle = 1,");
    let err = parse_trainer_table(ARTIFACT, &table(&[SENTINEL, &odd]), &parties())
        .expect_err("non boolean rejected");
    assert_eq!(err.line(), Some(24));
}

#[test]
fn duplicate_trainer_is_rejected() {
    let err = parse_trainer_table(ARTIFACT, &table(&[SENTINEL, LOLA, LOLA]), &parties())
        .expect_err("duplicate rejected");
    assert_matches!(err, ParseError::Duplicate { ref identifier, .. } if identifier == "TRAINER_LOLA_1");
}

#[test]
fn missing_table_terminator_is_unexpected_eof() {
    let mut text = String::from("const struct Trainer gTrainers[] = {\n");
    text.push_str(SENTINEL);
    let err = parse_trainer_table(ARTIFACT, &text, &parties()).expect_err("eof rejected");
    assert_matches!(err, ParseError::UnexpectedEof { .. });
}

#[test]
fn writer_reproduces_canonical_records() {
    let parties = parties();
    let text = table(&[SENTINEL, LOLA]);
    let trainers = parse_trainer_table(ARTIFACT, &text, &parties).expect("parses");
    let written = write_trainer_table(trainers.values(), &parties).expect("renders");
    assert_eq!(written, text);
}

#[test]
fn writer_rejects_dangling_party() {
    let parties = parties();
    let mut trainers =
        parse_trainer_table(ARTIFACT, &table(&[SENTINEL, LOLA]), &parties).expect("parses");
    trainers["TRAINER_LOLA_1"].set_party(Some("sParty_Gone".to_string()));

    let err = write_trainer_table(trainers.values(), &parties).expect_err("dangling rejected");
    assert_eq!(err.trainer, "TRAINER_LOLA_1");
    assert_eq!(err.party, "sParty_Gone");
}
