use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use trainer_core::lexer::ParseError;
use trainer_core::model::PartyVariant;
use trainer_core::party_table::{parse_party_table, write_party_table};

const ARTIFACT: &str = "src/data/trainer_parties.h";

#[test]
fn parses_custom_moves_with_held_item() {
    let text = "\
static const struct TrainerMonItemCustomMoves sParty_Wally[] = {
    {
    .iv = 30,
    .lvl = 16,
    .species = SPECIES_RALTS,
    .heldItem = ITEM_ORAN_BERRY,
    .moves = MOVE_GROWL, MOVE_CONFUSION, MOVE_NONE, MOVE_NONE
    }
};
";
    let parties = parse_party_table(ARTIFACT, text).expect("party table parses");
    let party = &parties["sParty_Wally"];
    assert_eq!(party.variant(), PartyVariant::ItemCustomMoves);

    let ralts = party.mon(0).expect("one mon");
    assert_eq!(ralts.iv, 30);
    assert_eq!(ralts.level, 16);
    assert_eq!(ralts.held_item.as_deref(), Some("ITEM_ORAN_BERRY"));
    assert_eq!(
        ralts.moves.clone().expect("moves").to_vec(),
        vec!["MOVE_GROWL", "MOVE_CONFUSION", "MOVE_NONE", "MOVE_NONE"]
    );
}

#[test]
fn derived_variant_overrides_declaration() {
    let text = "\
static const struct TrainerMonItemCustomMoves sParty_Calvin1[] = {
    {
    .iv = 0,
    .lvl = 5,
    .species = SPECIES_POOCHYENA,
    }
};
";
    let parties = parse_party_table(ARTIFACT, text).expect("party table parses");
    assert_eq!(
        parties["sParty_Calvin1"].variant(),
        PartyVariant::NoItemDefaultMoves
    );
}

#[test]
fn rejects_seven_mons() {
    let mut text =
        String::from("static const struct TrainerMonNoItemDefaultMoves sParty_Big[] = {\n");
    for _ in 0..7 {
        text.push_str("    {\n    .iv = 0,\n    .lvl = 5,\n    .species = SPECIES_ZUBAT,\n    },\n");
    }
    text.push_str("};\n");

    let err = parse_party_table(ARTIFACT, &text).expect_err("seven mons rejected");
    assert_matches!(err, ParseError::Syntax { ref message, .. } if message.contains("more than 6"));
}

#[test]
fn rejects_wrong_move_count() {
    let text = "\
static const struct TrainerMonNoItemCustomMoves sParty_Short[] = {
    {
    .iv = 0,
    .lvl = 5,
    .species = SPECIES_ZUBAT,
    .moves = MOVE_LEECH_LIFE, MOVE_NONE
    }
};
";
    let err = parse_party_table(ARTIFACT, text).expect_err("two moves rejected");
    assert_eq!(err.line(), Some(6));
}

#[test]
fn rejects_non_numeric_level() {
    let text = "\
static const struct TrainerMonNoItemDefaultMoves sParty_Bad[] = {
    {
    .iv = 0,
    .lvl = LEVEL_MAX,
    .species = SPECIES_ZUBAT,
    }
};
";
    let err = parse_party_table(ARTIFACT, text).expect_err("symbolic level rejected");
    assert_eq!(err.artifact(), ARTIFACT);
    assert_eq!(err.line(), Some(4));
}

#[test]
fn rejects_duplicate_party_identifier() {
    let text = "\
static const struct TrainerMonNoItemDefaultMoves sParty_Twice[] = {
};

static const struct TrainerMonNoItemDefaultMoves sParty_Twice[] = {
};
";
    let err = parse_party_table(ARTIFACT, text).expect_err("duplicate rejected");
    assert_matches!(err, ParseError::Duplicate { ref identifier, line: 4, .. } if identifier == "sParty_Twice");
}

#[test]
fn unterminated_party_is_unexpected_eof() {
    let text = "\
static const struct TrainerMonNoItemDefaultMoves sParty_Open[] = {
    {
    .iv = 0,
";
    let err = parse_party_table(ARTIFACT, text).expect_err("eof rejected");
    assert_matches!(err, ParseError::UnexpectedEof { .. });
}

#[test]
fn writer_separates_parties_with_blank_lines() {
    let text = "\
static const struct TrainerMonItemDefaultMoves sParty_A[] = {
    {
    .iv = 0,
    .lvl = 5,
    .species = SPECIES_TAILLOW,
    .heldItem = ITEM_NONE
    },
    {
    .iv = 0,
    .lvl = 7,
    .species = SPECIES_WINGULL,
    .heldItem = ITEM_ORAN_BERRY
    }
};

static const struct TrainerMonNoItemDefaultMoves sParty_B[] = {
    {
    .iv = 0,
    .lvl = 4,
    .species = SPECIES_WURMPLE,
    }
};
";
    let parties = parse_party_table(ARTIFACT, text).expect("party table parses");
    assert_eq!(write_party_table(parties.values()), text);
}
