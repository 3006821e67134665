use pretty_assertions::assert_eq;
use trainer_core::model::{AiFlag, AiFlags, Mon, Party, PartyVariant, Trainer};

fn mon_with(item: Option<&str>, moves: Option<[&str; 4]>) -> Mon {
    let mut mon = Mon::new("SPECIES_POOCHYENA");
    mon.held_item = item.map(str::to_string);
    mon.moves = moves.map(|moves| moves.map(str::to_string));
    mon
}

#[test]
fn variant_follows_field_presence() {
    let cases = [
        (None, None, PartyVariant::NoItemDefaultMoves),
        (
            None,
            Some(["MOVE_TACKLE", "MOVE_NONE", "MOVE_NONE", "MOVE_NONE"]),
            PartyVariant::NoItemCustomMoves,
        ),
        (Some("ITEM_ORAN_BERRY"), None, PartyVariant::ItemDefaultMoves),
        (
            Some("ITEM_ORAN_BERRY"),
            Some(["MOVE_TACKLE", "MOVE_NONE", "MOVE_NONE", "MOVE_NONE"]),
            PartyVariant::ItemCustomMoves,
        ),
    ];

    for (item, moves, expected) in cases {
        let mut party = Party::new("sParty_Case");
        party.append_mon(Mon::new("SPECIES_ZIGZAGOON"));
        party.append_mon(mon_with(item, moves));
        assert_eq!(party.variant(), expected, "item={item:?} moves={moves:?}");
    }
}

#[test]
fn revalidate_materializes_party_wide_fields() {
    let mut party = Party::new("sParty_Mixed");
    party.append_mon(Mon::new("SPECIES_ZIGZAGOON"));
    party.append_mon(mon_with(
        Some("ITEM_ORAN_BERRY"),
        Some(["MOVE_TACKLE", "MOVE_GROWL", "MOVE_NONE", "MOVE_NONE"]),
    ));

    let first = party.mon(0).expect("first mon");
    assert_eq!(first.held_item.as_deref(), Some("ITEM_NONE"));
    assert_eq!(first.moves, Some(Mon::default_moves()));
}

#[test]
fn revalidate_is_idempotent() {
    let mut party = Party::new("sParty_Twice");
    party.append_mon(mon_with(Some("ITEM_POTION"), None));
    party.append_mon(Mon::new("SPECIES_WINGULL"));
    let once = party.clone();

    party.revalidate();
    assert_eq!(party, once);
}

#[test]
fn clearing_every_item_downgrades_the_variant() {
    let mut party = Party::new("sParty_Strip");
    party.append_mon(mon_with(Some("ITEM_POTION"), None));
    party.append_mon(Mon::new("SPECIES_WINGULL"));
    assert_eq!(party.variant(), PartyVariant::ItemDefaultMoves);

    party.strip_held_items();
    assert_eq!(party.variant(), PartyVariant::NoItemDefaultMoves);
    assert!(party.compact_mons().all(|mon| mon.held_item.is_none()));
}

#[test]
fn set_move_materializes_a_move_list() {
    let mut party = Party::new("sParty_Moves");
    party.append_mon(Mon::new("SPECIES_RALTS"));
    party.append_mon(Mon::new("SPECIES_KIRLIA"));

    party.edit_mon(1, |mon| mon.set_move(2, "MOVE_CONFUSION"));

    assert_eq!(party.variant(), PartyVariant::NoItemCustomMoves);
    let kirlia = party.mon(1).expect("second mon");
    assert_eq!(
        kirlia.moves.as_ref().map(|moves| moves[2].as_str()),
        Some("MOVE_CONFUSION")
    );
    assert_eq!(party.mon(0).and_then(|mon| mon.moves.clone()), Some(Mon::default_moves()));
}

#[test]
fn remove_mon_keeps_mons_contiguous() {
    let mut party = Party::new("sParty_Shift");
    for species in ["SPECIES_A", "SPECIES_B", "SPECIES_C"] {
        party.append_mon(Mon::new(species));
    }

    let removed = party.remove_mon(0).expect("mon removed");
    assert_eq!(removed.species, "SPECIES_A");
    let species: Vec<&str> = party.compact_mons().map(|mon| mon.species.as_str()).collect();
    assert_eq!(species, vec!["SPECIES_B", "SPECIES_C"]);
    assert!(party.mon(2).is_none());
}

#[test]
#[should_panic(expected = "structural overflow")]
fn seventh_mon_is_a_structural_overflow() {
    let mut party = Party::new("sParty_Full");
    for _ in 0..7 {
        party.append_mon(Mon::new("SPECIES_MAGIKARP"));
    }
}

#[test]
fn overflow_leaves_party_untouched() {
    let mut party = Party::new("sParty_Full");
    for _ in 0..6 {
        party.append_mon(Mon::new("SPECIES_MAGIKARP"));
    }
    let before = party.clone();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        party.append_mon(Mon::new("SPECIES_GYARADOS"));
    }));
    assert!(result.is_err());
    assert_eq!(party, before);
}

#[test]
#[should_panic(expected = "structural overflow")]
fn fifth_item_is_a_structural_overflow() {
    let mut trainer = Trainer::new("TRAINER_ROXANNE_1");
    for _ in 0..5 {
        trainer.append_item("ITEM_POTION");
    }
}

#[test]
fn ai_flags_encode_in_canonical_order() {
    let mut flags = AiFlags::NONE;
    assert_eq!(flags.encode(), "0");

    flags.set(AiFlag::HpAware, true);
    flags.set(AiFlag::CheckBadMove, true);
    flags.set(AiFlag::Risky, true);
    assert_eq!(
        flags.encode(),
        "AI_SCRIPT_CHECK_BAD_MOVE | AI_SCRIPT_RISKY | AI_SCRIPT_HP_AWARE"
    );
}

#[test]
fn ai_flags_from_names_reports_unknown_names() {
    let (flags, unknown) =
        AiFlags::from_names(["AI_SCRIPT_TRY_TO_FAINT", "AI_SCRIPT_ROAMING", "0"]);
    assert!(flags.contains(AiFlag::TryToFaint));
    assert_eq!(flags.enabled().count(), 1);
    assert_eq!(unknown, vec!["AI_SCRIPT_ROAMING"]);
}

#[test]
fn ai_flag_names_parse_with_or_without_prefix() {
    assert_eq!(AiFlag::from_name("hp_aware"), Some(AiFlag::HpAware));
    assert_eq!(
        AiFlag::from_name("AI_SCRIPT_PREFER_BATON_PASS"),
        Some(AiFlag::PreferBatonPass)
    );
    assert_eq!(AiFlag::from_name("bogus"), None);
}

#[test]
fn new_trainer_uses_editor_defaults() {
    let trainer = Trainer::new("TRAINER_NEW");
    assert_eq!(trainer.trainer_class, "TRAINER_CLASS_YOUNGSTER");
    assert_eq!(trainer.music, "TRAINER_ENCOUNTER_MUSIC_MALE");
    assert_eq!(trainer.trainer_pic, "TRAINER_PIC_YOUNGSTER");
    assert!(!trainer.double_battle);
    assert_eq!(
        trainer.encode_ai_flags(),
        "AI_SCRIPT_CHECK_BAD_MOVE | AI_SCRIPT_TRY_TO_FAINT | AI_SCRIPT_CHECK_VIABILITY"
    );
}

#[test]
fn party_flags_follow_resolved_party() {
    let trainer = Trainer::new("TRAINER_BRAWLY_1");
    assert_eq!(trainer.encode_party_flags(None), "0");

    let mut party = Party::new("sParty_Brawly1");
    party.append_mon(Mon::new("SPECIES_MACHOP"));
    assert_eq!(trainer.encode_party_flags(Some(&party)), "0");

    party.edit_mon(0, |mon| mon.set_move(0, "MOVE_KARATE_CHOP"));
    assert_eq!(
        trainer.encode_party_flags(Some(&party)),
        "F_TRAINER_PARTY_CUSTOM_MOVESET"
    );

    party.edit_mon(0, |mon| mon.set_held_item(Some("ITEM_SITRUS_BERRY".to_string())));
    assert_eq!(
        trainer.encode_party_flags(Some(&party)),
        "F_TRAINER_PARTY_HELD_ITEM | F_TRAINER_PARTY_CUSTOM_MOVESET"
    );
}

#[test]
fn clearing_an_item_shifts_later_items_forward() {
    let mut trainer = Trainer::new("TRAINER_WALLY");
    trainer.append_item("ITEM_POTION");
    trainer.append_item("ITEM_SUPER_POTION");
    trainer.append_item("ITEM_FULL_RESTORE");
    trainer.set_item(1, None);

    assert_eq!(
        trainer.items(),
        &[
            Some("ITEM_POTION".to_string()),
            Some("ITEM_FULL_RESTORE".to_string()),
            None,
            None,
        ]
    );
    assert_eq!(trainer.remove_item(3), None);
}

#[test]
fn append_after_set_fills_the_next_slot() {
    let mut trainer = Trainer::new("TRAINER_WALLY");
    trainer.set_item(0, Some("ITEM_POTION".to_string()));
    trainer.append_item("ITEM_FULL_RESTORE");
    trainer.set_item(1, Some("ITEM_HYPER_POTION".to_string()));
    trainer.append_item("ITEM_ETHER");

    let items: Vec<&str> = trainer.compact_items().collect();
    assert_eq!(items, vec!["ITEM_POTION", "ITEM_HYPER_POTION", "ITEM_ETHER"]);
    assert!(!trainer.items_full());
}

#[test]
#[should_panic(expected = "slot out of range")]
fn setting_an_item_past_the_end_is_rejected() {
    let mut trainer = Trainer::new("TRAINER_WALLY");
    trainer.append_item("ITEM_POTION");
    trainer.set_item(3, Some("ITEM_FULL_RESTORE".to_string()));
}

#[test]
fn set_mon_replaces_or_fills_the_next_slot() {
    let mut party = Party::new("sParty_Set");
    party.set_mon(0, Mon::new("SPECIES_WURMPLE"));
    party.set_mon(1, mon_with(Some("ITEM_ORAN_BERRY"), None));
    assert_eq!(party.len(), 2);
    assert_eq!(party.variant(), PartyVariant::ItemDefaultMoves);

    party.set_mon(0, Mon::new("SPECIES_SILCOON"));
    assert_eq!(party.len(), 2);
    let first = party.mon(0).expect("slot 0");
    assert_eq!(first.species, "SPECIES_SILCOON");
    assert!(first.has_item());
    assert!(!first.has_moves());
    assert_eq!(first.held_item.as_deref(), Some("ITEM_NONE"));
}

#[test]
#[should_panic(expected = "slot out of range")]
fn set_mon_rejects_gaps() {
    let mut party = Party::new("sParty_Gap");
    party.set_mon(2, Mon::new("SPECIES_WURMPLE"));
}
