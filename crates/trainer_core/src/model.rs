use std::fmt;

use crate::gender::Gender;
use crate::tokens::{
    AI_SCRIPT_PREFIX, DEFAULT_ENCOUNTER_MUSIC, DEFAULT_TRAINER_CLASS, DEFAULT_TRAINER_PIC,
    FLAG_SEPARATOR, ITEM_NONE, MOVE_NONE, NO_FLAGS, PARTY_FLAG_CUSTOM_MOVESET,
    PARTY_FLAG_HELD_ITEM, SENTINEL_TRAINER, SPECIES_NONE,
};

pub const PARTY_CAPACITY: usize = 6;
pub const ITEM_CAPACITY: usize = 4;
pub const MOVE_SLOTS: usize = 4;

// --- Party variant ---

/// Storage layout of a party's mons, selected by which optional fields any mon uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PartyVariant {
    #[default]
    NoItemDefaultMoves,
    NoItemCustomMoves,
    ItemDefaultMoves,
    ItemCustomMoves,
}

impl PartyVariant {
    pub const ALL: [PartyVariant; 4] = [
        Self::NoItemDefaultMoves,
        Self::NoItemCustomMoves,
        Self::ItemDefaultMoves,
        Self::ItemCustomMoves,
    ];

    /// Prefix of the C struct name, e.g. `TrainerMonItemDefaultMoves`.
    pub const STRUCT_PREFIX: &'static str = "TrainerMon";

    pub fn from_presence(has_items: bool, has_moves: bool) -> Self {
        match (has_items, has_moves) {
            (false, false) => Self::NoItemDefaultMoves,
            (false, true) => Self::NoItemCustomMoves,
            (true, false) => Self::ItemDefaultMoves,
            (true, true) => Self::ItemCustomMoves,
        }
    }

    pub fn has_items(&self) -> bool {
        matches!(self, Self::ItemDefaultMoves | Self::ItemCustomMoves)
    }

    pub fn has_moves(&self) -> bool {
        matches!(self, Self::NoItemCustomMoves | Self::ItemCustomMoves)
    }

    pub fn tag(&self) -> &'static str {
        match *self {
            Self::NoItemDefaultMoves => "NoItemDefaultMoves",
            Self::NoItemCustomMoves => "NoItemCustomMoves",
            Self::ItemDefaultMoves => "ItemDefaultMoves",
            Self::ItemCustomMoves => "ItemCustomMoves",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.tag() == tag)
    }

    pub fn struct_name(&self) -> String {
        format!("{}{}", Self::STRUCT_PREFIX, self.tag())
    }

    pub fn from_struct_name(name: &str) -> Option<Self> {
        name.strip_prefix(Self::STRUCT_PREFIX)
            .and_then(Self::from_tag)
    }
}

impl fmt::Display for PartyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// --- Mon ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mon {
    pub species: String,
    pub level: u8,
    pub iv: u8,
    pub held_item: Option<String>,
    pub moves: Option<[String; MOVE_SLOTS]>,
}

impl Default for Mon {
    fn default() -> Self {
        Self::new(SPECIES_NONE)
    }
}

impl Mon {
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            level: 1,
            iv: 0,
            held_item: None,
            moves: None,
        }
    }

    pub fn default_moves() -> [String; MOVE_SLOTS] {
        std::array::from_fn(|_| MOVE_NONE.to_string())
    }

    pub fn has_item(&self) -> bool {
        self.held_item.is_some()
    }

    pub fn has_moves(&self) -> bool {
        self.moves.is_some()
    }

    /// Sets one move, materializing an all-`MOVE_NONE` list first if the mon has none.
    pub fn set_move(&mut self, position: usize, move_token: impl Into<String>) {
        assert!(
            position < MOVE_SLOTS,
            "slot out of range: move position {position}, expected 0..{MOVE_SLOTS}"
        );
        let moves = self.moves.get_or_insert_with(Self::default_moves);
        moves[position] = move_token.into();
    }

    pub fn set_held_item(&mut self, item: Option<String>) {
        self.held_item = item;
    }
}

// --- Party ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    identifier: String,
    mons: [Option<Mon>; PARTY_CAPACITY],
    variant: PartyVariant,
}

impl Party {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            mons: Default::default(),
            variant: PartyVariant::default(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn set_identifier(&mut self, identifier: String) {
        self.identifier = identifier;
    }

    pub fn variant(&self) -> PartyVariant {
        self.variant
    }

    pub fn slots(&self) -> &[Option<Mon>; PARTY_CAPACITY] {
        &self.mons
    }

    pub fn mon(&self, slot: usize) -> Option<&Mon> {
        self.mons.get(slot).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.mons.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.next_free_slot().is_none()
    }

    /// Present mons in slot order.
    pub fn compact_mons(&self) -> impl Iterator<Item = &Mon> + '_ {
        self.mons.iter().filter_map(Option::as_ref)
    }

    pub fn has_items(&self) -> bool {
        self.compact_mons().any(Mon::has_item)
    }

    pub fn has_moves(&self) -> bool {
        self.compact_mons().any(Mon::has_moves)
    }

    /// Appends into the slot after the last occupied one.
    ///
    /// # Panics
    ///
    /// Panics if the party already holds [`PARTY_CAPACITY`] mons. The party is left
    /// untouched in that case.
    pub fn append_mon(&mut self, mon: Mon) {
        let Some(slot) = self.next_free_slot() else {
            panic!(
                "structural overflow: party {} already holds {PARTY_CAPACITY} mons",
                self.identifier
            );
        };
        self.mons[slot] = Some(mon);
        self.revalidate();
    }

    /// Replaces the mon in an occupied slot, or appends when `slot` is the next free
    /// slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot` would leave a gap or is beyond capacity.
    pub fn set_mon(&mut self, slot: usize, mon: Mon) {
        let len = self.len();
        assert!(
            slot <= len && slot < PARTY_CAPACITY,
            "slot out of range: party {} has {len} mons, cannot set slot {slot}",
            self.identifier
        );
        self.mons[slot] = Some(mon);
        self.revalidate();
    }

    /// Removes a mon and shifts the following mons forward.
    pub fn remove_mon(&mut self, slot: usize) -> Option<Mon> {
        let removed = self.mons.get_mut(slot)?.take()?;
        self.mons[slot..].rotate_left(1);
        self.revalidate();
        Some(removed)
    }

    pub fn edit_mon<R>(&mut self, slot: usize, f: impl FnOnce(&mut Mon) -> R) -> Option<R> {
        let mon = self.mons.get_mut(slot)?.as_mut()?;
        let out = f(mon);
        self.revalidate();
        Some(out)
    }

    pub fn strip_held_items(&mut self) {
        for mon in self.mons.iter_mut().flatten() {
            mon.held_item = None;
        }
        self.revalidate();
    }

    pub fn strip_moves(&mut self) {
        for mon in self.mons.iter_mut().flatten() {
            mon.moves = None;
        }
        self.revalidate();
    }

    /// Recomputes the variant and materializes the party-wide optional fields on every
    /// mon that lacks them.
    pub fn revalidate(&mut self) {
        let has_items = self.has_items();
        let has_moves = self.has_moves();
        self.variant = PartyVariant::from_presence(has_items, has_moves);

        for mon in self.mons.iter_mut().flatten() {
            if has_moves && mon.moves.is_none() {
                mon.moves = Some(Mon::default_moves());
            }
            if has_items && mon.held_item.is_none() {
                mon.held_item = Some(ITEM_NONE.to_string());
            }
        }
    }

    fn next_free_slot(&self) -> Option<usize> {
        let used = self
            .mons
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1);
        (used < PARTY_CAPACITY).then_some(used)
    }
}

// --- AI flags ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiFlag {
    CheckBadMove,
    TryToFaint,
    CheckViability,
    SetupFirstTurn,
    Risky,
    PreferStrongestMove,
    PreferBatonPass,
    HpAware,
}

impl AiFlag {
    /// Canonical emission order.
    pub const ALL: [AiFlag; 8] = [
        Self::CheckBadMove,
        Self::TryToFaint,
        Self::CheckViability,
        Self::SetupFirstTurn,
        Self::Risky,
        Self::PreferStrongestMove,
        Self::PreferBatonPass,
        Self::HpAware,
    ];

    pub fn name(&self) -> &'static str {
        match *self {
            Self::CheckBadMove => "AI_SCRIPT_CHECK_BAD_MOVE",
            Self::TryToFaint => "AI_SCRIPT_TRY_TO_FAINT",
            Self::CheckViability => "AI_SCRIPT_CHECK_VIABILITY",
            Self::SetupFirstTurn => "AI_SCRIPT_SETUP_FIRST_TURN",
            Self::Risky => "AI_SCRIPT_RISKY",
            Self::PreferStrongestMove => "AI_SCRIPT_PREFER_STRONGEST_MOVE",
            Self::PreferBatonPass => "AI_SCRIPT_PREFER_BATON_PASS",
            Self::HpAware => "AI_SCRIPT_HP_AWARE",
        }
    }

    /// Accepts the full constant name or the name without `AI_SCRIPT_`, in any case.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        let stem = upper.strip_prefix(AI_SCRIPT_PREFIX).unwrap_or(&upper);
        Self::ALL
            .into_iter()
            .find(|flag| &flag.name()[AI_SCRIPT_PREFIX.len()..] == stem)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for AiFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The eight AI behaviour switches of a trainer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AiFlags(u8);

impl AiFlags {
    pub const NONE: AiFlags = AiFlags(0);

    /// Flags enabled on a freshly created trainer.
    pub fn new_trainer_default() -> Self {
        let mut flags = Self::NONE;
        flags.set(AiFlag::CheckBadMove, true);
        flags.set(AiFlag::TryToFaint, true);
        flags.set(AiFlag::CheckViability, true);
        flags
    }

    pub fn contains(&self, flag: AiFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn set(&mut self, flag: AiFlag, enabled: bool) {
        if enabled {
            self.0 |= flag.bit();
        } else {
            self.0 &= !flag.bit();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn enabled(&self) -> impl Iterator<Item = AiFlag> + '_ {
        AiFlag::ALL.into_iter().filter(|flag| self.contains(*flag))
    }

    /// Builds the set from parsed names: each known flag is on iff its name appears.
    /// Names that match no flag are returned alongside.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> (Self, Vec<&'a str>) {
        let mut flags = Self::NONE;
        let mut unknown = Vec::new();
        for name in names {
            match AiFlag::ALL.into_iter().find(|flag| flag.name() == name) {
                Some(flag) => flags.set(flag, true),
                None if name == NO_FLAGS => {}
                None => unknown.push(name),
            }
        }
        (flags, unknown)
    }

    pub fn encode(&self) -> String {
        if self.is_empty() {
            return NO_FLAGS.to_string();
        }
        self.enabled()
            .map(|flag| flag.name())
            .collect::<Vec<_>>()
            .join(FLAG_SEPARATOR)
    }
}

// --- Trainer ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainer {
    identifier: String,
    pub name: String,
    pub trainer_class: String,
    pub music: String,
    pub gender: Gender,
    pub trainer_pic: String,
    pub double_battle: bool,
    pub ai_flags: AiFlags,
    items: [Option<String>; ITEM_CAPACITY],
    party: Option<String>,
}

impl Trainer {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: String::new(),
            trainer_class: DEFAULT_TRAINER_CLASS.to_string(),
            music: DEFAULT_ENCOUNTER_MUSIC.to_string(),
            gender: Gender::Male,
            trainer_pic: DEFAULT_TRAINER_PIC.to_string(),
            double_battle: false,
            ai_flags: AiFlags::new_trainer_default(),
            items: Default::default(),
            party: None,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn set_identifier(&mut self, identifier: String) {
        self.identifier = identifier;
    }

    pub fn is_sentinel(&self) -> bool {
        self.identifier == SENTINEL_TRAINER
    }

    /// Identifier of the referenced party; `None` means no party.
    pub fn party(&self) -> Option<&str> {
        self.party.as_deref()
    }

    /// Sets the party reference without checking that the party exists.
    pub fn set_party(&mut self, party: Option<String>) {
        self.party = party;
    }

    pub fn items(&self) -> &[Option<String>; ITEM_CAPACITY] {
        &self.items
    }

    pub fn compact_items(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().filter_map(Option::as_deref)
    }

    pub fn item_count(&self) -> usize {
        self.compact_items().count()
    }

    pub fn items_full(&self) -> bool {
        self.next_free_item_slot().is_none()
    }

    /// Appends after the last item.
    ///
    /// # Panics
    ///
    /// Panics if the trainer already holds four items.
    pub fn append_item(&mut self, item: impl Into<String>) {
        let Some(slot) = self.next_free_item_slot() else {
            panic!(
                "structural overflow: trainer {} already holds {ITEM_CAPACITY} items",
                self.identifier
            );
        };
        self.items[slot] = Some(item.into());
    }

    /// Replaces an occupied slot or fills the next free one. `None` removes the item
    /// in `slot` and shifts the following items forward.
    ///
    /// # Panics
    ///
    /// Panics if setting `slot` would leave a gap or is beyond capacity.
    pub fn set_item(&mut self, slot: usize, item: Option<String>) {
        let Some(item) = item else {
            self.remove_item(slot);
            return;
        };
        let count = self.item_count();
        assert!(
            slot <= count && slot < ITEM_CAPACITY,
            "slot out of range: trainer {} has {count} items, cannot set slot {slot}",
            self.identifier
        );
        self.items[slot] = Some(item);
    }

    /// Removes an item and shifts the following items forward.
    pub fn remove_item(&mut self, slot: usize) -> Option<String> {
        let removed = self.items.get_mut(slot)?.take()?;
        self.items[slot..].rotate_left(1);
        Some(removed)
    }

    pub fn encode_ai_flags(&self) -> String {
        self.ai_flags.encode()
    }

    /// Party flags for this trainer given its resolved party.
    pub fn encode_party_flags(&self, party: Option<&Party>) -> String {
        let Some(party) = party else {
            return NO_FLAGS.to_string();
        };
        let mut flags = Vec::with_capacity(2);
        if party.has_items() {
            flags.push(PARTY_FLAG_HELD_ITEM);
        }
        if party.has_moves() {
            flags.push(PARTY_FLAG_CUSTOM_MOVESET);
        }
        if flags.is_empty() {
            return NO_FLAGS.to_string();
        }
        flags.join(FLAG_SEPARATOR)
    }

    fn next_free_item_slot(&self) -> Option<usize> {
        let used = self.item_count();
        (used < ITEM_CAPACITY).then_some(used)
    }
}
