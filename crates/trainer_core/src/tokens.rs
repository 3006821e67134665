//! Well-known identifiers and enum tokens of the decomp trainer data.
//!
//! The names match the constants in `include/constants/*.h` of the project the
//! artifacts belong to. Only tokens the codec itself has to recognise or emit live
//! here; everything else is carried through verbatim.

pub const SENTINEL_TRAINER: &str = "TRAINER_NONE";
pub const NULL_PARTY: &str = "NULL";
pub const ITEM_NONE: &str = "ITEM_NONE";
pub const MOVE_NONE: &str = "MOVE_NONE";
pub const SPECIES_NONE: &str = "SPECIES_NONE";

pub const PARTY_FLAG_HELD_ITEM: &str = "F_TRAINER_PARTY_HELD_ITEM";
pub const PARTY_FLAG_CUSTOM_MOVESET: &str = "F_TRAINER_PARTY_CUSTOM_MOVESET";

/// Separator between OR-ed flag names in both tables.
pub const FLAG_SEPARATOR: &str = " | ";
/// Emitted in place of an empty flag set.
pub const NO_FLAGS: &str = "0";

pub const TRUE_TOKEN: &str = "TRUE";
pub const FALSE_TOKEN: &str = "FALSE";

pub const DEFAULT_TRAINER_CLASS: &str = "TRAINER_CLASS_YOUNGSTER";
pub const DEFAULT_ENCOUNTER_MUSIC: &str = "TRAINER_ENCOUNTER_MUSIC_MALE";
pub const DEFAULT_TRAINER_PIC: &str = "TRAINER_PIC_YOUNGSTER";

pub const SPECIES_PREFIX: &str = "SPECIES_";
pub const ITEM_PREFIX: &str = "ITEM_";
pub const MOVE_PREFIX: &str = "MOVE_";
pub const TRAINER_CLASS_PREFIX: &str = "TRAINER_CLASS_";
pub const ENCOUNTER_MUSIC_PREFIX: &str = "TRAINER_ENCOUNTER_MUSIC_";
pub const TRAINER_PIC_PREFIX: &str = "TRAINER_PIC_";
pub const AI_SCRIPT_PREFIX: &str = "AI_SCRIPT_";

/// Human readable label for an enum token: `TRAINER_CLASS_AQUA_LEADER` with prefix
/// `TRAINER_CLASS_` becomes `Aqua Leader`.
pub fn display_label(token: &str, prefix: &str) -> String {
    let stem = token.strip_prefix(prefix).unwrap_or(token);
    stem.split('_')
        .filter(|word| !word.is_empty())
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inverse of [`display_label`].
pub fn token_from_label(label: &str, prefix: &str) -> String {
    let stem = label
        .split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>()
        .join("_");
    format!("{prefix}{stem}")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = first.to_ascii_uppercase().to_string();
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
            out
        }
        None => String::new(),
    }
}
