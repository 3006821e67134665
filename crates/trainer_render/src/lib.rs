use std::fmt::Write as _;

use serde_json::{Map as JsonMap, Value as JsonValue};
use trainer_core::core_api::{CoreError, MonView, PartyView, Session, TrainerView};
use trainer_core::tokens::{
    AI_SCRIPT_PREFIX, ENCOUNTER_MUSIC_PREFIX, ITEM_PREFIX, MOVE_PREFIX, SPECIES_PREFIX,
    TRAINER_CLASS_PREFIX, TRAINER_PIC_PREFIX, display_label,
};

const TWO_COL_WIDTH_LEFT: usize = 30;
const MON_COL_SLOT: usize = 3;
const MON_COL_SPECIES: usize = 14;
const MON_COL_LEVEL: usize = 4;
const MON_COL_IV: usize = 4;
const MON_COL_ITEM: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

/// Fields of a trainer emitted by [`render_json_trainer_selected`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: bool,
    pub trainer_class: bool,
    pub music: bool,
    pub gender: bool,
    pub trainer_pic: bool,
    pub double_battle: bool,
    pub ai_flags: bool,
    pub items: bool,
    pub party: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.name
            || self.trainer_class
            || self.music
            || self.gender
            || self.trainer_pic
            || self.double_battle
            || self.ai_flags
            || self.items
            || self.party
    }
}

pub fn render_json_trainer(
    session: &Session,
    identifier: &str,
    style: JsonStyle,
) -> Result<JsonValue, CoreError> {
    let view = session.trainer_view(identifier)?;
    Ok(match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(trainer_json(&view)),
    })
}

pub fn render_json_trainer_selected(
    session: &Session,
    identifier: &str,
    fields: &FieldSelection,
    style: JsonStyle,
) -> Result<JsonValue, CoreError> {
    let view = session.trainer_view(identifier)?;
    Ok(match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(selected_json(&view, fields)),
    })
}

pub fn render_json_roster(session: &Session, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(roster_json(session)),
    }
}

/// One `IDENTIFIER<TAB>name` line per trainer, in registry order.
pub fn render_trainer_list(session: &Session) -> String {
    let mut out = String::new();
    for trainer in session.summary().trainers {
        writeln!(&mut out, "{}\t{}", trainer.identifier, trainer.name)
            .expect("writing to String cannot fail");
    }
    out
}

pub fn render_trainer_sheet(session: &Session, identifier: &str) -> Result<String, CoreError> {
    let view = session.trainer_view(identifier)?;
    Ok(trainer_sheet(&view))
}

fn trainer_json(view: &TrainerView) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert("index".to_string(), JsonValue::from(view.index));
    out.insert(
        "identifier".to_string(),
        JsonValue::String(view.identifier.clone()),
    );
    out.insert("name".to_string(), JsonValue::String(view.name.clone()));
    out.insert(
        "trainer_class".to_string(),
        JsonValue::String(view.trainer_class.clone()),
    );
    out.insert("music".to_string(), JsonValue::String(view.music.clone()));
    out.insert(
        "gender".to_string(),
        JsonValue::String(view.gender.to_string()),
    );
    out.insert(
        "trainer_pic".to_string(),
        JsonValue::String(view.trainer_pic.clone()),
    );
    out.insert(
        "double_battle".to_string(),
        JsonValue::Bool(view.double_battle),
    );
    out.insert("ai_flags".to_string(), strings_to_json(&view.ai_flags));
    out.insert("items".to_string(), strings_to_json(&view.items));
    out.insert(
        "party_flags".to_string(),
        JsonValue::String(view.party_flags.clone()),
    );
    out.insert("party".to_string(), party_to_json(view.party.as_ref()));
    out
}

fn selected_json(view: &TrainerView, fields: &FieldSelection) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    if fields.name {
        out.insert("name".to_string(), JsonValue::String(view.name.clone()));
    }
    if fields.trainer_class {
        out.insert(
            "trainer_class".to_string(),
            JsonValue::String(view.trainer_class.clone()),
        );
    }
    if fields.music {
        out.insert("music".to_string(), JsonValue::String(view.music.clone()));
    }
    if fields.gender {
        out.insert(
            "gender".to_string(),
            JsonValue::String(view.gender.to_string()),
        );
    }
    if fields.trainer_pic {
        out.insert(
            "trainer_pic".to_string(),
            JsonValue::String(view.trainer_pic.clone()),
        );
    }
    if fields.double_battle {
        out.insert(
            "double_battle".to_string(),
            JsonValue::Bool(view.double_battle),
        );
    }
    if fields.ai_flags {
        out.insert("ai_flags".to_string(), strings_to_json(&view.ai_flags));
    }
    if fields.items {
        out.insert("items".to_string(), strings_to_json(&view.items));
    }
    if fields.party {
        out.insert("party".to_string(), party_to_json(view.party.as_ref()));
    }
    out
}

fn roster_json(session: &Session) -> JsonMap<String, JsonValue> {
    let summary = session.summary();
    let mut out = JsonMap::new();
    out.insert(
        "trainer_count".to_string(),
        JsonValue::from(summary.trainer_count),
    );
    out.insert(
        "party_count".to_string(),
        JsonValue::from(summary.party_count),
    );
    out.insert(
        "trainers".to_string(),
        JsonValue::Array(
            summary
                .trainers
                .iter()
                .map(|trainer| {
                    let mut m = JsonMap::new();
                    m.insert("index".to_string(), JsonValue::from(trainer.index));
                    m.insert(
                        "identifier".to_string(),
                        JsonValue::String(trainer.identifier.clone()),
                    );
                    m.insert("name".to_string(), JsonValue::String(trainer.name.clone()));
                    m.insert("party_size".to_string(), JsonValue::from(trainer.party_size));
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    out
}

fn party_to_json(party: Option<&PartyView>) -> JsonValue {
    let Some(party) = party else {
        return JsonValue::Null;
    };
    let mut m = JsonMap::new();
    m.insert(
        "identifier".to_string(),
        JsonValue::String(party.identifier.clone()),
    );
    m.insert(
        "variant".to_string(),
        JsonValue::String(party.variant.clone()),
    );
    m.insert(
        "mons".to_string(),
        JsonValue::Array(party.mons.iter().map(mon_to_json).collect()),
    );
    JsonValue::Object(m)
}

fn mon_to_json(mon: &MonView) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("slot".to_string(), JsonValue::from(mon.slot));
    m.insert("species".to_string(), JsonValue::String(mon.species.clone()));
    m.insert("level".to_string(), JsonValue::from(mon.level));
    m.insert("iv".to_string(), JsonValue::from(mon.iv));
    if let Some(item) = &mon.held_item {
        m.insert("held_item".to_string(), JsonValue::String(item.clone()));
    }
    if let Some(moves) = &mon.moves {
        m.insert("moves".to_string(), strings_to_json(moves));
    }
    JsonValue::Object(m)
}

fn strings_to_json(values: &[String]) -> JsonValue {
    JsonValue::Array(values.iter().cloned().map(JsonValue::String).collect())
}

fn trainer_sheet(view: &TrainerView) -> String {
    let mut out = String::new();
    writeln!(&mut out, "{}  (#{})", view.identifier, view.index)
        .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    let rows = [
        (
            format!("Name: {}", view.name),
            format!(
                "Class: {}",
                display_label(&view.trainer_class, TRAINER_CLASS_PREFIX)
            ),
        ),
        (
            format!("Gender: {}", view.gender),
            format!(
                "Music: {}",
                display_label(&view.music, ENCOUNTER_MUSIC_PREFIX)
            ),
        ),
        (
            format!(
                "Double Battle: {}",
                if view.double_battle { "Yes" } else { "No" }
            ),
            format!(
                "Sprite: {}",
                display_label(&view.trainer_pic, TRAINER_PIC_PREFIX)
            ),
        ),
    ];
    for (left, right) in rows {
        let line = format!(
            "  {:<w$}{}",
            fit_column(&left, TWO_COL_WIDTH_LEFT - 1),
            right,
            w = TWO_COL_WIDTH_LEFT
        );
        writeln!(&mut out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    let ai = if view.ai_flags.is_empty() {
        "None".to_string()
    } else {
        labels(&view.ai_flags, AI_SCRIPT_PREFIX)
    };
    writeln!(&mut out, "  AI: {ai}").expect("writing to String cannot fail");
    let items = if view.items.is_empty() {
        "None".to_string()
    } else {
        labels(&view.items, ITEM_PREFIX)
    };
    writeln!(&mut out, "  Items: {items}").expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    match &view.party {
        Some(party) => write_party_section(&mut out, party),
        None => writeln!(&mut out, "  Party: None").expect("writing to String cannot fail"),
    }
    out
}

fn write_party_section(out: &mut String, party: &PartyView) {
    writeln!(out, "  Party: {} ({})", party.identifier, party.variant)
        .expect("writing to String cannot fail");
    if party.mons.is_empty() {
        return;
    }

    let header = format!(
        "  {:>s$}  {:<p$}{:>l$}{:>i$}  {:<h$}Moves",
        "#",
        "Species",
        "Lv",
        "IV",
        "Item",
        s = MON_COL_SLOT,
        p = MON_COL_SPECIES,
        l = MON_COL_LEVEL,
        i = MON_COL_IV,
        h = MON_COL_ITEM,
    );
    writeln!(out, "{header}").expect("writing to String cannot fail");

    for mon in &party.mons {
        let item = mon
            .held_item
            .as_deref()
            .map_or_else(|| "-".to_string(), |item| display_label(item, ITEM_PREFIX));
        let moves = mon
            .moves
            .as_deref()
            .map_or_else(|| "Default".to_string(), |moves| labels(moves, MOVE_PREFIX));
        let line = format!(
            "  {:>s$}  {:<p$}{:>l$}{:>i$}  {:<h$}{}",
            mon.slot + 1,
            fit_column(&display_label(&mon.species, SPECIES_PREFIX), MON_COL_SPECIES - 1),
            mon.level,
            mon.iv,
            fit_column(&item, MON_COL_ITEM - 1),
            moves,
            s = MON_COL_SLOT,
            p = MON_COL_SPECIES,
            l = MON_COL_LEVEL,
            i = MON_COL_IV,
            h = MON_COL_ITEM,
        );
        writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
}

fn labels(tokens: &[String], prefix: &str) -> String {
    tokens
        .iter()
        .map(|token| display_label(token, prefix))
        .collect::<Vec<_>>()
        .join(", ")
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}
