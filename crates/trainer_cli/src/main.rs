use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use serde_json::Value as JsonValue;
use tracing::debug;
use tracing_subscriber::filter::EnvFilter;
use trainer_core::core_api::{
    ConstantCatalog, ConstantKind, CoreError, CoreErrorCode, Engine, FsArtifactSink, Session,
};
use trainer_core::gender::Gender;
use trainer_core::layout::ProjectLayout;
use trainer_core::model::{AiFlag, ITEM_CAPACITY, MOVE_SLOTS, Mon, PARTY_CAPACITY};
use trainer_render::{
    FieldSelection, JsonStyle, render_json_roster, render_json_trainer,
    render_json_trainer_selected, render_trainer_list, render_trainer_sheet,
};

const LOG_ENV: &str = "TRAINER_EDITOR_LOG";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FieldArg {
    Name,
    Class,
    Music,
    Gender,
    Pic,
    DoubleBattle,
    AiFlags,
    Items,
    Party,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct MonSpec {
    species: String,
    level: u8,
    iv: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct MoveEdit {
    slot: usize,
    position: usize,
    move_token: String,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "PROJECT_DIR", default_value = ".")]
    project: PathBuf,
    /// Print one `ID<TAB>name` line per trainer.
    #[arg(long)]
    list: bool,
    /// Trainer to show or edit.
    #[arg(long, value_name = "ID")]
    trainer: Option<String>,
    /// Print only these fields of the selected trainer.
    #[arg(long = "field", value_name = "FIELD")]
    fields: Vec<FieldArg>,
    #[arg(long)]
    json: bool,
    /// List the constants a project defines.
    #[arg(
        long,
        value_name = "species|items|moves|classes|music|pics",
        value_parser = parse_constant_kind
    )]
    catalog: Option<ConstantKind>,
    /// Create a trainer with a new empty party and select it.
    #[arg(long, value_name = "ID", requires = "party_id", conflicts_with = "trainer")]
    create: Option<String>,
    #[arg(long = "party-id", value_name = "PARTY_ID", requires = "create")]
    party_id: Option<String>,
    #[arg(long, value_name = "NAME", requires = "create")]
    name: Option<String>,
    #[arg(long = "set-name")]
    set_name: Option<String>,
    #[arg(long = "set-class", value_name = "TRAINER_CLASS")]
    set_class: Option<String>,
    #[arg(long = "set-music", value_name = "ENCOUNTER_MUSIC")]
    set_music: Option<String>,
    #[arg(long = "set-pic", value_name = "TRAINER_PIC")]
    set_pic: Option<String>,
    #[arg(long = "set-gender")]
    set_gender: Option<GenderArg>,
    #[arg(long = "set-double-battle", value_name = "true|false")]
    set_double_battle: Option<bool>,
    #[arg(long = "enable-ai", value_name = "FLAG", value_parser = parse_ai_flag)]
    enable_ai: Vec<AiFlag>,
    #[arg(long = "disable-ai", value_name = "FLAG", value_parser = parse_ai_flag)]
    disable_ai: Vec<AiFlag>,
    /// Set a trainer item; slots are numbered from 1.
    #[arg(long = "set-item", value_name = "SLOT=ITEM", value_parser = parse_item_slot)]
    set_item: Vec<(usize, String)>,
    /// Remove a trainer item; later items move up one slot.
    #[arg(long = "clear-item", value_name = "SLOT", value_parser = parse_item_slot_number)]
    clear_item: Vec<usize>,
    #[arg(long = "add-mon", value_name = "SPECIES[:LEVEL[:IV]]", value_parser = parse_mon_spec)]
    add_mon: Vec<MonSpec>,
    /// Remove a mon; later mons move up one slot.
    #[arg(long = "remove-mon", value_name = "SLOT", value_parser = parse_mon_slot_number)]
    remove_mon: Vec<usize>,
    #[arg(long = "set-held-item", value_name = "SLOT=ITEM", value_parser = parse_held_item)]
    set_held_item: Vec<(usize, String)>,
    #[arg(long = "set-move", value_name = "SLOT:POS=MOVE", value_parser = parse_move_edit)]
    set_move: Vec<MoveEdit>,
    /// New identifier for the selected trainer.
    #[arg(long, value_name = "ID")]
    rename: Option<String>,
    /// Write the edited tables back into the project.
    #[arg(long, conflicts_with = "output")]
    save: bool,
    /// Write the edited tables under another project root.
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
}

impl Cli {
    fn has_trainer_edits(&self) -> bool {
        self.set_name.is_some()
            || self.set_class.is_some()
            || self.set_music.is_some()
            || self.set_pic.is_some()
            || self.set_gender.is_some()
            || self.set_double_battle.is_some()
            || !self.enable_ai.is_empty()
            || !self.disable_ai.is_empty()
            || !self.set_item.is_empty()
            || !self.clear_item.is_empty()
            || !self.add_mon.is_empty()
            || !self.remove_mon.is_empty()
            || !self.set_held_item.is_empty()
            || !self.set_move.is_empty()
            || self.rename.is_some()
    }

    fn has_edits(&self) -> bool {
        self.create.is_some() || self.has_trainer_edits()
    }

    fn field_selection(&self) -> FieldSelection {
        let mut fields = FieldSelection::default();
        for field in &self.fields {
            match field {
                FieldArg::Name => fields.name = true,
                FieldArg::Class => fields.trainer_class = true,
                FieldArg::Music => fields.music = true,
                FieldArg::Gender => fields.gender = true,
                FieldArg::Pic => fields.trainer_pic = true,
                FieldArg::DoubleBattle => fields.double_battle = true,
                FieldArg::AiFlags => fields.ai_flags = true,
                FieldArg::Items => fields.items = true,
                FieldArg::Party => fields.party = true,
            }
        }
        fields
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let has_edits = cli.has_edits();
    let persists = cli.save || cli.output.is_some();

    if has_edits && !persists {
        eprintln!("edits require --save or --output <DIR>");
        process::exit(2);
    }
    if persists && !has_edits {
        eprintln!("--save and --output require at least one edit");
        process::exit(2);
    }
    if cli.has_trainer_edits() && cli.trainer.is_none() && cli.create.is_none() {
        eprintln!("edits require --trainer <ID> or --create <ID>");
        process::exit(2);
    }
    if !cli.fields.is_empty() && cli.trainer.is_none() && cli.create.is_none() {
        eprintln!("--field requires --trainer <ID>");
        process::exit(2);
    }

    let layout = ProjectLayout::new(&cli.project);

    if let Some(kind) = cli.catalog {
        print_catalog(&layout, kind, cli.json);
        return;
    }

    let engine = Engine::new();
    let mut session = engine.open_project(&layout).unwrap_or_else(|e| {
        eprintln!("Error opening project: {}", layout.root().display());
        eprintln!("  {}", e.message);
        process::exit(1);
    });

    let mut target = cli.trainer.clone();
    if let Some(trainer_id) = &cli.create {
        let party_id = cli.party_id.as_deref().unwrap_or_default();
        let name = cli.name.as_deref().unwrap_or_default();
        session
            .create_trainer(trainer_id, party_id, name)
            .unwrap_or_else(|e| fail("Error creating trainer", &e));
        target = Some(trainer_id.clone());
    }

    if let Some(trainer_id) = target.clone() {
        if cli.has_trainer_edits() {
            apply_trainer_edits(&mut session, &cli, &trainer_id)
                .unwrap_or_else(|e| fail("Error applying edit", &e));
        }
        if let Some(new_id) = &cli.rename {
            session
                .rename_trainer(&trainer_id, new_id)
                .unwrap_or_else(|e| fail("Error renaming trainer", &e));
            target = Some(new_id.clone());
        }
    }

    if has_edits {
        let out_layout = match &cli.output {
            Some(dir) => ProjectLayout::new(dir),
            None => layout.clone(),
        };
        let report = session
            .save(&mut FsArtifactSink::new(out_layout))
            .unwrap_or_else(|e| fail("Error saving project", &e));
        debug!(written = ?report.written, "save complete");

        if !cli.json && !cli.list && target.is_none() {
            println!(
                "Saved {} trainers and {} parties",
                report.trainer_count, report.party_count
            );
            return;
        }
    }

    if cli.list {
        if cli.json {
            print_json(&render_json_roster(&session, JsonStyle::CanonicalV1));
        } else {
            print!("{}", render_trainer_list(&session));
        }
        return;
    }

    let Some(trainer_id) = target else {
        if cli.json {
            print_json(&render_json_roster(&session, JsonStyle::CanonicalV1));
        } else {
            print!("{}", render_trainer_list(&session));
        }
        return;
    };

    let fields = cli.field_selection();
    if cli.json {
        let value = if fields.is_any_selected() {
            render_json_trainer_selected(&session, &trainer_id, &fields, JsonStyle::CanonicalV1)
        } else {
            render_json_trainer(&session, &trainer_id, JsonStyle::CanonicalV1)
        };
        let value = value.unwrap_or_else(|e| fail("Error rendering trainer", &e));
        print_json(&value);
        return;
    }

    if fields.is_any_selected() {
        let value =
            render_json_trainer_selected(&session, &trainer_id, &fields, JsonStyle::CanonicalV1)
                .unwrap_or_else(|e| fail("Error rendering trainer", &e));
        if let JsonValue::Object(map) = value {
            for (key, value) in map {
                println!("{key}={}", field_text(&value));
            }
        }
        return;
    }

    let sheet = render_trainer_sheet(&session, &trainer_id)
        .unwrap_or_else(|e| fail("Error rendering trainer", &e));
    print!("{sheet}");
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn fail(context: &str, err: &CoreError) -> ! {
    eprintln!("{context}: {}", err.message);
    process::exit(1);
}

fn apply_trainer_edits(
    session: &mut Session,
    cli: &Cli,
    trainer_id: &str,
) -> Result<(), CoreError> {
    if let Some(name) = &cli.set_name {
        session.set_trainer_name(trainer_id, name)?;
    }
    if let Some(class) = &cli.set_class {
        session.set_trainer_class(trainer_id, class)?;
    }
    if let Some(music) = &cli.set_music {
        session.set_music(trainer_id, music)?;
    }
    if let Some(pic) = &cli.set_pic {
        session.set_trainer_pic(trainer_id, pic)?;
    }
    if let Some(gender) = cli.set_gender {
        session.set_gender(trainer_id, to_core_gender(gender))?;
    }
    if let Some(double) = cli.set_double_battle {
        session.set_double_battle(trainer_id, double)?;
    }
    for flag in &cli.enable_ai {
        session.set_ai_flag(trainer_id, *flag, true)?;
    }
    for flag in &cli.disable_ai {
        session.set_ai_flag(trainer_id, *flag, false)?;
    }
    for (slot, item) in &cli.set_item {
        session.set_item(trainer_id, *slot, Some(item))?;
    }
    for slot in &cli.clear_item {
        session.set_item(trainer_id, *slot, None)?;
    }

    let has_party_edits = !cli.add_mon.is_empty()
        || !cli.remove_mon.is_empty()
        || !cli.set_held_item.is_empty()
        || !cli.set_move.is_empty();
    if !has_party_edits {
        return Ok(());
    }

    let party_id = session
        .trainer(trainer_id)?
        .party()
        .map(str::to_string)
        .ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::InvalidValue,
                format!("trainer {trainer_id} has no party"),
            )
        })?;

    for spec in &cli.add_mon {
        if session.party(&party_id)?.is_full() {
            return Err(CoreError::new(
                CoreErrorCode::InvalidValue,
                format!("party {party_id} already holds {PARTY_CAPACITY} mons"),
            ));
        }
        let mut mon = Mon::new(spec.species.clone());
        mon.iv = spec.iv;
        session.append_mon(&party_id, mon)?;
        let slot = session.party(&party_id)?.len() - 1;
        session.set_mon_level(&party_id, slot, spec.level)?;
    }
    for slot in &cli.remove_mon {
        session.remove_mon(&party_id, *slot)?;
    }
    for (slot, item) in &cli.set_held_item {
        session.set_held_item(&party_id, *slot, Some(item))?;
    }
    for edit in &cli.set_move {
        session.set_move(&party_id, edit.slot, edit.position, &edit.move_token)?;
    }
    Ok(())
}

fn print_catalog(layout: &ProjectLayout, kind: ConstantKind, json: bool) {
    let catalog =
        ConstantCatalog::load(layout).unwrap_or_else(|e| fail("Error reading constants", &e));
    let tokens = catalog.get(kind);
    if json {
        print_json(&JsonValue::Array(
            tokens.iter().cloned().map(JsonValue::String).collect(),
        ));
        return;
    }
    for token in tokens {
        println!("{token}\t{}", catalog.label(kind, token));
    }
}

fn print_json(value: &JsonValue) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn field_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(values) => values
            .iter()
            .map(field_text)
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(map) => map
            .get("identifier")
            .map(field_text)
            .unwrap_or_default(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn to_core_gender(gender: GenderArg) -> Gender {
    match gender {
        GenderArg::Male => Gender::Male,
        GenderArg::Female => Gender::Female,
    }
}

fn parse_constant_kind(value: &str) -> Result<ConstantKind, String> {
    ConstantKind::from_name(&value.to_ascii_lowercase()).ok_or_else(|| {
        format!("invalid constant kind '{value}', expected species|items|moves|classes|music|pics")
    })
}

fn parse_ai_flag(value: &str) -> Result<AiFlag, String> {
    AiFlag::from_name(value).ok_or_else(|| format!("unknown AI flag '{value}'"))
}

/// 1-based slot number from the command line to a 0-based index.
fn parse_slot(value: &str, capacity: usize, what: &str) -> Result<usize, String> {
    let slot: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid {what} slot '{value}'"))?;
    if !(1..=capacity).contains(&slot) {
        return Err(format!("{what} slot must be 1-{capacity}, got {slot}"));
    }
    Ok(slot - 1)
}

fn split_assignment<'a>(value: &'a str, shape: &str) -> Result<(&'a str, &'a str), String> {
    value
        .split_once('=')
        .filter(|(_, rhs)| !rhs.is_empty())
        .ok_or_else(|| format!("expected {shape}, got '{value}'"))
}

fn parse_item_slot_number(value: &str) -> Result<usize, String> {
    parse_slot(value, ITEM_CAPACITY, "item")
}

fn parse_mon_slot_number(value: &str) -> Result<usize, String> {
    parse_slot(value, PARTY_CAPACITY, "mon")
}

fn parse_item_slot(value: &str) -> Result<(usize, String), String> {
    let (slot, item) = split_assignment(value, "SLOT=ITEM")?;
    Ok((parse_item_slot_number(slot)?, item.to_string()))
}

fn parse_held_item(value: &str) -> Result<(usize, String), String> {
    let (slot, item) = split_assignment(value, "SLOT=ITEM")?;
    Ok((parse_mon_slot_number(slot)?, item.to_string()))
}

fn parse_move_edit(value: &str) -> Result<MoveEdit, String> {
    let (target, move_token) = split_assignment(value, "SLOT:POS=MOVE")?;
    let (slot, position) = target
        .split_once(':')
        .ok_or_else(|| format!("expected SLOT:POS=MOVE, got '{value}'"))?;
    Ok(MoveEdit {
        slot: parse_mon_slot_number(slot)?,
        position: parse_slot(position, MOVE_SLOTS, "move")?,
        move_token: move_token.to_string(),
    })
}

fn parse_mon_spec(value: &str) -> Result<MonSpec, String> {
    let mut parts = value.split(':');
    let species = parts
        .next()
        .filter(|species| !species.is_empty())
        .ok_or_else(|| format!("expected SPECIES[:LEVEL[:IV]], got '{value}'"))?;
    let level = match parts.next() {
        Some(level) => level
            .parse::<u8>()
            .map_err(|_| format!("invalid level '{level}'"))?,
        None => 1,
    };
    let iv = match parts.next() {
        Some(iv) => iv.parse::<u8>().map_err(|_| format!("invalid IV '{iv}'"))?,
        None => 0,
    };
    if parts.next().is_some() {
        return Err(format!("expected SPECIES[:LEVEL[:IV]], got '{value}'"));
    }
    Ok(MonSpec {
        species: species.to_string(),
        level,
        iv,
    })
}
