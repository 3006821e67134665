use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::layout::ProjectLayout;
use crate::tokens::{
    ENCOUNTER_MUSIC_PREFIX, ITEM_PREFIX, MOVE_PREFIX, SPECIES_PREFIX, TRAINER_CLASS_PREFIX,
    TRAINER_PIC_PREFIX, display_label,
};

use super::error::{CoreError, CoreErrorCode};

const FRONT_PIC_SUFFIX: &str = "_front_pic.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    Species,
    Items,
    Moves,
    TrainerClasses,
    EncounterMusic,
    TrainerPics,
}

impl ConstantKind {
    pub const ALL: [ConstantKind; 6] = [
        Self::Species,
        Self::Items,
        Self::Moves,
        Self::TrainerClasses,
        Self::EncounterMusic,
        Self::TrainerPics,
    ];

    pub fn prefix(&self) -> &'static str {
        match *self {
            Self::Species => SPECIES_PREFIX,
            Self::Items => ITEM_PREFIX,
            Self::Moves => MOVE_PREFIX,
            Self::TrainerClasses => TRAINER_CLASS_PREFIX,
            Self::EncounterMusic => ENCOUNTER_MUSIC_PREFIX,
            Self::TrainerPics => TRAINER_PIC_PREFIX,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Self::Species => "species",
            Self::Items => "items",
            Self::Moves => "moves",
            Self::TrainerClasses => "classes",
            Self::EncounterMusic => "music",
            Self::TrainerPics => "pics",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Enum tokens a project defines, for pickers and display labels. Never used to
/// reject values: tokens missing from the catalog are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstantCatalog {
    root: PathBuf,
    species: Vec<String>,
    items: Vec<String>,
    moves: Vec<String>,
    trainer_classes: Vec<String>,
    encounter_music: Vec<String>,
    trainer_pics: Vec<String>,
}

impl ConstantCatalog {
    pub fn load(layout: &ProjectLayout) -> Result<Self, CoreError> {
        let species_header = read_optional(&layout.species_header())?;
        let items_header = read_optional(&layout.items_header())?;
        let moves_header = read_optional(&layout.moves_header())?;
        let trainer_header = read_optional(&layout.trainer_constants_header())?;

        let catalog = Self {
            root: layout.root().to_path_buf(),
            species: parse_defines(&species_header, SPECIES_PREFIX),
            items: parse_defines(&items_header, ITEM_PREFIX),
            moves: parse_defines(&moves_header, MOVE_PREFIX),
            trainer_classes: parse_defines(&trainer_header, TRAINER_CLASS_PREFIX),
            encounter_music: parse_defines(&trainer_header, ENCOUNTER_MUSIC_PREFIX),
            trainer_pics: list_trainer_pics(&layout.front_pics_dir())?,
        };

        debug!(
            root = %catalog.root.display(),
            species = catalog.species.len(),
            items = catalog.items.len(),
            moves = catalog.moves.len(),
            pics = catalog.trainer_pics.len(),
            "loaded constant catalog"
        );
        Ok(catalog)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, kind: ConstantKind) -> &[String] {
        match kind {
            ConstantKind::Species => &self.species,
            ConstantKind::Items => &self.items,
            ConstantKind::Moves => &self.moves,
            ConstantKind::TrainerClasses => &self.trainer_classes,
            ConstantKind::EncounterMusic => &self.encounter_music,
            ConstantKind::TrainerPics => &self.trainer_pics,
        }
    }

    pub fn contains(&self, kind: ConstantKind, token: &str) -> bool {
        self.get(kind).iter().any(|known| known == token)
    }

    pub fn label(&self, kind: ConstantKind, token: &str) -> String {
        display_label(token, kind.prefix())
    }
}

fn read_optional(path: &Path) -> Result<String, CoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(CoreError::new(
            CoreErrorCode::Io,
            format!("failed to read {}: {e}", path.display()),
        )),
    }
}

/// Names of `#define` lines starting with `prefix`, in file order, without repeats.
pub fn parse_defines(text: &str, prefix: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("#define") {
            continue;
        }
        let Some(name) = tokens.next() else {
            continue;
        };
        if name.starts_with(prefix) && seen.insert(name) {
            out.push(name.to_string());
        }
    }
    out
}

/// `cool_trainer_m_front_pic.png` becomes `TRAINER_PIC_COOLTRAINER_M`.
pub fn trainer_pic_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(FRONT_PIC_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    let stem = stem.replace("cool_trainer", "COOLTRAINER");
    Some(format!("{TRAINER_PIC_PREFIX}{}", stem.to_ascii_uppercase()))
}

fn list_trainer_pics(dir: &Path) -> Result<Vec<String>, CoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(CoreError::new(
                CoreErrorCode::Io,
                format!("failed to list {}: {e}", dir.display()),
            ));
        }
    };

    let mut pics: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| trainer_pic_from_file_name(&entry.file_name().to_string_lossy()))
        .collect();
    pics.sort();
    pics.dedup();
    Ok(pics)
}
