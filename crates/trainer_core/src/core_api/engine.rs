use std::cell::Cell;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::gender::Gender;
use crate::layout::{ArtifactKind, ProjectLayout};
use crate::model::{AiFlag, ITEM_CAPACITY, MOVE_SLOTS, Mon, PARTY_CAPACITY, Party, Trainer};
use crate::registry::read_registry;
use crate::roster::{RenderedArtifacts, Roster};

use super::error::{CoreError, CoreErrorCode};
use super::types::{MonView, PartyView, RosterSummary, SaveReport, TrainerSummary, TrainerView};

const MIN_LEVEL: u8 = 1;
const MAX_LEVEL: u8 = 100;

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// Receives the rendered artifacts of a save, one call per artifact in write order.
pub trait ArtifactSink {
    /// Stores one artifact and returns a description of where it went.
    fn write_artifact(&mut self, kind: ArtifactKind, contents: &str) -> Result<String, CoreError>;
}

/// Writes artifacts under a project root, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    layout: ProjectLayout,
}

impl FsArtifactSink {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }
}

impl ArtifactSink for FsArtifactSink {
    fn write_artifact(&mut self, kind: ArtifactKind, contents: &str) -> Result<String, CoreError> {
        let path = self.layout.artifact(kind);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CoreError::new(
                    CoreErrorCode::Io,
                    format!("failed to create {}: {e}", parent.display()),
                )
            })?;
        }
        fs::write(&path, contents).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to write {}: {e}", path.display()),
            )
        })?;
        Ok(path.display().to_string())
    }
}

/// Collects artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactSink {
    pub written: Vec<(ArtifactKind, String)>,
}

impl MemoryArtifactSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&str> {
        self.written
            .iter()
            .find(|(written, _)| *written == kind)
            .map(|(_, contents)| contents.as_str())
    }
}

impl ArtifactSink for MemoryArtifactSink {
    fn write_artifact(&mut self, kind: ArtifactKind, contents: &str) -> Result<String, CoreError> {
        self.written.push((kind, contents.to_string()));
        Ok(kind.relative_path().to_string())
    }
}

#[derive(Debug)]
pub struct Session {
    roster: Roster,
    saving: Cell<bool>,
}

struct SaveGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> SaveGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Loads both tables of a project. Either everything parses or no session is
    /// returned.
    pub fn open_project(&self, layout: &ProjectLayout) -> Result<Session, CoreError> {
        layout.validate().map_err(|e| CoreError::new(CoreErrorCode::Io, e.to_string()))?;

        let party_text = read_text(&layout.party_table())?;
        let trainer_text = read_text(&layout.trainer_table())?;
        let session = self.open_texts(&party_text, &trainer_text)?;

        let registry_path = layout.registry();
        if registry_path.is_file() {
            let registry_text = read_text(&registry_path)?;
            check_registry_order(&session.roster, &registry_path, &registry_text);
        }

        debug!(
            root = %layout.root().display(),
            trainers = session.roster.trainers().len(),
            parties = session.roster.parties().len(),
            "opened project"
        );
        Ok(session)
    }

    /// Parses in-memory copies of the party and trainer tables.
    pub fn open_texts(&self, party_text: &str, trainer_text: &str) -> Result<Session, CoreError> {
        let roster = Roster::parse(
            ArtifactKind::PartyTable.relative_path(),
            party_text,
            ArtifactKind::TrainerTable.relative_path(),
            trainer_text,
        )?;
        Ok(Session::from_roster(roster))
    }

    /// A session holding only the sentinel trainer.
    pub fn new_session(&self) -> Session {
        Session::from_roster(Roster::new())
    }
}

fn read_text(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Io,
            format!("failed to read {}: {e}", path.display()),
        )
    })
}

fn check_registry_order(roster: &Roster, path: &Path, text: &str) {
    let entries = match read_registry(&path.display().to_string(), text) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable trainer registry");
            return;
        }
    };
    for (identifier, index) in entries {
        if roster.trainer_index(&identifier) != Some(index) {
            warn!(
                trainer = identifier,
                registry_index = index,
                "registry disagrees with trainer table order; it will be regenerated on save"
            );
            return;
        }
    }
}

impl Session {
    pub fn from_roster(roster: Roster) -> Self {
        Self {
            roster,
            saving: Cell::new(false),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    // --- Queries ---

    pub fn trainer(&self, identifier: &str) -> Result<&Trainer, CoreError> {
        self.roster
            .trainer(identifier)
            .ok_or_else(|| not_found("trainer", identifier))
    }

    pub fn party(&self, identifier: &str) -> Result<&Party, CoreError> {
        self.roster
            .party(identifier)
            .ok_or_else(|| not_found("party", identifier))
    }

    pub fn trainer_party(&self, identifier: &str) -> Result<Option<&Party>, CoreError> {
        let trainer = self.trainer(identifier)?;
        Ok(self.roster.party_of(trainer))
    }

    pub fn compact_items(&self, identifier: &str) -> Result<Vec<String>, CoreError> {
        Ok(self
            .trainer(identifier)?
            .compact_items()
            .map(str::to_string)
            .collect())
    }

    pub fn compact_mons(&self, party: &str) -> Result<Vec<Mon>, CoreError> {
        Ok(self.party(party)?.compact_mons().cloned().collect())
    }

    pub fn encode_ai_flags(&self, identifier: &str) -> Result<String, CoreError> {
        Ok(self.trainer(identifier)?.encode_ai_flags())
    }

    pub fn encode_party_flags(&self, identifier: &str) -> Result<String, CoreError> {
        let trainer = self.trainer(identifier)?;
        let party = if trainer.is_sentinel() {
            None
        } else {
            self.roster.party_of(trainer)
        };
        Ok(trainer.encode_party_flags(party))
    }

    pub fn summary(&self) -> RosterSummary {
        let trainers = self
            .roster
            .trainers()
            .values()
            .enumerate()
            .map(|(index, trainer)| TrainerSummary {
                index,
                identifier: trainer.identifier().to_string(),
                name: trainer.name.clone(),
                party_size: self.roster.party_of(trainer).map_or(0, Party::len),
            })
            .collect();
        RosterSummary {
            trainer_count: self.roster.trainers().len(),
            party_count: self.roster.parties().len(),
            trainers,
        }
    }

    pub fn trainer_view(&self, identifier: &str) -> Result<TrainerView, CoreError> {
        let trainer = self.trainer(identifier)?;
        let index = self
            .roster
            .trainer_index(identifier)
            .ok_or_else(|| not_found("trainer", identifier))?;
        let party = self.roster.party_of(trainer);

        Ok(TrainerView {
            index,
            identifier: trainer.identifier().to_string(),
            name: trainer.name.clone(),
            trainer_class: trainer.trainer_class.clone(),
            music: trainer.music.clone(),
            gender: trainer.gender,
            trainer_pic: trainer.trainer_pic.clone(),
            double_battle: trainer.double_battle,
            ai_flags: trainer
                .ai_flags
                .enabled()
                .map(|flag| flag.name().to_string())
                .collect(),
            items: trainer.compact_items().map(str::to_string).collect(),
            party_flags: self.encode_party_flags(identifier)?,
            party: party.map(party_view),
        })
    }

    // --- Trainer edits ---

    pub fn set_trainer_name(&mut self, identifier: &str, name: &str) -> Result<(), CoreError> {
        self.trainer_mut(identifier)?.name = name.to_string();
        Ok(())
    }

    pub fn set_trainer_class(&mut self, identifier: &str, class: &str) -> Result<(), CoreError> {
        self.trainer_mut(identifier)?.trainer_class = class.to_string();
        Ok(())
    }

    pub fn set_music(&mut self, identifier: &str, music: &str) -> Result<(), CoreError> {
        self.trainer_mut(identifier)?.music = music.to_string();
        Ok(())
    }

    pub fn set_gender(&mut self, identifier: &str, gender: Gender) -> Result<(), CoreError> {
        self.trainer_mut(identifier)?.gender = gender;
        Ok(())
    }

    pub fn set_trainer_pic(&mut self, identifier: &str, pic: &str) -> Result<(), CoreError> {
        self.trainer_mut(identifier)?.trainer_pic = pic.to_string();
        Ok(())
    }

    pub fn set_double_battle(&mut self, identifier: &str, double: bool) -> Result<(), CoreError> {
        self.trainer_mut(identifier)?.double_battle = double;
        Ok(())
    }

    pub fn set_ai_flag(
        &mut self,
        identifier: &str,
        flag: AiFlag,
        enabled: bool,
    ) -> Result<(), CoreError> {
        self.trainer_mut(identifier)?.ai_flags.set(flag, enabled);
        Ok(())
    }

    /// Sets an occupied item slot or the next free one; `None` removes the item and
    /// shifts the rest forward.
    pub fn set_item(
        &mut self,
        identifier: &str,
        slot: usize,
        item: Option<&str>,
    ) -> Result<(), CoreError> {
        let trainer = self.trainer_mut(identifier)?;
        let Some(item) = item else {
            return trainer.remove_item(slot).map(drop).ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::InvalidValue,
                    format!("trainer {identifier} has no item in slot {slot}"),
                )
            });
        };
        let count = trainer.item_count();
        if slot > count || slot >= ITEM_CAPACITY {
            return Err(CoreError::new(
                CoreErrorCode::InvalidValue,
                format!("trainer {identifier} has {count} items; cannot set slot {slot}"),
            ));
        }
        trainer.set_item(slot, Some(item.to_string()));
        Ok(())
    }

    /// Appends an item to the trainer's item list.
    ///
    /// # Panics
    ///
    /// Panics when the list is already full, like [`Trainer::append_item`].
    pub fn append_item(&mut self, identifier: &str, item: &str) -> Result<(), CoreError> {
        self.trainer_mut(identifier)?.append_item(item);
        Ok(())
    }

    /// Points a trainer at an existing party, or at none.
    pub fn assign_party(&mut self, identifier: &str, party: Option<&str>) -> Result<(), CoreError> {
        if let Some(party) = party {
            self.party(party)?;
        }
        self.trainer_mut(identifier)?
            .set_party(party.map(str::to_string));
        Ok(())
    }

    pub fn create_trainer(
        &mut self,
        trainer_identifier: &str,
        party_identifier: &str,
        name: &str,
    ) -> Result<(), CoreError> {
        self.roster
            .create_trainer(trainer_identifier, party_identifier, name)?;
        Ok(())
    }

    pub fn rename_trainer(&mut self, old: &str, new: &str) -> Result<(), CoreError> {
        self.roster.rename_trainer(old, new)?;
        Ok(())
    }

    pub fn rename_party(&mut self, old: &str, new: &str) -> Result<(), CoreError> {
        self.roster.rename_party(old, new)?;
        Ok(())
    }

    // --- Party edits ---

    /// Appends a mon to a party.
    ///
    /// # Panics
    ///
    /// Panics when the party already holds six mons, like [`Party::append_mon`].
    pub fn append_mon(&mut self, party: &str, mon: Mon) -> Result<(), CoreError> {
        self.party_mut(party)?.append_mon(mon);
        Ok(())
    }

    pub fn set_mon(&mut self, party: &str, slot: usize, mon: Mon) -> Result<(), CoreError> {
        let target = self.party_mut(party)?;
        let len = target.len();
        if slot > len || slot >= PARTY_CAPACITY {
            return Err(CoreError::new(
                CoreErrorCode::InvalidValue,
                format!("party {party} has {len} mons; cannot set slot {slot}"),
            ));
        }
        target.set_mon(slot, mon);
        Ok(())
    }

    pub fn remove_mon(&mut self, party: &str, slot: usize) -> Result<Mon, CoreError> {
        self.party_mut(party)?
            .remove_mon(slot)
            .ok_or_else(|| empty_slot(party, slot))
    }

    pub fn set_mon_species(
        &mut self,
        party: &str,
        slot: usize,
        species: &str,
    ) -> Result<(), CoreError> {
        self.edit_mon(party, slot, |mon| mon.species = species.to_string())
    }

    pub fn set_mon_level(&mut self, party: &str, slot: usize, level: u8) -> Result<(), CoreError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(CoreError::new(
                CoreErrorCode::InvalidValue,
                format!("invalid level {level}, expected {MIN_LEVEL}-{MAX_LEVEL}"),
            ));
        }
        self.edit_mon(party, slot, |mon| mon.level = level)
    }

    pub fn set_mon_iv(&mut self, party: &str, slot: usize, iv: u8) -> Result<(), CoreError> {
        self.edit_mon(party, slot, |mon| mon.iv = iv)
    }

    /// Sets or clears one mon's held item. A cleared item comes back as `ITEM_NONE`
    /// while another mon in the party still holds an item.
    pub fn set_held_item(
        &mut self,
        party: &str,
        slot: usize,
        item: Option<&str>,
    ) -> Result<(), CoreError> {
        self.edit_mon(party, slot, |mon| mon.set_held_item(item.map(str::to_string)))
    }

    pub fn set_move(
        &mut self,
        party: &str,
        slot: usize,
        position: usize,
        move_token: &str,
    ) -> Result<(), CoreError> {
        if position >= MOVE_SLOTS {
            return Err(CoreError::new(
                CoreErrorCode::InvalidValue,
                format!("invalid move position {position}, expected 0..{}", MOVE_SLOTS - 1),
            ));
        }
        self.edit_mon(party, slot, |mon| mon.set_move(position, move_token))
    }

    pub fn strip_held_items(&mut self, party: &str) -> Result<(), CoreError> {
        self.party_mut(party)?.strip_held_items();
        Ok(())
    }

    pub fn strip_moves(&mut self, party: &str) -> Result<(), CoreError> {
        self.party_mut(party)?.strip_moves();
        Ok(())
    }

    pub fn revalidate(&mut self, party: &str) -> Result<(), CoreError> {
        self.party_mut(party)?.revalidate();
        Ok(())
    }

    // --- Persistence ---

    /// Renders all three artifacts from a freshly revalidated copy of the roster.
    pub fn render_artifacts(&self) -> Result<RenderedArtifacts, CoreError> {
        let mut roster = self.roster.clone();
        roster.revalidate_all();
        Ok(roster.render()?)
    }

    /// Renders everything, then hands the artifacts to `sink` in write order. Nothing
    /// reaches the sink when rendering fails.
    pub fn save(&self, sink: &mut dyn ArtifactSink) -> Result<SaveReport, CoreError> {
        let Some(_guard) = SaveGuard::acquire(&self.saving) else {
            return Err(CoreError::new(
                CoreErrorCode::SaveInProgress,
                "a save is already in progress",
            ));
        };

        let artifacts = self.render_artifacts()?;
        let mut written = Vec::with_capacity(ArtifactKind::SAVE_ORDER.len());
        for (kind, contents) in artifacts.in_save_order() {
            written.push(sink.write_artifact(kind, contents)?);
        }

        debug!(?written, "saved artifacts");
        Ok(SaveReport {
            trainer_count: self.roster.trainers().len(),
            party_count: self.roster.parties().len(),
            written,
        })
    }

    pub fn is_saving(&self) -> bool {
        self.saving.get()
    }

    fn trainer_mut(&mut self, identifier: &str) -> Result<&mut Trainer, CoreError> {
        self.roster
            .trainer_mut(identifier)
            .ok_or_else(|| not_found("trainer", identifier))
    }

    fn party_mut(&mut self, identifier: &str) -> Result<&mut Party, CoreError> {
        self.roster
            .party_mut(identifier)
            .ok_or_else(|| not_found("party", identifier))
    }

    fn edit_mon(
        &mut self,
        party: &str,
        slot: usize,
        f: impl FnOnce(&mut Mon),
    ) -> Result<(), CoreError> {
        self.party_mut(party)?
            .edit_mon(slot, f)
            .ok_or_else(|| empty_slot(party, slot))
    }
}

fn party_view(party: &Party) -> PartyView {
    PartyView {
        identifier: party.identifier().to_string(),
        variant: party.variant().tag().to_string(),
        mons: party
            .compact_mons()
            .enumerate()
            .map(|(slot, mon)| MonView {
                slot,
                species: mon.species.clone(),
                level: mon.level,
                iv: mon.iv,
                held_item: mon.held_item.clone(),
                moves: mon.moves.as_ref().map(|moves| moves.to_vec()),
            })
            .collect(),
    }
}

fn not_found(kind: &str, identifier: &str) -> CoreError {
    CoreError::new(CoreErrorCode::NotFound, format!("no {kind} named {identifier}"))
}

fn empty_slot(party: &str, slot: usize) -> CoreError {
    CoreError::new(
        CoreErrorCode::InvalidValue,
        format!("party {party} has no mon in slot {slot}"),
    )
}
