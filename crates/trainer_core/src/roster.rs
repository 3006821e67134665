use indexmap::IndexMap;
use tracing::debug;

use crate::layout::ArtifactKind;
use crate::lexer::ParseError;
use crate::model::{Party, Trainer};
use crate::party_table::{parse_party_table, write_party_table};
use crate::registry::write_registry;
use crate::tokens::SENTINEL_TRAINER;
use crate::trainer_table::{DanglingReference, parse_trainer_table, write_trainer_table};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("identifier {0} is already in use")]
    DuplicateIdentifier(String),
    #[error("no trainer named {0}")]
    UnknownTrainer(String),
    #[error("no party named {0}")]
    UnknownParty(String),
    #[error("TRAINER_NONE cannot be renamed or replaced")]
    Sentinel,
}

/// All trainers and parties of a project, in artifact order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    parties: IndexMap<String, Party>,
    trainers: IndexMap<String, Trainer>,
}

/// Text of the three output artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    pub party_table: String,
    pub trainer_table: String,
    pub registry: String,
}

impl RenderedArtifacts {
    pub fn get(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::PartyTable => &self.party_table,
            ArtifactKind::TrainerTable => &self.trainer_table,
            ArtifactKind::Registry => &self.registry,
        }
    }

    /// Artifacts in the order they must be written.
    pub fn in_save_order(&self) -> impl Iterator<Item = (ArtifactKind, &str)> + '_ {
        ArtifactKind::SAVE_ORDER
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    /// An empty roster holding only the sentinel trainer.
    pub fn new() -> Self {
        let mut trainers = IndexMap::new();
        trainers.insert(SENTINEL_TRAINER.to_string(), Trainer::new(SENTINEL_TRAINER));
        Self {
            parties: IndexMap::new(),
            trainers,
        }
    }

    /// Parses the party table first, then the trainer table against it.
    pub fn parse(
        party_artifact: &str,
        party_text: &str,
        trainer_artifact: &str,
        trainer_text: &str,
    ) -> Result<Self, ParseError> {
        let parties = parse_party_table(party_artifact, party_text)?;
        let trainers = parse_trainer_table(trainer_artifact, trainer_text, &parties)?;
        Ok(Self { parties, trainers })
    }

    pub fn parties(&self) -> &IndexMap<String, Party> {
        &self.parties
    }

    pub fn trainers(&self) -> &IndexMap<String, Trainer> {
        &self.trainers
    }

    pub fn trainer(&self, identifier: &str) -> Option<&Trainer> {
        self.trainers.get(identifier)
    }

    pub fn trainer_mut(&mut self, identifier: &str) -> Option<&mut Trainer> {
        self.trainers.get_mut(identifier)
    }

    pub fn party(&self, identifier: &str) -> Option<&Party> {
        self.parties.get(identifier)
    }

    pub fn party_mut(&mut self, identifier: &str) -> Option<&mut Party> {
        self.parties.get_mut(identifier)
    }

    /// The party a trainer references, if it has one and it exists.
    pub fn party_of(&self, trainer: &Trainer) -> Option<&Party> {
        trainer.party().and_then(|identifier| self.parties.get(identifier))
    }

    /// Registry index of a trainer.
    pub fn trainer_index(&self, identifier: &str) -> Option<usize> {
        self.trainers.get_index_of(identifier)
    }

    /// Creates a default trainer owning a new empty party. Neither is inserted when
    /// either identifier is taken.
    pub fn create_trainer(
        &mut self,
        trainer_identifier: &str,
        party_identifier: &str,
        name: &str,
    ) -> Result<&mut Trainer, RosterError> {
        if trainer_identifier == SENTINEL_TRAINER {
            return Err(RosterError::Sentinel);
        }
        if self.trainers.contains_key(trainer_identifier) {
            return Err(RosterError::DuplicateIdentifier(trainer_identifier.to_string()));
        }
        if self.parties.contains_key(party_identifier) {
            return Err(RosterError::DuplicateIdentifier(party_identifier.to_string()));
        }

        let mut trainer = Trainer::new(trainer_identifier);
        trainer.name = name.to_string();
        trainer.set_party(Some(party_identifier.to_string()));

        self.parties
            .insert(party_identifier.to_string(), Party::new(party_identifier));
        let (index, _) = self
            .trainers
            .insert_full(trainer_identifier.to_string(), trainer);
        debug!(
            trainer = trainer_identifier,
            party = party_identifier,
            index,
            "created trainer"
        );
        Ok(&mut self.trainers[index])
    }

    /// Renames a trainer in place; its registry index is unchanged.
    pub fn rename_trainer(&mut self, old: &str, new: &str) -> Result<(), RosterError> {
        if old == SENTINEL_TRAINER || new == SENTINEL_TRAINER {
            return Err(RosterError::Sentinel);
        }
        if old == new {
            return if self.trainers.contains_key(old) {
                Ok(())
            } else {
                Err(RosterError::UnknownTrainer(old.to_string()))
            };
        }
        if self.trainers.contains_key(new) {
            return Err(RosterError::DuplicateIdentifier(new.to_string()));
        }
        let Some((index, _, mut trainer)) = self.trainers.shift_remove_full(old) else {
            return Err(RosterError::UnknownTrainer(old.to_string()));
        };
        trainer.set_identifier(new.to_string());
        self.trainers.shift_insert(index, new.to_string(), trainer);
        Ok(())
    }

    /// Renames a party in place and rewrites every trainer reference to it.
    pub fn rename_party(&mut self, old: &str, new: &str) -> Result<(), RosterError> {
        if old == new {
            return if self.parties.contains_key(old) {
                Ok(())
            } else {
                Err(RosterError::UnknownParty(old.to_string()))
            };
        }
        if self.parties.contains_key(new) {
            return Err(RosterError::DuplicateIdentifier(new.to_string()));
        }
        let Some((index, _, mut party)) = self.parties.shift_remove_full(old) else {
            return Err(RosterError::UnknownParty(old.to_string()));
        };
        party.set_identifier(new.to_string());
        self.parties.shift_insert(index, new.to_string(), party);

        for trainer in self.trainers.values_mut() {
            if trainer.party() == Some(old) {
                trainer.set_party(Some(new.to_string()));
            }
        }
        Ok(())
    }

    pub fn revalidate_all(&mut self) {
        for party in self.parties.values_mut() {
            party.revalidate();
        }
    }

    /// First trainer (in order) whose party reference does not resolve.
    pub fn check_references(&self) -> Result<(), DanglingReference> {
        for trainer in self.trainers.values() {
            if trainer.is_sentinel() {
                continue;
            }
            if let Some(party) = trainer.party() {
                if !self.parties.contains_key(party) {
                    return Err(DanglingReference {
                        trainer: trainer.identifier().to_string(),
                        party: party.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Renders all three artifacts. Parties must be revalidated; the session does this
    /// before every save.
    pub fn render(&self) -> Result<RenderedArtifacts, DanglingReference> {
        self.check_references()?;
        let party_table = write_party_table(self.parties.values());
        let trainer_table = write_trainer_table(self.trainers.values(), &self.parties)?;
        let registry = write_registry(self.trainers.keys().map(String::as_str));
        Ok(RenderedArtifacts {
            party_table,
            trainer_table,
            registry,
        })
    }
}
