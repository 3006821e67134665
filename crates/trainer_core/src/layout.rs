use std::io;
use std::path::{Path, PathBuf};

pub const PARTY_TABLE_PATH: &str = "src/data/trainer_parties.h";
pub const TRAINER_TABLE_PATH: &str = "src/data/trainers.h";
pub const REGISTRY_PATH: &str = "include/constants/opponents.h";
pub const SPECIES_HEADER_PATH: &str = "include/constants/species.h";
pub const ITEMS_HEADER_PATH: &str = "include/constants/items.h";
pub const MOVES_HEADER_PATH: &str = "include/constants/moves.h";
pub const TRAINER_CONSTANTS_PATH: &str = "include/constants/trainers.h";
pub const FRONT_PICS_DIR: &str = "graphics/trainers/front_pics";

/// The three artifacts written on save, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    PartyTable,
    TrainerTable,
    Registry,
}

impl ArtifactKind {
    pub const SAVE_ORDER: [ArtifactKind; 3] =
        [Self::PartyTable, Self::TrainerTable, Self::Registry];

    pub fn relative_path(&self) -> &'static str {
        match *self {
            Self::PartyTable => PARTY_TABLE_PATH,
            Self::TrainerTable => TRAINER_TABLE_PATH,
            Self::Registry => REGISTRY_PATH,
        }
    }
}

/// Locations of every file the editor reads or writes, relative to a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifact(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.relative_path())
    }

    pub fn party_table(&self) -> PathBuf {
        self.artifact(ArtifactKind::PartyTable)
    }

    pub fn trainer_table(&self) -> PathBuf {
        self.artifact(ArtifactKind::TrainerTable)
    }

    pub fn registry(&self) -> PathBuf {
        self.artifact(ArtifactKind::Registry)
    }

    pub fn species_header(&self) -> PathBuf {
        self.root.join(SPECIES_HEADER_PATH)
    }

    pub fn items_header(&self) -> PathBuf {
        self.root.join(ITEMS_HEADER_PATH)
    }

    pub fn moves_header(&self) -> PathBuf {
        self.root.join(MOVES_HEADER_PATH)
    }

    pub fn trainer_constants_header(&self) -> PathBuf {
        self.root.join(TRAINER_CONSTANTS_PATH)
    }

    pub fn front_pics_dir(&self) -> PathBuf {
        self.root.join(FRONT_PICS_DIR)
    }

    /// Checks that the inputs required to open a session exist.
    pub fn validate(&self) -> io::Result<()> {
        if !self.root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("project root {} is not a directory", self.root.display()),
            ));
        }

        for path in [self.party_table(), self.trainer_table()] {
            if !path.is_file() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("required input {} does not exist", path.display()),
                ));
            }
        }

        Ok(())
    }
}
