mod constant_catalog;
mod engine;
mod error;
mod types;

pub use constant_catalog::{
    ConstantCatalog, ConstantKind, parse_defines, trainer_pic_from_file_name,
};
pub use engine::{ArtifactSink, Engine, FsArtifactSink, MemoryArtifactSink, Session};
pub use error::{CoreError, CoreErrorCode};
pub use types::{MonView, PartyView, RosterSummary, SaveReport, TrainerSummary, TrainerView};
