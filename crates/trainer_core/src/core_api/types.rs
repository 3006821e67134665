use crate::gender::Gender;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonView {
    pub slot: usize,
    pub species: String,
    pub level: u8,
    pub iv: u8,
    pub held_item: Option<String>,
    pub moves: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartyView {
    pub identifier: String,
    pub variant: String,
    pub mons: Vec<MonView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainerView {
    pub index: usize,
    pub identifier: String,
    pub name: String,
    pub trainer_class: String,
    pub music: String,
    pub gender: Gender,
    pub trainer_pic: String,
    pub double_battle: bool,
    pub ai_flags: Vec<String>,
    pub items: Vec<String>,
    pub party_flags: String,
    pub party: Option<PartyView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainerSummary {
    pub index: usize,
    pub identifier: String,
    pub name: String,
    pub party_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub trainer_count: usize,
    pub party_count: usize,
    pub trainers: Vec<TrainerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveReport {
    pub trainer_count: usize,
    pub party_count: usize,
    /// Destinations in write order, as reported by the sink.
    pub written: Vec<String>,
}
