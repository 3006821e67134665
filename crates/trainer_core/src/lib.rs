pub mod core_api;
pub mod gender;
pub mod layout;
pub mod lexer;
pub mod model;
pub mod party_table;
pub mod registry;
pub mod roster;
pub mod tokens;
pub mod trainer_table;
