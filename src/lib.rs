pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod frame;
pub mod gateway;
pub mod log;
pub mod plan;
pub mod profile;
pub mod prompt;
pub mod provider;
pub mod schema;
pub mod state;
pub mod ux;
pub mod wire;

pub use errors::{CoachError, CoachResult};
pub use gateway::Gateway;
