pub mod commands;
pub mod contracts;
pub mod engine;
pub mod error;
pub mod migrations;
pub mod pre_opening;
pub mod setup;
pub mod state;
mod store;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{CoreError, CoreResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
