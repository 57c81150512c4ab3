pub mod config;
pub mod constructors;
pub mod csv_codec;
pub mod error;
pub mod fetch;
pub mod leaderboard;
pub mod merge;
pub mod publish;
pub mod season;
mod utils;

pub use config::Config;
pub use error::{PipelineError, Result};
