pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod host;
pub mod memory;
pub mod params;
pub mod planning;

pub use agent::{AgentMode, ForagerAnt};
pub use error::{AgentError, CodecError, ConfigError};
