pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod generator;
pub mod model;
pub mod orchestrator;
pub mod properties;
pub mod registry;
pub mod store;
pub mod synthesizer;

pub use command::ActionDescriptor;
pub use config::Config;
pub use error::{KotoError, Result};
pub use executor::{ExecutionResult, FailureKind};
pub use model::{LanguageModel, ModelError};
pub use orchestrator::Orchestrator;
pub use registry::SchemaRegistry;
pub use store::{DocumentStore, StoreError};
