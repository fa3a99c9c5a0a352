pub mod id_generator;
pub mod settings;

pub use id_generator::{IdGenerator, IdParts};
pub use settings::{InitOptions, SettingsStore, WriteOutcome};
