pub mod config;
pub mod setting;

pub use config::{LogConfig, LogFormat, LogLevel, LogOutput, StoreConfig};
pub use setting::Setting;
