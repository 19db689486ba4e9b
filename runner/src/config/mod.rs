mod config_content_provider;
mod config_manager;
mod config_serializer;
mod runner_config;
mod validate;

pub use config_content_provider::{ConfigContentProvider, FileContentConfigProvider};
pub use config_manager::ConfigManager;
pub use config_serializer::{ConfigSerializer, YamlConfigSerializer};
pub use runner_config::RunnerConfig;
pub use validate::Validate;
