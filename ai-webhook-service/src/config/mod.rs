pub mod env_config;
pub mod webhook_config;
