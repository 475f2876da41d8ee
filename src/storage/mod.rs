//! 持久化模块

pub mod settings;

pub use settings::{JsonFileStore, MemoryStore, SettingsStore, StoredSettings};
