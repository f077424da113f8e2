//! Core library for the `skysense` weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather gateway abstraction and its Gemini implementation
//! - Search history persistence over a key-value store
//! - The application controller and theme classification
//! - Plain-text rendering of the current view
//!
//! It is used by `skysense-cli`, but can also be reused by other front ends.

pub mod config;
pub mod controller;
pub mod gateway;
pub mod history;
pub mod model;
pub mod render;
pub mod storage;
pub mod theme;

pub use config::{Config, GeminiConfig};
pub use controller::{Controller, PendingSearch, SEARCH_ERROR_MESSAGE};
pub use gateway::{GatewayError, WeatherGateway, gateway_from_config};
pub use history::{HistoryStore, merge_history};
pub use model::{HistoryEntry, Source, Status, Theme, Unit, WeatherSnapshot};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use theme::classify;
