// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Picto Store
//!
//! Local state for Picto front ends.
//!
//! - **LibraryStore**: Favorites and recently-used history
//! - **SettingsStore**: Default download and generation preferences
//! - **keychain**: The API key in the system keychain
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use picto_store::{LibraryStore, SettingsStore};
//!
//! let library = LibraryStore::open_default();
//! library.add_favorite(&icon).await;
//!
//! let settings = SettingsStore::load_default().await;
//! let format = settings.default_format().await;
//! ```

pub mod error;
pub mod keychain;
pub mod library;
pub mod persistence;
pub mod settings_store;

pub use error::StoreError;
pub use library::{FavoriteIcon, HistoryEntry, LibraryStore, MAX_HISTORY};
pub use persistence::{
    default_config_dir, default_data_dir, default_settings_path, load_json,
    load_json_or_default, save_json,
};
pub use settings_store::{Preferences, SettingsStore};
