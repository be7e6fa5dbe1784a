// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Picto Client
//!
//! Typed client for the Freepik icon API.
//!
//! ## Modules
//!
//! - [`client`] - [`IconClient`], one method per upstream operation
//! - [`poller`] - Bounded polling of AI generation tasks
//! - [`http`] - Authenticated transport and status classification
//! - [`asset`] - Fetching asset bytes from download links
//! - [`config`] - Base URL and timeout settings
//!
//! ## Example
//!
//! ```ignore
//! use picto_client::{IconClient, PollPolicy};
//! use picto_core::{GenerationRequest, SearchQuery};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = IconClient::new("my-api-key")?;
//! let results = client.search_icons(&SearchQuery::new("camera")).await?;
//!
//! let icon = client
//!     .generate_and_wait(
//!         &GenerationRequest::new("sun icon"),
//!         &PollPolicy::default(),
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! println!("{}", icon.url);
//! ```

pub mod asset;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod poller;

pub use asset::{AssetFetcher, FetchedAsset};
pub use client::IconClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, DAILY_QUOTA_GUIDANCE};
pub use http::{API_KEY_HEADER, HttpClient};
pub use poller::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, PollPolicy, TaskStatusSource,
    poll_until_complete,
};
