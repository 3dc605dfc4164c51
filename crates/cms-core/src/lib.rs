//! # cms-core
//!
//! Client-side data access for a headless CMS: fetch one page document at a
//! time and read its text blocks, image blocks and block lists.
//!
//! ## Architecture
//!
//! - **Store** ([`PageStore`], [`StoreHandle`]): the current page plus its
//!   loading/error status. Pure state.
//! - **Loader** ([`PageLoader`]): fetches pages through a [`PageSource`], keeps
//!   at most one request in flight and drops stale results.
//! - **Accessors**: lookups by id on [`PageDocument`] and in [`accessors`].
//! - **Client** ([`CmsClient`], [`CmsProvider`]): the facade a UI talks to.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cms_core::{CmsClient, CmsConfig};
//!
//! # async fn run() -> cms_core::Result<()> {
//! let client = CmsClient::new(CmsConfig::from_env()?)?;
//! client.load_page_data("home").await?;
//! println!("{:?}", client.text_content("headline"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Only caller mistakes are returned as [`Error`]. Fetch failures become the
//! store's `Failed` state:
//!
//! ```rust
//! use cms_core::{Error, LoadStatus, PageStore};
//!
//! let mut store = PageStore::new();
//! let ticket = store.set_loading("home");
//! store.set_failed(&ticket, Error::NotFound("home".into()).to_string());
//! assert!(matches!(store.status(), LoadStatus::Failed(id, _) if id == "home"));
//! ```

/// Lookups by id against a page document
pub mod accessors;
/// Connection settings for the CMS endpoint
pub mod config;
/// Error types and result aliases
pub mod error;
pub mod loader;
pub mod provider;
/// Page sources, including the HTTP one
pub mod source;
pub mod store;
/// Page document data contracts
pub mod types;

mod client;

pub use client::CmsClient;
pub use config::{CmsConfig, CmsConfigOptions, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use loader::PageLoader;
pub use provider::CmsProvider;
pub use source::{HttpPageSource, PageSource};
pub use store::{PageStore, RequestTicket, StoreHandle};
pub use types::*;
