//! Remote catalog adapters and the scraping contract they satisfy.
//!
//! Each adapter turns one service's wire format into normalized
//! [`romdex_core::GameRecord`]s. Network access goes through the
//! [`transport::Transport`] seam so the full extraction pipeline can be
//! exercised against canned payloads.

pub mod adapter;
pub mod credentials;
pub mod error;
pub mod igdb;
pub mod options;
pub mod screenscraper;
pub mod transport;

pub use adapter::{SOURCE_NAMES, SourceAdapter, for_source};
pub use credentials::{Credentials, config_path};
pub use error::ScrapeError;
pub use igdb::IgdbAdapter;
pub use options::ScrapeOptions;
pub use screenscraper::ScreenScraperAdapter;
pub use transport::{HttpTransport, SourceRequest, Transport};
