//! Book index integration for shelfseek.
//!
//! This crate provides:
//!
//! - **Config**: host and API credential for the book index service
//! - **Transport**: the HTTP seam, with a reqwest implementation
//! - **Search resolver**: keyword search returning ranked book records
//! - **Download resolver**: content hash resolution and download link lookup
//! - **Renderer**: pure formatting of results into reply text

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod model;
pub mod render;
pub mod search;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use client::BookIndexClient;
pub use config::BookIndexConfig;
pub use download::{DownloadResolver, Provenance, ResolvedIdentifier};
pub use error::{BookIndexError, TransportError};
pub use model::{BookRecord, DownloadLinkSet, SearchResult};
pub use render::{render_download_links, render_search_results};
pub use search::SearchResolver;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
