//! # wxrtools
//!
//! Streaming extraction of WordPress eXtended RSS (WXR) export files.
//!
//! An export is one `rss/channel` document that can run to gigabytes. This
//! crate walks it as a stream of XML events and hands each completed record
//! (site metadata, authors, channel images, podcast metadata, posts) to a
//! caller-supplied [`Handler`] as soon as its element closes. Consumed nodes
//! are discarded immediately, so memory stays proportional to nesting depth
//! rather than document size.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Namespace-aware matching that works across WXR 1.0 to 1.2 and renamed prefixes
//! - Tolerates malformed nesting and unclosed elements in real-world exports
//! - Optional repair pass through an external recovering parser (`xmllint`)
//!
//! ## Example
//!
//! ```no_run
//! use wxrtools::handler::CountingHandler;
//! use wxrtools::{ExtractorConfig, RepairConfig, extract_path};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stats = extract_path(
//!     Path::new("export.xml"),
//!     CountingHandler::new(std::io::stdout()),
//!     &RepairConfig::new(),
//!     &ExtractorConfig::new(),
//! )?;
//!
//! println!("{} items", stats.items);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod model;
pub mod namespace;
pub mod parser;
pub mod repair;
pub mod source;
pub mod streaming;

pub use config::{ExtractorConfig, RepairConfig};
pub use error::{Error, HandlerError, Result};
pub use handler::{Handler, HandlerResult};
pub use model::{Author, Blog, Comment, Image, Item, ItunesMetadata, ItunesValue, PostMeta, Term};
pub use namespace::{NamespaceRegistry, Vocabulary};
pub use streaming::{ExtractionStats, Extractor, extract_path};
