//! Error types for WXR extraction
//!
//! All errors carry an error code prefix so failures can be categorized from
//! log output alone.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and repair errors
//! - **E2xxx**: XML tokenizing and namespace errors
//! - **E5xxx**: Handler errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error reading the export file
//! - `E1002`: The repair tool could not recover the document
//! - `E1003`: The repair tool could not be started
//! - `E2001`: XML parsing error
//! - `E2002`: XML attribute error
//! - `E2003`: Malformed input that recovery could not get past
//! - `E2004`: Namespace prefix was never declared
//! - `E5001`: A handler rejected a record
//! - `E5002`: No handler is registered under the requested name

use std::io;
use thiserror::Error;

/// Result type for WXR operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by [`Handler`](crate::handler::Handler) implementations
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while repairing or extracting an export file
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading the file
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - File not found
    /// - Insufficient permissions
    /// - Temporary file could not be created
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// The repair tool ran but could not produce a usable document
    ///
    /// **Error Code**: E1002
    ///
    /// Carries the diagnostic text the tool wrote to its error stream.
    #[error("[E1002] XML repair failed: {0}")]
    RepairFailed(String),

    /// The repair tool could not be started
    ///
    /// **Error Code**: E1003
    ///
    /// **Suggestions**:
    /// - Install `xmllint` (libxml2 utilities)
    /// - Run with repair disabled if the export is known to be well-formed
    #[error("[E1003] XML repair tool '{program}' unavailable: {source}")]
    RepairUnavailable {
        /// Program that failed to spawn
        program: String,
        /// Underlying spawn error
        #[source]
        source: io::Error,
    },

    /// XML parsing error
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Invalid byte sequences that survived repair
    /// - Invalid character encoding
    #[error("[E2001] XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    ///
    /// **Error Code**: E2002
    #[error("[E2002] XML attribute error: {0}")]
    XmlAttr(String),

    /// Malformed input the event source could not recover from
    ///
    /// **Error Code**: E2003
    #[error("[E2003] Malformed input: {0}")]
    MalformedInput(String),

    /// A namespace prefix was used that was never declared
    ///
    /// **Error Code**: E2004
    ///
    /// Only returned by
    /// [`NamespaceRegistry::resolve`](crate::namespace::NamespaceRegistry::resolve).
    /// The extractor treats the tag as unqualified instead of failing.
    #[error("[E2004] Unknown namespace prefix: {0}")]
    UnknownPrefix(String),

    /// A handler returned an error while processing a record
    ///
    /// **Error Code**: E5001
    ///
    /// Extraction stops at the first handler failure; records delivered
    /// before it remain valid.
    #[error("[E5001] Handler failed on {record}: {source}")]
    Handler {
        /// Record kind being delivered ("item", "author", ...)
        record: &'static str,
        /// Error returned by the handler
        #[source]
        source: HandlerError,
    },

    /// No handler is registered under the requested name
    ///
    /// **Error Code**: E5002
    #[error("[E5002] Unknown handler '{0}' (expected one of: print, count, noop)")]
    UnknownHandler(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl Error {
    /// Wrap a handler error with the kind of record that was being delivered
    pub fn handler(record: &'static str, source: HandlerError) -> Self {
        Error::Handler { record, source }
    }

    /// Create a MalformedInput error pointing at a byte offset in the stream
    pub fn malformed_at(position: u64, message: &str) -> Self {
        Error::MalformedInput(format!("at byte {}: {}", position, message))
    }
}
