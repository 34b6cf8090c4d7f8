//! Configuration for extraction and repair

use crate::source::XML_BUFFER_CAPACITY;
use std::ffi::OsString;

/// Configuration for an [`Extractor`](crate::streaming::Extractor) run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Fail on end tags that do not match the open element
    check_end_names: bool,
    /// Prune consumed nodes after every event
    prune: bool,
    /// Stop after this many items
    limit: Option<usize>,
    /// Initial capacity of the reader's event buffer
    buffer_capacity: usize,
}

impl ExtractorConfig {
    /// Lenient reading, pruning on, no item limit
    pub fn new() -> Self {
        Self {
            check_end_names: false,
            prune: true,
            limit: None,
            buffer_capacity: XML_BUFFER_CAPACITY,
        }
    }

    /// Reject documents whose end tags do not match
    pub fn with_strict_end_names(mut self, strict: bool) -> Self {
        self.check_end_names = strict;
        self
    }

    /// Enable or disable pruning of consumed nodes
    ///
    /// Disabling pruning makes the event source keep every finished node of
    /// the document, which is only useful for diagnosing memory behavior.
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Stop pulling events once `limit` items have been delivered
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the initial capacity of the event buffer
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Whether mismatched end tags are fatal
    pub fn check_end_names(&self) -> bool {
        self.check_end_names
    }

    /// Whether consumed nodes are pruned
    pub fn prune(&self) -> bool {
        self.prune
    }

    /// Maximum number of items to deliver
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Initial event buffer capacity
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// External program used to repair broken exports
///
/// The program is invoked as `program [args...] <file>` and must write the
/// repaired document to standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairConfig {
    enabled: bool,
    program: OsString,
    args: Vec<OsString>,
}

impl RepairConfig {
    /// `xmllint --nonet --recover`
    pub fn new() -> Self {
        Self {
            enabled: true,
            program: "xmllint".into(),
            args: vec!["--nonet".into(), "--recover".into()],
        }
    }

    /// Read the file as-is, without running a repair program
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Use a different repair program with its own arguments
    pub fn with_program<I, S>(mut self, program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.program = program.into();
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the repair program runs
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Repair program
    pub fn program(&self) -> &OsString {
        &self.program
    }

    /// Arguments passed before the file name
    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self::new()
    }
}
