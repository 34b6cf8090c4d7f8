//! Best-effort repair of broken export files
//!
//! Real-world exports are frequently not well-formed (stray control
//! characters, truncated files, unescaped ampersands). Before extraction the
//! file is piped through an external recovering parser, `xmllint --recover`
//! by default, and the extractor only ever sees the repaired output.
//!
//! Both output streams of the repair program are spooled to anonymous
//! temporary files, which are removed as soon as they are dropped.

use crate::config::RepairConfig;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Result of running the repair program
#[derive(Debug)]
pub enum RepairOutcome {
    /// The repaired document, rewound to its start
    Repaired(File),
    /// The program failed; its diagnostic output, rewound to its start
    Failed {
        /// Exit status of the repair program
        status: ExitStatus,
        /// Everything the program wrote to standard error
        diagnostics: File,
    },
}

/// Run the configured repair program on `path`
///
/// # Arguments
///
/// * `path` - Export file to repair
/// * `config` - Repair program and arguments
///
/// # Errors
///
/// Fails if the temporary files cannot be created or the program cannot be
/// started. A program that runs but exits unsuccessfully is reported as
/// [`RepairOutcome::Failed`], not as an error.
pub fn repair(path: &Path, config: &RepairConfig) -> Result<RepairOutcome> {
    let mut out = tempfile::tempfile()?;
    let mut err = tempfile::tempfile()?;

    log::debug!(
        "running {:?} {:?} {}",
        config.program(),
        config.args(),
        path.display()
    );
    let status = Command::new(config.program())
        .args(config.args())
        .arg(path)
        .stdin(Stdio::null())
        .stdout(out.try_clone()?)
        .stderr(err.try_clone()?)
        .status()
        .map_err(|source| Error::RepairUnavailable {
            program: config.program().to_string_lossy().into_owned(),
            source,
        })?;

    if status.success() {
        out.seek(SeekFrom::Start(0))?;
        Ok(RepairOutcome::Repaired(out))
    } else {
        log::warn!("repair of {} exited with {}", path.display(), status);
        err.seek(SeekFrom::Start(0))?;
        Ok(RepairOutcome::Failed {
            status,
            diagnostics: err,
        })
    }
}

/// Open an export file for extraction
///
/// With repair enabled the file is run through the repair program first and
/// a failed repair becomes [`Error::RepairFailed`] carrying the program's
/// diagnostics. With repair disabled the file is opened directly.
pub fn open_export(path: &Path, config: &RepairConfig) -> Result<BufReader<File>> {
    if !config.enabled() {
        return Ok(BufReader::new(File::open(path)?));
    }
    // Fail early with a plain I/O error rather than the repair tool's message
    File::open(path)?;

    match repair(path, config)? {
        RepairOutcome::Repaired(file) => Ok(BufReader::new(file)),
        RepairOutcome::Failed {
            status,
            mut diagnostics,
        } => {
            let mut text = String::new();
            diagnostics.read_to_string(&mut text)?;
            let text = text.trim();
            Err(Error::RepairFailed(if text.is_empty() {
                format!("repair program exited with {}", status)
            } else {
                text.to_string()
            }))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;

    fn export_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_repaired_stream_is_program_output() {
        let file = export_file("<rss/>");
        let config = RepairConfig::new().with_program("cat", Vec::<String>::new());
        let RepairOutcome::Repaired(mut out) = repair(file.path(), &config).unwrap() else {
            panic!("expected repaired output");
        };
        let mut text = String::new();
        out.read_to_string(&mut text).unwrap();
        assert_eq!(text, "<rss/>");
    }

    #[test]
    fn test_failed_program_reports_diagnostics() {
        let file = export_file("<rss>");
        let config = RepairConfig::new().with_program("sh", ["-c", "echo broken >&2; exit 3"]);
        let RepairOutcome::Failed {
            status,
            mut diagnostics,
        } = repair(file.path(), &config).unwrap()
        else {
            panic!("expected failure");
        };
        assert_eq!(status.code(), Some(3));
        let mut text = String::new();
        diagnostics.read_to_string(&mut text).unwrap();
        assert_eq!(text.trim(), "broken");

        assert!(matches!(
            open_export(file.path(), &config),
            Err(Error::RepairFailed(msg)) if msg == "broken"
        ));
    }

    #[test]
    fn test_missing_program() {
        let file = export_file("<rss/>");
        let config =
            RepairConfig::new().with_program("wxrtools-no-such-program", Vec::<String>::new());
        assert!(matches!(
            repair(file.path(), &config),
            Err(Error::RepairUnavailable { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let config = RepairConfig::new().with_program("cat", Vec::<String>::new());
        let missing = Path::new("/nonexistent/export.xml");
        assert!(matches!(open_export(missing, &config), Err(Error::Io(_))));
        assert!(matches!(
            open_export(missing, &RepairConfig::disabled()),
            Err(Error::Io(_))
        ));
    }
}
