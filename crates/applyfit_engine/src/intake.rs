use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_warn};

use crate::decode::decode_text;

/// Largest resume file accepted, in bytes (5 MiB).
pub const MAX_RESUME_BYTES: u64 = 5 * 1024 * 1024;

/// Lowercased extensions accepted as resume files.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["txt", "doc", "docx", "pdf"];

/// A file offered as the resume source. The size is known up front so the
/// validator can refuse oversized files without reading them.
pub trait ResumeSource {
    fn file_name(&self) -> &str;
    fn byte_size(&self) -> u64;
    fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Size,
    Type,
    ReadFailure,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Size => write!(f, "size"),
            RejectReason::Type => write!(f, "type"),
            RejectReason::ReadFailure => write!(f, "read-failure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted { text: String },
    Rejected { reason: RejectReason },
}

/// Decide whether `file` can serve as the resume and extract its text.
///
/// Size and extension are checked before any content is read. The decoded
/// text is returned whole; binary formats are not parsed.
pub fn validate(file: &dyn ResumeSource) -> ValidationOutcome {
    let name = file.file_name();
    let size = file.byte_size();
    if size > MAX_RESUME_BYTES {
        engine_debug!("{} rejected: {} bytes exceeds {}", name, size, MAX_RESUME_BYTES);
        return ValidationOutcome::Rejected {
            reason: RejectReason::Size,
        };
    }
    if !has_allowed_extension(name) {
        engine_debug!("{} rejected: extension not allowed", name);
        return ValidationOutcome::Rejected {
            reason: RejectReason::Type,
        };
    }

    let bytes = match file.read_bytes() {
        Ok(bytes) => bytes,
        Err(err) => {
            engine_warn!("Failed to read {}: {}", name, err);
            return ValidationOutcome::Rejected {
                reason: RejectReason::ReadFailure,
            };
        }
    };
    match decode_text(&bytes) {
        Ok(decoded) => {
            engine_debug!("{} decoded as {}", name, decoded.encoding_label);
            ValidationOutcome::Accepted { text: decoded.text }
        }
        Err(err) => {
            engine_warn!("Failed to decode {}: {}", name, err);
            ValidationOutcome::Rejected {
                reason: RejectReason::ReadFailure,
            }
        }
    }
}

/// Extension is whatever follows the last `.`; no dot means no extension.
fn has_allowed_extension(file_name: &str) -> bool {
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return false;
    };
    let extension = extension.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&extension.as_str())
}

/// A resume file on disk. Size comes from filesystem metadata.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl DiskFile {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let meta = fs::metadata(&path)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path,
            name,
            size: meta.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResumeSource for DiskFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn byte_size(&self) -> u64 {
        self.size
    }

    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// A resume already held in memory, e.g. handed over by an embedding UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InMemoryFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl ResumeSource for InMemoryFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Reports a size without holding the bytes and records whether it was read.
    struct SizedOnly {
        name: &'static str,
        size: u64,
        reads: Cell<u32>,
    }

    impl ResumeSource for SizedOnly {
        fn file_name(&self) -> &str {
            self.name
        }

        fn byte_size(&self) -> u64 {
            self.size
        }

        fn read_bytes(&self) -> io::Result<Vec<u8>> {
            self.reads.set(self.reads.get() + 1);
            Err(io::Error::other("unreadable"))
        }
    }

    fn sized(name: &'static str, size: u64) -> SizedOnly {
        SizedOnly {
            name,
            size,
            reads: Cell::new(0),
        }
    }

    #[test]
    fn oversized_files_are_rejected_before_reading() {
        for name in ["resume.txt", "resume.exe", "resume"] {
            let file = sized(name, 10 * 1024 * 1024);
            assert_eq!(
                validate(&file),
                ValidationOutcome::Rejected {
                    reason: RejectReason::Size
                }
            );
            assert_eq!(file.reads.get(), 0);
        }
    }

    #[test]
    fn size_limit_is_inclusive() {
        let file = sized("resume.pdf", MAX_RESUME_BYTES);
        assert_eq!(
            validate(&file),
            ValidationOutcome::Rejected {
                reason: RejectReason::ReadFailure
            }
        );
        assert_eq!(file.reads.get(), 1);

        let file = sized("resume.pdf", MAX_RESUME_BYTES + 1);
        assert_eq!(
            validate(&file),
            ValidationOutcome::Rejected {
                reason: RejectReason::Size
            }
        );
    }

    #[test]
    fn extensions_are_matched_case_insensitively() {
        assert!(has_allowed_extension("CV.PDF"));
        assert!(has_allowed_extension("resume.final.Docx"));
        assert!(has_allowed_extension("notes.txt"));
        assert!(!has_allowed_extension("notes.exe"));
        assert!(!has_allowed_extension("README"));
        assert!(!has_allowed_extension("archive.pdf.zip"));
        assert!(!has_allowed_extension("trailing."));
    }

    #[test]
    fn wrong_type_is_rejected_without_reading() {
        let file = sized("notes.exe", 5 * 1024);
        assert_eq!(
            validate(&file),
            ValidationOutcome::Rejected {
                reason: RejectReason::Type
            }
        );
        assert_eq!(file.reads.get(), 0);
    }

    #[test]
    fn text_file_round_trips() {
        let text = "Jane Doe\nSenior Engineer\n\n- 6 years of Go\n";
        let file = InMemoryFile::new("resume.txt", text);
        assert_eq!(
            validate(&file),
            ValidationOutcome::Accepted {
                text: text.to_string()
            }
        );
    }

    #[test]
    fn reject_reasons_use_wire_names() {
        assert_eq!(RejectReason::Size.to_string(), "size");
        assert_eq!(RejectReason::Type.to_string(), "type");
        assert_eq!(RejectReason::ReadFailure.to_string(), "read-failure");
    }
}
