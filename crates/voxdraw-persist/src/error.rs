use voxdraw_core::types::FormatVersion;

/// Errors that can occur while writing or reading frame snapshots.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("invalid magic bytes (expected VXDR)")]
    InvalidMagic,

    #[error("unsupported snapshot container version {0}")]
    UnsupportedVersion(u16),

    #[error("unknown vertex format tag {0}")]
    UnknownFormat(u16),

    #[error("snapshot holds {found:?} vertices, expected {expected:?}")]
    FormatMismatch {
        expected: FormatVersion,
        found: FormatVersion,
    },

    #[error("file too small ({0} bytes, minimum {1})")]
    FileTooSmall(usize, usize),

    #[error("truncated file: expected {expected} bytes, got {actual}")]
    TruncatedFile { expected: usize, actual: usize },

    #[error("LZ4 decompression failed: {0}")]
    DecompressError(String),

    #[error("invalid {section} section size: expected {expected} bytes, got {actual}")]
    InvalidSectionSize {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
}
