use voxdraw_core::types::FormatVersion;

use crate::error::PersistError;
use crate::format::{SnapshotHeader, CONTAINER_VERSION, KNOWN_FLAGS, MAGIC};

/// Validate a snapshot header and return its vertex format plus any
/// compatibility warnings.
///
/// A vertex format other than `expected` is fatal: buffers of the two
/// versions must never be mixed. Unknown flag bits only warn.
pub fn validate_header(
    header: &SnapshotHeader,
    expected: Option<FormatVersion>,
) -> Result<(FormatVersion, Vec<String>), PersistError> {
    if header.magic != MAGIC {
        return Err(PersistError::InvalidMagic);
    }

    if header.version != CONTAINER_VERSION {
        return Err(PersistError::UnsupportedVersion(header.version));
    }

    let format = FormatVersion::from_tag(header.format_tag)
        .ok_or(PersistError::UnknownFormat(header.format_tag))?;
    if let Some(expected) = expected {
        if expected != format {
            return Err(PersistError::FormatMismatch {
                expected,
                found: format,
            });
        }
    }

    let mut warnings = Vec::new();
    let unknown = header.flags & !KNOWN_FLAGS;
    if unknown != 0 {
        warnings.push(format!(
            "Snapshot sets unknown flag bits {unknown:#010x}; they are ignored."
        ));
    }

    Ok((format, warnings))
}
