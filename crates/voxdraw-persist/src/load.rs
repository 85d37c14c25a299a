use voxdraw_core::types::FormatVersion;

use crate::compat;
use crate::compress;
use crate::error::PersistError;
use crate::format::*;
use crate::save::FrameSnapshot;

/// Parsed snapshot plus any compatibility warnings.
pub struct LoadedSnapshot {
    pub header: SnapshotHeader,
    pub snapshot: FrameSnapshot,
    pub warnings: Vec<String>,
}

/// Load and parse a snapshot from raw bytes.
///
/// With `expected_format` set, a snapshot of the other vertex format is
/// rejected instead of returned.
pub fn load(
    bytes: &[u8],
    expected_format: Option<FormatVersion>,
) -> Result<LoadedSnapshot, PersistError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PersistError::FileTooSmall(bytes.len(), HEADER_SIZE));
    }

    let header: SnapshotHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    let (format, warnings) = compat::validate_header(&header, expected_format)?;
    for warning in &warnings {
        log::warn!("{warning}");
    }

    let file_size = header.file_size();
    if bytes.len() < file_size {
        return Err(PersistError::TruncatedFile {
            expected: file_size,
            actual: bytes.len(),
        });
    }

    let mut sections: Vec<Vec<u8>> = Vec::with_capacity(SECTION_COUNT);
    let mut offset = HEADER_SIZE;
    for section in ALL_SECTIONS {
        let size = header.compressed_sizes[section as usize] as usize;
        let count = header.element_counts[section as usize] as usize;
        let block = &bytes[offset..offset + size];
        sections.push(compress::decompress_section(section, block, count)?);
        offset += size;
    }

    let index_map: Vec<u32> = compress::cast_elements(&sections[Section::IndexMap as usize]);
    let snapshot = FrameSnapshot {
        format,
        frame: header.frame,
        vertices: compress::cast_elements(&sections[Section::Vertices as usize]),
        indices: compress::cast_elements(&sections[Section::Indices as usize]),
        placements: compress::cast_elements(&sections[Section::Placements as usize]),
        index_map: header.has_index_map().then_some(index_map),
        commands: compress::cast_elements(&sections[Section::Commands as usize]),
    };

    Ok(LoadedSnapshot {
        header,
        snapshot,
        warnings,
    })
}
