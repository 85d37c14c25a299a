use crate::error::PersistError;
use crate::format::Section;

/// Compress one section's raw bytes using LZ4.
pub fn compress_section(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress a section, validating it holds exactly `count` elements.
pub fn decompress_section(
    section: Section,
    compressed: &[u8],
    count: usize,
) -> Result<Vec<u8>, PersistError> {
    let decompressed = lz4_flex::decompress_size_prepended(compressed)
        .map_err(|e| PersistError::DecompressError(e.to_string()))?;

    let expected = count * section.element_size();
    if decompressed.len() != expected {
        return Err(PersistError::InvalidSectionSize {
            section: section.name(),
            expected,
            actual: decompressed.len(),
        });
    }

    Ok(decompressed)
}

/// Reinterpret section bytes as typed elements. Input need not be aligned.
pub fn cast_elements<T: bytemuck::Pod>(bytes: &[u8]) -> Vec<T> {
    bytes
        .chunks_exact(std::mem::size_of::<T>())
        .map(bytemuck::pod_read_unaligned)
        .collect()
}
