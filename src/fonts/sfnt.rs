//! Just enough sfnt parsing to hand `genpdf` a single, well-formed font face.
//!
//! `genpdf` parses fonts through `rusttype`, which rejects collections holding more than one face
//! and does not bounds-check very short inputs.  Every file is therefore validated here first,
//! and face 0 of a TrueType collection is rebuilt as a standalone font.

use crate::error::FontFileError;

const SFNT_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;
const COLLECTION_TAG: &[u8] = b"ttcf";
const SFNT_VERSIONS: [[u8; 4]; 3] = [[0, 1, 0, 0], *b"OTTO", *b"true"];

/// Entry of an sfnt table directory.  Offsets are relative to the start of the file.
#[derive(Clone, Copy, Debug)]
struct TableRecord {
    tag: [u8; 4],
    checksum: u32,
    offset: u32,
    length: u32,
}

fn slice(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8], FontFileError> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(FontFileError::Truncated { len: bytes.len() })
}

fn word_aligned(len: usize) -> usize {
    (len + 3) / 4 * 4
}

fn read_u16(bytes: &[u8], offset: usize) -> Result<u16, FontFileError> {
    let raw = slice(bytes, offset, 2)?;
    Ok(u16::from_be_bytes([raw[0], raw[1]]))
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, FontFileError> {
    let raw = slice(bytes, offset, 4)?;
    Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Reads the table directory of the face starting at `start` and checks every table lies
/// inside `bytes`.
fn table_records(bytes: &[u8], start: usize) -> Result<Vec<TableRecord>, FontFileError> {
    let version = slice(bytes, start, 4)?;
    if !SFNT_VERSIONS.iter().any(|known| known.as_slice() == version) {
        return Err(FontFileError::UnknownFormat);
    }

    let count = usize::from(read_u16(bytes, start + 4)?);
    if count == 0 {
        return Err(FontFileError::UnknownFormat);
    }

    (0..count)
        .map(|index| {
            let at = start + SFNT_HEADER_LEN + index * TABLE_RECORD_LEN;
            let tag = slice(bytes, at, 4)?;
            let record = TableRecord {
                tag: [tag[0], tag[1], tag[2], tag[3]],
                checksum: read_u32(bytes, at + 4)?,
                offset: read_u32(bytes, at + 8)?,
                length: read_u32(bytes, at + 12)?,
            };
            slice(bytes, record.offset as usize, record.length as usize)?;
            Ok(record)
        })
        .collect()
}

/// Returns standalone font data for the first face in `bytes`.
///
/// Plain TrueType or OpenType data is validated and returned unchanged.  For a collection, face 0
/// is copied into a new sfnt with its tables laid out back to back.
pub(crate) fn first_face(bytes: Vec<u8>) -> Result<Vec<u8>, FontFileError> {
    if bytes.len() < SFNT_HEADER_LEN {
        return Err(FontFileError::Truncated { len: bytes.len() });
    }

    if bytes.starts_with(COLLECTION_TAG) {
        if read_u32(&bytes, 8)? == 0 {
            return Err(FontFileError::EmptyCollection);
        }
        let face = read_u32(&bytes, 12)? as usize;
        extract_face(&bytes, face)
    } else {
        table_records(&bytes, 0)?;
        Ok(bytes)
    }
}

fn extract_face(bytes: &[u8], start: usize) -> Result<Vec<u8>, FontFileError> {
    let records = table_records(bytes, start)?;
    let header = slice(bytes, start, SFNT_HEADER_LEN)?;
    let directory_len = SFNT_HEADER_LEN + records.len() * TABLE_RECORD_LEN;

    let mut directory = Vec::with_capacity(directory_len);
    directory.extend_from_slice(header);
    let mut tables = Vec::new();

    for record in &records {
        let offset =
            u32::try_from(directory_len + tables.len()).map_err(|_| FontFileError::Oversized)?;
        directory.extend_from_slice(&record.tag);
        directory.extend_from_slice(&record.checksum.to_be_bytes());
        directory.extend_from_slice(&offset.to_be_bytes());
        directory.extend_from_slice(&record.length.to_be_bytes());

        tables.extend_from_slice(slice(bytes, record.offset as usize, record.length as usize)?);
        // Tables start on 4-byte boundaries.
        tables.resize(word_aligned(tables.len()), 0);
    }

    directory.extend_from_slice(&tables);
    Ok(directory)
}

/// Wraps `face` into a collection that lists it `faces` times.  Only plain sfnt input is
/// supported.
#[cfg(test)]
pub(crate) fn collection(face: &[u8], faces: u32) -> Vec<u8> {
    let header_len = 12 + 4 * faces as usize;
    let shift = header_len as u32;

    let mut bytes = COLLECTION_TAG.to_vec();
    bytes.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    bytes.extend_from_slice(&faces.to_be_bytes());
    for _ in 0..faces {
        bytes.extend_from_slice(&shift.to_be_bytes());
    }

    let mut face = face.to_vec();
    let count = usize::from(u16::from_be_bytes([face[4], face[5]]));
    for index in 0..count {
        let at = SFNT_HEADER_LEN + index * TABLE_RECORD_LEN + 8;
        let offset = u32::from_be_bytes([face[at], face[at + 1], face[at + 2], face[at + 3]]);
        face[at..at + 4].copy_from_slice(&(offset + shift).to_be_bytes());
    }
    bytes.extend_from_slice(&face);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an sfnt with the given tables, placing table data right after the directory.
    fn sfnt(tables: &[(&[u8; 4], &str)]) -> Vec<u8> {
        let count = u16::try_from(tables.len()).expect("table count");
        let mut bytes = vec![0, 1, 0, 0];
        bytes.extend_from_slice(&count.to_be_bytes());
        bytes.extend_from_slice(&[0; 6]);

        let mut offset = SFNT_HEADER_LEN + tables.len() * TABLE_RECORD_LEN;
        let mut data = Vec::new();
        for (tag, body) in tables {
            bytes.extend_from_slice(*tag);
            bytes.extend_from_slice(&0u32.to_be_bytes());
            bytes.extend_from_slice(&(offset as u32).to_be_bytes());
            bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
            data.extend_from_slice(body.as_bytes());
            data.resize(word_aligned(data.len()), 0);
            offset = SFNT_HEADER_LEN + tables.len() * TABLE_RECORD_LEN + data.len();
        }
        bytes.extend_from_slice(&data);
        bytes
    }

    #[test]
    fn short_inputs_are_truncated() {
        assert!(matches!(first_face(Vec::new()), Err(FontFileError::Truncated { len: 0 })));
        assert!(matches!(
            first_face(b"ab".to_vec()),
            Err(FontFileError::Truncated { len: 2 })
        ));
    }

    #[test]
    fn plain_sfnt_passes_through() {
        let font = sfnt(&[(b"head", "0123456789"), (b"name", "abc")]);
        assert_eq!(first_face(font.clone()).expect("valid sfnt"), font);
    }

    #[test]
    fn text_is_not_a_font() {
        assert!(matches!(
            first_face(b"definitely not a font file".to_vec()),
            Err(FontFileError::UnknownFormat)
        ));
    }

    #[test]
    fn table_past_the_end_is_truncated() {
        let mut font = sfnt(&[(b"head", "0123456789")]);
        font.truncate(font.len() - 4);
        assert!(matches!(first_face(font), Err(FontFileError::Truncated { .. })));
    }

    #[test]
    fn first_face_of_a_collection_becomes_standalone() {
        let face = sfnt(&[(b"cmap", "glyph map"), (b"head", "header!")]);
        let extracted = first_face(collection(&face, 3)).expect("collection face");

        assert!(!extracted.starts_with(COLLECTION_TAG));
        assert_eq!(extracted, face);
    }

    #[test]
    fn empty_collection_is_rejected() {
        let mut bytes = COLLECTION_TAG.to_vec();
        bytes.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        assert!(matches!(first_face(bytes), Err(FontFileError::EmptyCollection)));
    }
}
