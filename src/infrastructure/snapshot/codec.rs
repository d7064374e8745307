//! Binary snapshot layout, all integers little-endian:
//!
//! ```text
//! magic      8 bytes  "CLIPFEAT"
//! version    u32
//! dimension  u32
//! count      u64
//! records    count × { key_len u16, key bytes, dimension × f32 }
//! crc32      u32      over every byte between the magic and the checksum
//! ```

use crate::domain::entities::feature_entry::FeatureEntry;
use crate::domain::error::ClipError;
use crate::domain::values::feature_key::{FeatureKey, MAX_KEY_LEN};
use crate::domain::values::feature_vector::FeatureVector;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::collections::HashSet;
use std::io::{Cursor, Read, Write};

pub const MAGIC: &[u8; 8] = b"CLIPFEAT";
pub const VERSION: u32 = 1;

const HEADER_LEN: usize = 8 + 4 + 4 + 8;

fn corrupt(msg: impl std::fmt::Display) -> ClipError {
    ClipError::Storage(format!("corrupt snapshot: {msg}"))
}

pub fn encode<W: Write>(out: &mut W, dimension: usize, entries: &[FeatureEntry]) -> Result<(), ClipError> {
    let dim = u32::try_from(dimension).map_err(|_| ClipError::InvalidArgument(format!("dimension {dimension} too large")))?;

    let mut body = Vec::with_capacity(16 + entries.len() * (2 + MAX_KEY_LEN + dimension * 4));
    body.write_u32::<LittleEndian>(VERSION)?;
    body.write_u32::<LittleEndian>(dim)?;
    body.write_u64::<LittleEndian>(entries.len() as u64)?;
    for e in entries {
        if e.vector.dimension() != dimension {
            return Err(ClipError::InvalidArgument(format!(
                "entry {} has dimension {}, snapshot dimension is {dimension}",
                e.key,
                e.vector.dimension()
            )));
        }
        let key = e.key.as_str().as_bytes();
        body.write_u16::<LittleEndian>(key.len() as u16)?;
        body.write_all(key)?;
        for v in e.vector.as_slice() {
            body.write_f32::<LittleEndian>(*v)?;
        }
    }

    let crc = crc32fast::hash(&body);
    out.write_all(MAGIC)?;
    out.write_all(&body)?;
    out.write_u32::<LittleEndian>(crc)?;
    Ok(())
}

/// Decodes a snapshot, rejecting it unless its dimension equals `expected_dimension`.
pub fn decode(bytes: &[u8], expected_dimension: usize) -> Result<Vec<FeatureEntry>, ClipError> {
    if bytes.len() < HEADER_LEN + 4 {
        return Err(corrupt(format!("{} bytes is shorter than the header", bytes.len())));
    }
    if &bytes[..8] != MAGIC {
        return Err(corrupt("bad magic"));
    }

    let (body, trailer) = bytes[8..].split_at(bytes.len() - 8 - 4);
    let stored_crc = Cursor::new(trailer).read_u32::<LittleEndian>()?;
    if crc32fast::hash(body) != stored_crc {
        return Err(corrupt("checksum mismatch"));
    }

    let mut r = Cursor::new(body);
    let version = r.read_u32::<LittleEndian>()?;
    if version != VERSION {
        return Err(corrupt(format!("unsupported version {version}")));
    }
    let dimension = r.read_u32::<LittleEndian>()? as usize;
    if dimension != expected_dimension {
        return Err(ClipError::Storage(format!(
            "snapshot dimension {dimension} does not match model dimension {expected_dimension}"
        )));
    }
    let count = r.read_u64::<LittleEndian>()?;

    let min_record = 2 + 1 + dimension * 4;
    let remaining = body.len() - r.position() as usize;
    if count > (remaining / min_record) as u64 {
        return Err(corrupt(format!("count {count} exceeds file size")));
    }

    let mut entries = Vec::with_capacity(count as usize);
    let mut seen = HashSet::with_capacity(count as usize);
    for i in 0..count {
        let key_len = r.read_u16::<LittleEndian>().map_err(|_| corrupt(format!("truncated at record {i}")))? as usize;
        let mut key = vec![0u8; key_len];
        r.read_exact(&mut key).map_err(|_| corrupt(format!("truncated key at record {i}")))?;
        let key = String::from_utf8(key).map_err(|_| corrupt(format!("record {i} key is not UTF-8")))?;
        let key = FeatureKey::new(key).map_err(|e| corrupt(format!("record {i}: {e}")))?;

        let mut values = vec![0f32; dimension];
        r.read_f32_into::<LittleEndian>(&mut values)
            .map_err(|_| corrupt(format!("truncated vector at record {i}")))?;
        let vector = FeatureVector::new(values).map_err(|e| corrupt(format!("record {i}: {e}")))?;

        if !seen.insert(key.clone()) {
            return Err(corrupt(format!("duplicate key {key}")));
        }
        entries.push(FeatureEntry::new(key, vector));
    }

    if (r.position() as usize) != body.len() {
        return Err(corrupt("trailing bytes after last record"));
    }
    Ok(entries)
}
