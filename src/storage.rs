//! Binary persistence of non-negative integers.
//!
//! Each record is a native-endian `usize` length followed by that many bytes of
//! minimal big-endian magnitude. Files hold a fixed number of records: three for
//! domain parameters, one for a private key, public key or shared secret, four
//! for an authority key.

use std::fs;
use std::io::Write;
use std::mem::size_of;
use std::path::{Path, PathBuf};

use log::debug;
use num_bigint::BigUint;

use crate::error::{Error, Result};

const WORD: usize = size_of::<usize>();

/// Appends one `(size, magnitude)` record to `out`.
pub fn encode_record(n: &BigUint, out: &mut Vec<u8>) {
    let bytes = n.to_bytes_be();
    out.extend_from_slice(&bytes.len().to_ne_bytes());
    out.extend_from_slice(&bytes);
}

/// Encodes `values` as consecutive records.
pub fn encode_records(values: &[&BigUint]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in values {
        encode_record(v, &mut out);
    }
    out
}

/// Decodes exactly `count` records, rejecting truncated input and trailing bytes.
pub fn decode_records(bytes: &[u8], count: usize) -> Result<Vec<BigUint>> {
    let mut values = Vec::with_capacity(count);
    let mut rest = bytes;
    for i in 0..count {
        if rest.len() < WORD {
            return Err(Error::decode(format!(
                "record {} of {}: missing size field",
                i + 1,
                count
            )));
        }
        let (size_field, tail) = rest.split_at(WORD);
        let mut word = [0u8; WORD];
        word.copy_from_slice(size_field);
        let size = usize::from_ne_bytes(word);
        if size == 0 || size > tail.len() {
            return Err(Error::decode(format!(
                "record {} of {}: size {} with {} bytes remaining",
                i + 1,
                count,
                size,
                tail.len()
            )));
        }
        let (magnitude, tail) = tail.split_at(size);
        values.push(BigUint::from_bytes_be(magnitude));
        rest = tail;
    }
    if !rest.is_empty() {
        return Err(Error::decode(format!(
            "{} trailing bytes after {} records",
            rest.len(),
            count
        )));
    }
    Ok(values)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `bytes` to a sibling temp file, then renames it over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path(path);
    let written = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(path, e));
    }
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

pub fn write_integers(path: &Path, values: &[&BigUint]) -> Result<()> {
    write_atomic(path, &encode_records(values))
}

pub fn read_integers(path: &Path, count: usize) -> Result<Vec<BigUint>> {
    let bytes = read_bytes(path)?;
    decode_records(&bytes, count)
        .map_err(|e| Error::decode(format!("{}: {}", path.display(), e)))
}

pub fn write_integer(path: &Path, value: &BigUint) -> Result<()> {
    write_integers(path, &[value])
}

pub fn read_integer(path: &Path) -> Result<BigUint> {
    let mut values = read_integers(path, 1)?;
    values
        .pop()
        .ok_or_else(|| Error::decode(format!("{}: empty record set", path.display())))
}
