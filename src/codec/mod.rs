//! Container format for the encoded dataset.
//!
//! Layout: 4-byte magic | 8-byte salt | 4-byte big-endian payload length |
//! payload. The payload is the zlib-compressed plaintext XORed with a
//! SHA-256 counter keystream. The salt is derived from the compressed
//! payload, so encoding is deterministic.
//!
//! This is obfuscation, not security: it only keeps scripted answers from
//! being greppable in a checked-out workshop repo.

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::bufread::ZlibEncoder;
use flate2::read::ZlibDecoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const MAGIC: &[u8; 4] = b"CDB1";

const SECRET: &[u8] = b"\xf0\x9f\x95\xb5casefiles-workshop\xf0\x9f\xa7\xa9";
const SALT_LEN: usize = 8;
const HEADER_LEN: usize = MAGIC.len() + SALT_LEN + 4;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a CDB1 encoded blob")]
    BadMagic,
    #[error("Encoded blob is truncated ({0} bytes)")]
    Truncated(usize),
    #[error("Payload failed to decompress: {0}")]
    Inflate(std::io::Error),
}

/// Counter-mode keystream: block i = SHA-256(secret || salt || i as u32 BE).
fn keystream(secret: &[u8], salt: &[u8], nbytes: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(nbytes + 32);
    let mut counter: u32 = 0;
    while out.len() < nbytes {
        let mut hasher = Sha256::new();
        hasher.update(secret);
        hasher.update(salt);
        hasher.update(counter.to_be_bytes());
        out.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    out.truncate(nbytes);
    out
}

fn xor_with_keystream(data: &[u8], salt: &[u8]) -> Vec<u8> {
    let ks = keystream(SECRET, salt, data.len());
    data.iter().zip(ks).map(|(a, b)| a ^ b).collect()
}

pub fn encode_bytes(plain: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut compressed = Vec::new();
    ZlibEncoder::new(plain, Compression::best()).read_to_end(&mut compressed)?;

    let digest = Sha256::digest(&compressed);
    let salt = &digest[..SALT_LEN];
    let cipher = xor_with_keystream(&compressed, salt);

    let mut blob = Vec::with_capacity(HEADER_LEN + cipher.len());
    blob.extend_from_slice(MAGIC);
    blob.extend_from_slice(salt);
    blob.extend_from_slice(&(cipher.len() as u32).to_be_bytes());
    blob.extend_from_slice(&cipher);
    Ok(blob)
}

pub fn decode_bytes(blob: &[u8]) -> Result<Vec<u8>, CodecError> {
    if blob.len() < MAGIC.len() || &blob[..MAGIC.len()] != MAGIC {
        return Err(CodecError::BadMagic);
    }
    if blob.len() < HEADER_LEN {
        return Err(CodecError::Truncated(blob.len()));
    }

    let salt = &blob[MAGIC.len()..MAGIC.len() + SALT_LEN];
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&blob[MAGIC.len() + SALT_LEN..HEADER_LEN]);
    let payload_len = u32::from_be_bytes(len_bytes) as usize;

    let payload = blob[HEADER_LEN..]
        .get(..payload_len)
        .ok_or(CodecError::Truncated(blob.len()))?;
    let compressed = xor_with_keystream(payload, salt);

    let mut plain = Vec::new();
    ZlibDecoder::new(&compressed[..])
        .read_to_end(&mut plain)
        .map_err(CodecError::Inflate)?;
    Ok(plain)
}

pub fn encode_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<(), CodecError> {
    let plain = fs::read(src)?;
    let blob = encode_bytes(&plain)?;
    fs::write(dst, blob)?;
    Ok(())
}

pub fn decode_file(src: impl AsRef<Path>) -> Result<Vec<u8>, CodecError> {
    decode_bytes(&fs::read(src)?)
}
