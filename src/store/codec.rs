use std::io::{Read, Write};

use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};
use serde::{Serialize, de::DeserializeOwned};

use super::{StoreError, StoreResult};

/// Serializes a record to JSON and zlib-compresses it.
pub(crate) fn encode<T: Serialize>(record: &T) -> StoreResult<Vec<u8>> {
    let json = serde_json::to_vec(record)?;
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(json.len() / 2), Compression::default());
    encoder.write_all(&json).map_err(StoreError::Compression)?;
    encoder.finish().map_err(StoreError::Compression)
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> StoreResult<T> {
    let mut json = Vec::new();
    ZlibDecoder::new(body)
        .read_to_end(&mut json)
        .map_err(StoreError::Compression)?;
    Ok(serde_json::from_slice(&json)?)
}
