/// Content fingerprint for decoded crops: murmur3 x64-128 over the pixel grid.
///
/// Only a fast-path filter for deduplication. Equal fingerprints are always
/// confirmed with a full pixel comparison.

use crate::preprocess::Image;
use std::io::Read;

const SEED: u32 = 0;

/// Fingerprint the decoded pixels of `image`, dimensions included.
///
/// Hashing decoded pixels rather than encoded bytes keeps two identical
/// crops equal regardless of how an encoder would serialise them.
pub fn content_hash(image: &Image) -> std::io::Result<u128> {
    let mut header = [0u8; 8];
    header[..4].copy_from_slice(&image.width().to_le_bytes());
    header[4..].copy_from_slice(&image.height().to_le_bytes());

    let mut source = (&header[..]).chain(image.pixels().as_raw().as_slice());
    murmur3::murmur3_x64_128(&mut source, SEED)
}

/// Hex rendering of a fingerprint, for logs.
pub fn to_hex(hash: u128) -> String {
    format!("{hash:032x}")
}
