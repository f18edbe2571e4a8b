//! SHA-1 digest codec: extraction from URN surface forms, hex and base-32
//! rendering, and incremental accumulation over streamed chunks.

use crate::error::FetchError;
use anyhow::{Context, Result};
use data_encoding::BASE32;
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Length of a SHA-1 digest in bytes.
pub const SHA1_LEN: usize = 20;

/// Length of the base-32 rendering of a SHA-1 digest (160 bits / 5).
pub const SHA1_BASE32_LEN: usize = 32;

/// URN scheme tokens accepted in the tagged surface form.
const URN_SCHEMES: [&str; 2] = ["sha1", "bitprint"];

const BUF_SIZE: usize = 64 * 1024;

/// A SHA-1 digest. Equality is byte-wise; used both as the expected value
/// parsed from a URN and as the value computed while streaming.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha1Digest([u8; SHA1_LEN]);

impl Sha1Digest {
    pub fn from_bytes(bytes: [u8; SHA1_LEN]) -> Self {
        Sha1Digest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SHA1_LEN] {
        &self.0
    }

    /// Extract a digest from any of the accepted surface forms, tried in
    /// this order (first match wins):
    ///
    /// 1. tagged base-32: optional `urn:` + `sha1`/`bitprint` + `:`, then
    ///    exactly 32 base-32 characters (case-insensitive), then either
    ///    end of input or a non-word character (the rest is ignored);
    /// 2. a bare 40-character hex string (case-insensitive);
    /// 3. a raw sequence of exactly 20 bytes, passed through unchanged.
    ///
    /// The raw form is usually not valid UTF-8; callers holding arbitrary
    /// bytes use `extract_bytes` directly.
    pub fn extract(input: &str) -> Result<Self, FetchError> {
        Self::extract_bytes(input.as_bytes())
    }

    /// `extract` over arbitrary bytes. The tagged and hex forms only apply
    /// to UTF-8 input; any 20-byte sequence that matches neither is the
    /// digest itself.
    pub fn extract_bytes(input: &[u8]) -> Result<Self, FetchError> {
        if let Ok(text) = std::str::from_utf8(input) {
            if let Some(digest) = parse_tagged_base32(text) {
                return Ok(digest);
            }
            if text.len() == 40 && text.bytes().all(|b| b.is_ascii_hexdigit()) {
                let raw = hex::decode(text).map_err(|_| malformed(input))?;
                let mut bytes = [0u8; SHA1_LEN];
                bytes.copy_from_slice(&raw);
                return Ok(Sha1Digest(bytes));
            }
        }
        if input.len() == SHA1_LEN {
            let mut bytes = [0u8; SHA1_LEN];
            bytes.copy_from_slice(input);
            return Ok(Sha1Digest(bytes));
        }
        Err(malformed(input))
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// 32-character base-32 rendering (the URN digest form).
    pub fn to_base32(&self) -> String {
        BASE32.encode(&self.0)
    }

    /// Canonical `urn:sha1:` rendering.
    pub fn to_urn(&self) -> String {
        format!("urn:sha1:{}", self.to_base32())
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1Digest({})", self.to_hex())
    }
}

fn malformed(input: &[u8]) -> FetchError {
    FetchError::MalformedUrn {
        input: String::from_utf8_lossy(input).into_owned(),
    }
}

/// Case-insensitive literal prefix strip.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&s[prefix.len()..]),
        _ => None,
    }
}

/// Strip an optional `urn:` + scheme + `:` prefix. The `urn:` part is only
/// accepted together with a recognized scheme; with no recognized prefix
/// the whole input is the candidate digest.
fn strip_urn_prefix(s: &str) -> &str {
    let body = strip_prefix_ci(s, "urn:").unwrap_or(s);
    for scheme in URN_SCHEMES {
        if let Some(rest) = strip_prefix_ci(body, scheme).and_then(|r| r.strip_prefix(':')) {
            return rest;
        }
    }
    s
}

fn parse_tagged_base32(input: &str) -> Option<Sha1Digest> {
    let rest = strip_urn_prefix(input);
    if rest.len() < SHA1_BASE32_LEN || !rest.is_char_boundary(SHA1_BASE32_LEN) {
        return None;
    }
    let (encoded, tail) = rest.split_at(SHA1_BASE32_LEN);
    if !encoded.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    // Trailing content is ignored, but only past a word boundary; a 33rd
    // alphanumeric (or underscore) character means this is not the tagged
    // form at all.
    if let Some(next) = tail.bytes().next() {
        if next.is_ascii_alphanumeric() || next == b'_' {
            return None;
        }
    }
    let raw = BASE32.decode(encoded.to_ascii_uppercase().as_bytes()).ok()?;
    let mut bytes = [0u8; SHA1_LEN];
    bytes.copy_from_slice(&raw);
    Some(Sha1Digest(bytes))
}

/// Incremental SHA-1 accumulator fed bounded chunks; tracks the byte count
/// alongside the hash state so unbounded streams never need buffering.
pub struct Sha1Stream {
    hasher: Sha1,
    len: u64,
}

impl Sha1Stream {
    pub fn new() -> Self {
        Sha1Stream {
            hasher: Sha1::new(),
            len: 0,
        }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.len += chunk.len() as u64;
    }

    /// Total bytes accumulated so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn finalize(self) -> Sha1Digest {
        let out = self.hasher.finalize();
        let mut bytes = [0u8; SHA1_LEN];
        bytes.copy_from_slice(&out);
        Sha1Digest(bytes)
    }
}

impl Default for Sha1Stream {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the SHA-1 of a file. Reads in chunks to keep memory use
/// bounded; suitable for large files.
pub fn sha1_path(path: &Path) -> Result<Sha1Digest> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut stream = Sha1Stream::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        stream.update(&buf[..n]);
    }
    Ok(stream.finalize())
}
