use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::error::{ArchiveError, ArchiveResult};
use crate::reader::read_sarc;
use crate::writer::{write_sarc, SARC_MAGIC};

/// Decoded archive content: entry name to entry bytes.
pub type ArchiveMap = BTreeMap<String, Vec<u8>>;

/// Converts archive bytes to and from named entries.
///
/// Implementations must round-trip: encoding a decoded archive and decoding
/// it again yields the same entries, and re-encoding is byte-stable.
pub trait ArchiveCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> ArchiveResult<ArchiveMap>;

    fn encode(&self, entries: &ArchiveMap) -> ArchiveResult<Vec<u8>>;
}

/// Plain, uncompressed SARC.
#[derive(Clone, Copy, Debug, Default)]
pub struct SarcCodec;

impl ArchiveCodec for SarcCodec {
    fn decode(&self, bytes: &[u8]) -> ArchiveResult<ArchiveMap> {
        read_sarc(bytes)
    }

    fn encode(&self, entries: &ArchiveMap) -> ArchiveResult<Vec<u8>> {
        write_sarc(entries)
    }
}

/// zstd-compressed SARC (`*.sarc.zs`), optionally with a raw dictionary.
///
/// Decoding also accepts uncompressed SARC bytes.
#[derive(Clone)]
pub struct ZstdSarcCodec {
    level: i32,
    dictionary: Option<Vec<u8>>,
}

impl ZstdSarcCodec {
    pub fn new(level: i32) -> Self {
        Self {
            level,
            dictionary: None,
        }
    }

    /// Use `dictionary` for both compression and decompression.
    pub fn with_dictionary(mut self, dictionary: Vec<u8>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn has_dictionary(&self) -> bool {
        self.dictionary.is_some()
    }

    fn decompress(&self, bytes: &[u8]) -> ArchiveResult<Vec<u8>> {
        let fail = |e: std::io::Error| ArchiveError::DecompressionFailed(e.to_string());
        match &self.dictionary {
            Some(dict) => {
                let mut decoder =
                    zstd::stream::read::Decoder::with_dictionary(bytes, dict).map_err(fail)?;
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).map_err(fail)?;
                Ok(out)
            }
            None => zstd::decode_all(bytes).map_err(fail),
        }
    }

    fn compress(&self, bytes: &[u8]) -> ArchiveResult<Vec<u8>> {
        let fail = |e: std::io::Error| ArchiveError::CompressionFailed(e.to_string());
        match &self.dictionary {
            Some(dict) => {
                let mut encoder =
                    zstd::stream::write::Encoder::with_dictionary(Vec::new(), self.level, dict)
                        .map_err(fail)?;
                encoder.write_all(bytes).map_err(fail)?;
                encoder.finish().map_err(fail)
            }
            None => zstd::encode_all(bytes, self.level).map_err(fail),
        }
    }
}

impl std::fmt::Debug for ZstdSarcCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZstdSarcCodec")
            .field("level", &self.level)
            .field("dictionary_len", &self.dictionary.as_ref().map(Vec::len))
            .finish()
    }
}

impl ArchiveCodec for ZstdSarcCodec {
    fn decode(&self, bytes: &[u8]) -> ArchiveResult<ArchiveMap> {
        if bytes.starts_with(SARC_MAGIC) {
            tracing::debug!("archive is not compressed");
            return read_sarc(bytes);
        }
        read_sarc(&self.decompress(bytes)?)
    }

    fn encode(&self, entries: &ArchiveMap) -> ArchiveResult<Vec<u8>> {
        self.compress(&write_sarc(entries)?)
    }
}
