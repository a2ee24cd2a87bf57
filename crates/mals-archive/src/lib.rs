//! Archive codec for the Mals merger.
//!
//! Message archives are SARC containers of named entries, compressed with
//! zstd on disk (`*.sarc.zs`).
//!
//! # Architecture
//!
//! - **writer**: builds little-endian SARC bytes (header, SFAT node table,
//!   SFNT name table, aligned data section)
//! - **reader**: bounds-checked parsing back into named entries
//! - **codec**: the [`ArchiveCodec`] seam, with [`SarcCodec`] and
//!   [`ZstdSarcCodec`] implementations

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{ArchiveCodec, ArchiveMap, SarcCodec, ZstdSarcCodec};
pub use error::{ArchiveError, ArchiveResult};
pub use reader::read_sarc;
pub use writer::{name_hash, write_sarc};

#[cfg(test)]
mod tests {
    use super::*;

    fn make_archive(count: usize) -> ArchiveMap {
        (0..count)
            .map(|i| {
                (
                    format!("EventFlowMsg/Npc{i:03}.msbt"),
                    format!("MsgStdBn message body number {i}").into_bytes(),
                )
            })
            .collect()
    }

    #[test]
    fn sarc_roundtrip_multiple() {
        let codec = SarcCodec;
        let entries = make_archive(25);
        let bytes = codec.encode(&entries).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), entries);
    }

    #[test]
    fn reencode_is_byte_stable() {
        let codec = ZstdSarcCodec::new(3);
        let first = codec.encode(&make_archive(10)).unwrap();
        let second = codec.encode(&codec.decode(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_archive_roundtrip() {
        let codec = ZstdSarcCodec::new(3);
        let bytes = codec.encode(&ArchiveMap::new()).unwrap();
        assert!(codec.decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn zstd_compresses_repetitive_content() {
        let mut entries = ArchiveMap::new();
        entries.insert("big.msbt".into(), vec![0xABu8; 100_000]);

        let codec = ZstdSarcCodec::new(3);
        let bytes = codec.encode(&entries).unwrap();
        assert!(bytes.len() < 100_000);
        assert_eq!(codec.decode(&bytes).unwrap(), entries);
    }

    #[test]
    fn zstd_codec_accepts_uncompressed_input() {
        let entries = make_archive(3);
        let raw = SarcCodec.encode(&entries).unwrap();
        assert_eq!(ZstdSarcCodec::new(3).decode(&raw).unwrap(), entries);
    }

    #[test]
    fn dictionary_roundtrip() {
        let dictionary = b"MsgStdBn message body number ".repeat(64);
        let codec = ZstdSarcCodec::new(3).with_dictionary(dictionary);
        assert!(codec.has_dictionary());

        let entries = make_archive(8);
        let bytes = codec.encode(&entries).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), entries);
    }

    #[test]
    fn garbage_fails_to_decompress() {
        let err = ZstdSarcCodec::new(3).decode(b"not an archive").unwrap_err();
        assert!(matches!(err, ArchiveError::DecompressionFailed(_)));
        assert!(err.is_decode());
    }
}
