use crate::codec::ArchiveMap;
use crate::error::{ArchiveError, ArchiveResult};
use crate::writer::{
    HEADER_SIZE, SARC_MAGIC, SARC_VERSION, SFAT_HEADER_SIZE, SFAT_MAGIC, SFAT_NODE_SIZE,
    SFNT_HEADER_SIZE, SFNT_MAGIC,
};

/// Parse an uncompressed little-endian SARC container.
pub fn read_sarc(data: &[u8]) -> ArchiveResult<ArchiveMap> {
    if data.len() < HEADER_SIZE {
        return Err(ArchiveError::Corrupt {
            offset: 0,
            reason: "archive data too short".into(),
        });
    }
    expect_magic(data, 0, SARC_MAGIC)?;

    match &data[6..8] {
        [0xFF, 0xFE] => {}
        [0xFE, 0xFF] => {
            return Err(ArchiveError::Corrupt {
                offset: 6,
                reason: "big-endian archives are not supported".into(),
            })
        }
        other => {
            return Err(ArchiveError::Corrupt {
                offset: 6,
                reason: format!("invalid byte order mark: {other:02x?}"),
            })
        }
    }

    let header_size = u16_at(data, 4)? as usize;
    let data_offset = u32_at(data, 0x0C)? as usize;
    let version = u16_at(data, 0x10)?;
    if version != SARC_VERSION {
        return Err(ArchiveError::UnsupportedVersion(version));
    }

    let sfat = header_size;
    expect_magic(data, sfat, SFAT_MAGIC)?;
    let node_count = u16_at(data, sfat + 6)? as usize;

    let nodes = sfat + SFAT_HEADER_SIZE;
    let sfnt = nodes + node_count * SFAT_NODE_SIZE;
    expect_magic(data, sfnt, SFNT_MAGIC)?;
    let names = sfnt + SFNT_HEADER_SIZE;

    let mut entries = ArchiveMap::new();
    for i in 0..node_count {
        let node = nodes + i * SFAT_NODE_SIZE;
        let attributes = u32_at(data, node + 4)?;
        let begin = u32_at(data, node + 8)? as usize;
        let end = u32_at(data, node + 12)? as usize;

        // The high byte is a hash collision counter, zero only for unnamed nodes.
        if attributes >> 24 == 0 {
            return Err(ArchiveError::Corrupt {
                offset: node,
                reason: "unnamed entries are not supported".into(),
            });
        }
        let name = c_str_at(data, names + (attributes & 0xFFFF) as usize * 4)?;

        let start = data_offset + begin;
        let stop = data_offset + end;
        if begin > end || stop > data.len() {
            return Err(ArchiveError::Corrupt {
                offset: node,
                reason: format!("entry {name:?} data extends beyond archive"),
            });
        }

        if entries.insert(name.clone(), data[start..stop].to_vec()).is_some() {
            return Err(ArchiveError::Corrupt {
                offset: node,
                reason: format!("duplicate entry name: {name:?}"),
            });
        }
    }

    Ok(entries)
}

fn expect_magic(data: &[u8], offset: usize, magic: &[u8; 4]) -> ArchiveResult<()> {
    let actual = slice_at(data, offset, 4)?;
    if actual != magic {
        return Err(ArchiveError::InvalidMagic {
            offset,
            expected: String::from_utf8_lossy(magic).into(),
            actual: String::from_utf8_lossy(actual).into(),
        });
    }
    Ok(())
}

fn slice_at(data: &[u8], offset: usize, len: usize) -> ArchiveResult<&[u8]> {
    data.get(offset..offset + len).ok_or_else(|| ArchiveError::Corrupt {
        offset,
        reason: "unexpected end of archive".into(),
    })
}

fn u16_at(data: &[u8], offset: usize) -> ArchiveResult<u16> {
    let bytes = slice_at(data, offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn u32_at(data: &[u8], offset: usize) -> ArchiveResult<u32> {
    let bytes = slice_at(data, offset, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn c_str_at(data: &[u8], offset: usize) -> ArchiveResult<String> {
    let tail = data.get(offset..).ok_or_else(|| ArchiveError::Corrupt {
        offset,
        reason: "name offset beyond archive".into(),
    })?;
    let len = tail.iter().position(|&b| b == 0).ok_or_else(|| ArchiveError::Corrupt {
        offset,
        reason: "unterminated entry name".into(),
    })?;
    String::from_utf8(tail[..len].to_vec()).map_err(|_| ArchiveError::Corrupt {
        offset,
        reason: "entry name is not valid UTF-8".into(),
    })
}
