use crate::codec::ArchiveMap;
use crate::error::{ArchiveError, ArchiveResult};

pub(crate) const SARC_MAGIC: &[u8; 4] = b"SARC";
pub(crate) const SFAT_MAGIC: &[u8; 4] = b"SFAT";
pub(crate) const SFNT_MAGIC: &[u8; 4] = b"SFNT";

pub(crate) const HEADER_SIZE: usize = 0x14;
pub(crate) const SFAT_HEADER_SIZE: usize = 0x0C;
pub(crate) const SFAT_NODE_SIZE: usize = 0x10;
pub(crate) const SFNT_HEADER_SIZE: usize = 0x08;

pub(crate) const BOM: u16 = 0xFEFF;
pub(crate) const SARC_VERSION: u16 = 0x0100;
pub(crate) const HASH_KEY: u32 = 0x65;

/// Set on node attributes whose name lives in the name table.
pub(crate) const NAMED_FLAG: u32 = 0x0100_0000;

const DATA_ALIGNMENT: usize = 0x80;
const FILE_ALIGNMENT: usize = 0x08;

/// SARC name hash: `h = h * key + c` over the signed name bytes.
pub fn name_hash(name: &str, key: u32) -> u32 {
    name.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(key).wrapping_add(b as i8 as i32 as u32))
}

/// Serialize entries into an uncompressed little-endian SARC container.
///
/// Nodes are ordered by name hash, so the output depends only on the
/// entries and never on insertion order.
pub fn write_sarc(entries: &ArchiveMap) -> ArchiveResult<Vec<u8>> {
    let node_count = u16::try_from(entries.len())
        .map_err(|_| ArchiveError::Encode(format!("too many entries: {}", entries.len())))?;

    let mut nodes: Vec<(u32, &str, &[u8])> = entries
        .iter()
        .map(|(name, data)| (name_hash(name, HASH_KEY), name.as_str(), data.as_slice()))
        .collect();
    nodes.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    // Name table
    let mut names = Vec::new();
    let mut name_offsets = Vec::with_capacity(nodes.len());
    for (_, name, _) in &nodes {
        if name.is_empty() || name.as_bytes().contains(&0) {
            return Err(ArchiveError::Encode(format!("invalid entry name: {name:?}")));
        }
        let offset = names.len() / 4;
        if offset > 0xFFFF {
            return Err(ArchiveError::Encode("name table too large".into()));
        }
        name_offsets.push(offset as u32);
        names.extend_from_slice(name.as_bytes());
        names.push(0);
        pad_to(&mut names, 4);
    }

    let sfnt_offset = HEADER_SIZE + SFAT_HEADER_SIZE + SFAT_NODE_SIZE * nodes.len();
    let data_offset = align(sfnt_offset + SFNT_HEADER_SIZE + names.len(), DATA_ALIGNMENT);

    // Data section
    let mut data = Vec::new();
    let mut ranges = Vec::with_capacity(nodes.len());
    for (_, _, content) in &nodes {
        pad_to(&mut data, FILE_ALIGNMENT);
        let begin = data.len();
        data.extend_from_slice(content);
        ranges.push((to_u32(begin)?, to_u32(data.len())?));
    }

    let file_size = to_u32(data_offset + data.len())?;
    let mut out = Vec::with_capacity(file_size as usize);

    // Header
    out.extend_from_slice(SARC_MAGIC);
    out.extend_from_slice(&(HEADER_SIZE as u16).to_le_bytes());
    out.extend_from_slice(&BOM.to_le_bytes());
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&to_u32(data_offset)?.to_le_bytes());
    out.extend_from_slice(&SARC_VERSION.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());

    // SFAT
    out.extend_from_slice(SFAT_MAGIC);
    out.extend_from_slice(&(SFAT_HEADER_SIZE as u16).to_le_bytes());
    out.extend_from_slice(&node_count.to_le_bytes());
    out.extend_from_slice(&HASH_KEY.to_le_bytes());
    for (((hash, _, _), name_offset), (begin, end)) in
        nodes.iter().zip(&name_offsets).zip(&ranges)
    {
        out.extend_from_slice(&hash.to_le_bytes());
        out.extend_from_slice(&(NAMED_FLAG | name_offset).to_le_bytes());
        out.extend_from_slice(&begin.to_le_bytes());
        out.extend_from_slice(&end.to_le_bytes());
    }

    // SFNT
    out.extend_from_slice(SFNT_MAGIC);
    out.extend_from_slice(&(SFNT_HEADER_SIZE as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&names);

    out.resize(data_offset, 0);
    out.extend_from_slice(&data);
    Ok(out)
}

fn align(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

fn pad_to(buf: &mut Vec<u8>, alignment: usize) {
    buf.resize(align(buf.len(), alignment), 0);
}

fn to_u32(value: usize) -> ArchiveResult<u32> {
    u32::try_from(value)
        .map_err(|_| ArchiveError::Encode(format!("archive too large: {value} bytes")))
}
