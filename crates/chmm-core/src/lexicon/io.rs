use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;
use tracing::debug_span;

use super::{EntityKind, Lexicon, LexiconError};
use crate::term::TAG_COUNT;

const MAGIC: &[u8; 4] = b"CHLX";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 4 + 1 + 4 + 4; // magic + version + crc32 + payload_len = 13

impl Lexicon {
    pub fn to_bytes(&self) -> Result<Vec<u8>, LexiconError> {
        let payload = bincode::serialize(self).map_err(LexiconError::Serialize)?;
        let payload_len: u32 = payload
            .len()
            .try_into()
            .map_err(|_| LexiconError::Corrupt("payload exceeds u32::MAX".to_string()))?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        buf.extend_from_slice(&payload_len.to_le_bytes());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, LexiconError> {
        if data.len() < 5 {
            return Err(LexiconError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(LexiconError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(LexiconError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(LexiconError::InvalidHeader);
        }

        let expected_crc = u32::from_le_bytes([data[5], data[6], data[7], data[8]]);
        let payload_len = u32::from_le_bytes([data[9], data[10], data[11], data[12]]) as usize;
        let payload = data
            .get(HEADER_SIZE..HEADER_SIZE + payload_len)
            .ok_or(LexiconError::InvalidHeader)?;

        let found_crc = crc32fast::hash(payload);
        if found_crc != expected_crc {
            return Err(LexiconError::ChecksumMismatch {
                expected: expected_crc,
                found: found_crc,
            });
        }

        let lexicon: Lexicon = bincode::deserialize(payload).map_err(LexiconError::Deserialize)?;
        lexicon.check_shape()?;
        Ok(lexicon)
    }

    /// Open a compiled lexicon file through a read-only memory map.
    pub fn open(path: &Path) -> Result<Self, LexiconError> {
        let _span = debug_span!("lexicon_open", path = %path.display()).entered();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LexiconError::NotFound(path.to_path_buf()),
            _ => LexiconError::Io(e),
        })?;
        // SAFETY: The file is opened read-only and the mapping is immutable.
        // The Mmap is dropped after deserialization completes below.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }

    pub fn save(&self, path: &Path) -> Result<(), LexiconError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }

    /// Table sizes depend on the tag set compiled into this binary.
    fn check_shape(&self) -> Result<(), LexiconError> {
        if self.transitions.len() != TAG_COUNT * TAG_COUNT
            || self.transition_totals.len() != TAG_COUNT
        {
            return Err(LexiconError::Corrupt(format!(
                "transition table has {} cells, expected {}",
                self.transitions.len(),
                TAG_COUNT * TAG_COUNT
            )));
        }
        if self.entities.len() != EntityKind::ALL.len() {
            return Err(LexiconError::Corrupt(format!(
                "{} entity tables, expected {}",
                self.entities.len(),
                EntityKind::ALL.len()
            )));
        }
        Ok(())
    }
}
