//! Decoding of raw `dirent64` records.
//!
//! The kernel fills the buffer with variable-length records laid out back to
//! back:
//!
//! ```text
//! 0        8        16         18       19
//! | d_ino  | d_off  | d_reclen | d_type | d_name ... \0 | padding |
//! ```
//!
//! `d_reclen` is the total span of the record including padding. Every field
//! is read through a bounds-checked cursor; nothing about the stream is
//! trusted.

use core::ffi::CStr;
use libc::c_int;
use rustix::fs::FileType;

use crate::error::{Error, Result};

pub(crate) const INO_OFFSET: usize = 0;
pub(crate) const RECLEN_OFFSET: usize = 16;
pub(crate) const TYPE_OFFSET: usize = 18;
pub(crate) const NAME_OFFSET: usize = 19;

/// The largest record the kernel can emit: a `NAME_MAX` name plus its
/// terminator, rounded up to 8-byte alignment.
pub(crate) const MAX_RECORD_LEN: usize = (NAME_OFFSET + 255 + 1 + 7) & !7;

#[cfg(test)]
static_assertions::assert_eq_size!(libc::ino64_t, u64);
#[cfg(test)]
static_assertions::const_assert!(MAX_RECORD_LEN % 8 == 0);

/// One decoded directory entry, borrowing from the record buffer.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    name: &'a CStr,
    ino: u64,
    d_type: u8,
    offset: usize,
}

impl<'a> Entry<'a> {
    /// The entry's file name, without any directory component.
    #[inline]
    pub fn name(&self) -> &'a CStr {
        self.name
    }

    /// The inode number.
    #[inline]
    pub fn ino(&self) -> u64 {
        self.ino
    }

    /// The file type reported by the filesystem, which may be
    /// `FileType::Unknown`.
    pub fn file_type(&self) -> FileType {
        match self.d_type {
            libc::DT_REG => FileType::RegularFile,
            libc::DT_DIR => FileType::Directory,
            libc::DT_LNK => FileType::Symlink,
            libc::DT_FIFO => FileType::Fifo,
            libc::DT_SOCK => FileType::Socket,
            libc::DT_CHR => FileType::CharacterDevice,
            libc::DT_BLK => FileType::BlockDevice,
            _ => FileType::Unknown,
        }
    }

    /// Byte offset of this record within the filled range.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// A single pass over the records in a filled byte range.
///
/// Yields entries in the order the kernel wrote them. After the first
/// malformed record it yields that error once and then stops.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    bytes: &'a [u8],
    cursor: usize,
    done: bool,
}

impl<'a> Records<'a> {
    /// Iterate over the records in `bytes`, which must be exactly the filled
    /// range.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            cursor: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Entry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor >= self.bytes.len() {
            return None;
        }
        match decode_at(self.bytes, self.cursor) {
            Ok((entry, reclen)) => {
                self.cursor += reclen;
                Some(Ok(entry))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl core::iter::FusedIterator for Records<'_> {}

/// Decode the record at `offset`, returning it with its declared length.
fn decode_at(bytes: &[u8], offset: usize) -> Result<(Entry<'_>, usize)> {
    let malformed = |why: &str| {
        log::debug!("Rejecting directory record at offset {}: {}", offset, why);
        Error::Malformed { offset }
    };

    let record = &bytes[offset..];
    if record.len() < NAME_OFFSET {
        return Err(malformed("truncated header"));
    }

    let reclen = usize::from(u16::from_ne_bytes([
        record[RECLEN_OFFSET],
        record[RECLEN_OFFSET + 1],
    ]));
    if reclen == 0 {
        return Err(malformed("zero length"));
    }
    if reclen <= NAME_OFFSET {
        return Err(malformed("length too small to hold a name"));
    }
    if reclen > record.len() {
        return Err(malformed("length runs past the filled bytes"));
    }

    let name = CStr::from_bytes_until_nul(&record[NAME_OFFSET..reclen])
        .map_err(|_| malformed("unterminated name"))?;

    let mut ino = [0_u8; 8];
    ino.copy_from_slice(&record[INO_OFFSET..INO_OFFSET + 8]);

    let entry = Entry {
        name,
        ino: u64::from_ne_bytes(ino),
        d_type: record[TYPE_OFFSET],
        offset,
    };
    Ok((entry, reclen))
}

/// Call `visitor` with each name in `bytes`, in order.
///
/// Returns the first nonzero value `visitor` returns, without decoding any
/// further, or 0 once every record has been visited.
pub fn visit<F>(bytes: &[u8], mut visitor: F) -> Result<c_int>
where
    F: FnMut(&CStr) -> c_int,
{
    for entry in Records::new(bytes) {
        let ret = visitor(entry?.name());
        if ret != 0 {
            return Ok(ret);
        }
    }
    Ok(0)
}
