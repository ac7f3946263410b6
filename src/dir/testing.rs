//! Synthetic record streams and a scripted gateway for unit tests.

use core::cell::{Cell, RefCell};
use core::ffi::CStr;
use std::collections::VecDeque;

use rustix::fd::RawFd;
use rustix::fs::OFlags;
use rustix::io::{self, Errno};

use super::record::{NAME_OFFSET, RECLEN_OFFSET, TYPE_OFFSET};
use crate::gateway::Gateway;

/// Encode one `dirent64` record the way the kernel lays it out.
pub(crate) fn record(ino: u64, d_type: u8, name: &str) -> Vec<u8> {
    let reclen = (NAME_OFFSET + name.len() + 1 + 7) & !7;
    let mut bytes = vec![0; reclen];
    bytes[..8].copy_from_slice(&ino.to_ne_bytes());
    bytes[8..16].copy_from_slice(&(reclen as i64).to_ne_bytes());
    bytes[RECLEN_OFFSET..RECLEN_OFFSET + 2].copy_from_slice(&(reclen as u16).to_ne_bytes());
    bytes[TYPE_OFFSET] = d_type;
    bytes[NAME_OFFSET..NAME_OFFSET + name.len()].copy_from_slice(name.as_bytes());
    bytes
}

/// Encode regular-file records for `names`, back to back.
pub(crate) fn stream(names: &[&str]) -> Vec<u8> {
    names
        .iter()
        .zip(1..)
        .flat_map(|(name, ino)| record(ino, libc::DT_REG, name))
        .collect()
}

pub(crate) const FAKE_FD: RawFd = 42;

/// A gateway that replays a fixed sequence of `getdents64` results.
///
/// Once the script runs out every read reports end of stream.
#[derive(Debug)]
pub(crate) struct Script {
    open: io::Result<RawFd>,
    close: io::Result<()>,
    reads: RefCell<VecDeque<io::Result<Vec<u8>>>>,
    pub(crate) requested: RefCell<Vec<usize>>,
    pub(crate) opens: Cell<usize>,
    pub(crate) closes: Cell<usize>,
}

impl Script {
    pub(crate) fn new<I>(reads: I) -> Self
    where
        I: IntoIterator<Item = io::Result<Vec<u8>>>,
    {
        Self {
            open: Ok(FAKE_FD),
            close: Ok(()),
            reads: RefCell::new(reads.into_iter().collect()),
            requested: RefCell::new(Vec::new()),
            opens: Cell::new(0),
            closes: Cell::new(0),
        }
    }

    /// A script that yields `chunks` and then end of stream.
    pub(crate) fn chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self::new(chunks.into_iter().map(Ok))
    }

    /// A directory with no entries at all.
    pub(crate) fn empty() -> Self {
        Self::new(None)
    }

    pub(crate) fn failing_open(mut self, errno: Errno) -> Self {
        self.open = Err(errno);
        self
    }

    pub(crate) fn failing_close(mut self, errno: Errno) -> Self {
        self.close = Err(errno);
        self
    }

    pub(crate) fn reads(&self) -> usize {
        self.requested.borrow().len()
    }
}

impl Gateway for Script {
    fn open_dir(&self, _path: &CStr, flags: OFlags) -> io::Result<RawFd> {
        assert!(flags.contains(OFlags::DIRECTORY));
        self.opens.set(self.opens.get() + 1);
        self.open
    }

    fn read_entries(&self, fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
        assert_eq!(fd, FAKE_FD);
        assert_eq!(self.closes.get(), 0, "read after close");
        self.requested.borrow_mut().push(buf.len());
        match self.reads.borrow_mut().pop_front() {
            None => Ok(0),
            Some(Err(errno)) => Err(errno),
            // The kernel refuses a buffer too small for the next record.
            Some(Ok(chunk)) if chunk.len() > buf.len() => Err(Errno::INVAL),
            Some(Ok(chunk)) => {
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
        }
    }

    fn close(&self, fd: RawFd) -> io::Result<()> {
        assert_eq!(fd, FAKE_FD);
        self.closes.set(self.closes.get() + 1);
        self.close
    }
}
