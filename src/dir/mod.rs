//! Single-level directory enumeration.

mod read;
pub mod record;
#[cfg(test)]
pub(crate) mod testing;

use alloc::ffi::CString;
use core::ffi::CStr;
use core::mem::replace;
use libc::c_int;
use rustix::fd::{BorrowedFd, RawFd};
use rustix::fs::OFlags;
use rustix::path::Arg;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::gateway::{Gateway, Linux};

pub use read::{GrowthPolicy, ListOptions};
pub use record::{Entry, Records};

/// An open directory descriptor.
///
/// A `Dir` is the only owner of its descriptor. The descriptor is closed
/// exactly once: by [`Dir::close`], or when the `Dir` is dropped while still
/// open.
#[derive(Debug)]
pub struct Dir<G: Gateway = Linux> {
    fd: RawFd,
    path: CString,
    gateway: G,
}

impl Dir<Linux> {
    /// Open the directory at `path`.
    pub fn open<P: Arg>(path: P) -> Result<Self> {
        Self::open_with(Linux, path)
    }

    /// Open `path`, list it with the default options, and close it again.
    ///
    /// See [`Dir::each_with`].
    pub fn each<P, F>(path: P, visitor: F) -> Result<c_int>
    where
        P: Arg,
        F: FnMut(&CStr) -> c_int,
    {
        Self::each_with(Linux, path, &ListOptions::default(), visitor)
    }

    /// Make this directory the process's current working directory.
    pub fn set_current(&self) -> Result<()> {
        if !self.is_open() {
            return Err(Error::NotOpen);
        }
        let fd = unsafe { BorrowedFd::borrow_raw(self.fd) };
        rustix::process::fchdir(fd)?;
        Ok(())
    }
}

impl<G: Gateway> Dir<G> {
    /// Open the directory at `path` through `gateway`.
    pub fn open_with<P: Arg>(gateway: G, path: P) -> Result<Self> {
        let path = path.into_c_str()?.into_owned();
        let fd = gateway.open_dir(
            &path,
            OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
        )?;
        log::trace!("Opened directory {:?} as fd {}", path, fd);
        Ok(Self { fd, path, gateway })
    }

    /// Open `path`, list it, and close it again.
    ///
    /// If the open fails its error is returned and `visitor` is never
    /// called. Otherwise the descriptor is closed whatever `list` returned,
    /// and the result of `list` is passed through; a failure to close is
    /// logged rather than returned.
    pub fn each_with<P, F>(
        gateway: G,
        path: P,
        options: &ListOptions,
        visitor: F,
    ) -> Result<c_int>
    where
        P: Arg,
        F: FnMut(&CStr) -> c_int,
    {
        let mut dir = Self::open_with(gateway, path)?;
        let ret = dir.list_with(options, visitor);
        if let Err(err) = dir.close() {
            log::warn!("Failed to close directory {:?}: {}", dir.path, err);
        }
        ret
    }

    /// The raw descriptor, or a negative value once closed.
    #[inline]
    pub fn fd(&self) -> RawFd {
        self.fd
    }

    /// The path this directory was opened with.
    #[inline]
    pub fn path(&self) -> &CStr {
        &self.path
    }

    /// Whether the descriptor is still open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.fd >= 0
    }

    /// Call `visitor` with the name of every entry, using the default
    /// options.
    ///
    /// See [`Dir::list_with`].
    pub fn list<F>(&mut self, visitor: F) -> Result<c_int>
    where
        F: FnMut(&CStr) -> c_int,
    {
        self.list_with(&ListOptions::default(), visitor)
    }

    /// Call `visitor` with the name of every entry, in the order the kernel
    /// returns them, `.` and `..` included.
    ///
    /// Enumeration stops as soon as `visitor` returns nonzero, and that value
    /// is returned. Returns 0 if every entry was visited.
    ///
    /// The whole directory is read before `visitor` is first called, so a
    /// read error means `visitor` is never called at all.
    pub fn list_with<F>(&mut self, options: &ListOptions, visitor: F) -> Result<c_int>
    where
        F: FnMut(&CStr) -> c_int,
    {
        let listing = self.entries(options)?;
        let ret = record::visit(listing.as_bytes(), visitor);
        listing.buffer.free();
        ret
    }

    /// Read every entry into an owned [`Listing`] that can be iterated
    /// lazily.
    pub fn entries(&mut self, options: &ListOptions) -> Result<Listing> {
        if !self.is_open() {
            return Err(Error::NotOpen);
        }
        let (buffer, filled) = read::fill(&self.gateway, self.fd, options)?;
        Ok(Listing { buffer, filled })
    }

    /// Close the descriptor.
    ///
    /// The handle is closed even if this returns an error; closing it a
    /// second time returns [`Error::NotOpen`].
    pub fn close(&mut self) -> Result<()> {
        if !self.is_open() {
            return Err(Error::NotOpen);
        }
        let fd = replace(&mut self.fd, -1);
        log::trace!("Closing directory fd {}", fd);
        self.gateway.close(fd)?;
        Ok(())
    }
}

impl<G: Gateway> Drop for Dir<G> {
    fn drop(&mut self) {
        if self.is_open() {
            if let Err(err) = self.close() {
                log::warn!("Failed to close directory {:?}: {}", self.path, err);
            }
        }
    }
}

/// The raw records of one directory read, owned.
#[derive(Debug)]
pub struct Listing {
    buffer: Buffer,
    filled: usize,
}

impl Listing {
    /// The filled bytes, holding zero or more back-to-back records.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_slice()[..self.filled]
    }

    /// Whether the directory yielded no records at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> Records<'_> {
        Records::new(self.as_bytes())
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = Result<Entry<'a>>;
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
