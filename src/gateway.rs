//! The syscalls directory enumeration is built on.

use core::ffi::CStr;
use rustix::fd::{IntoRawFd, RawFd};
use rustix::fs::{Mode, OFlags};
use rustix::io::{self, Errno};

/// The OS surface consumed by [`Dir`].
///
/// [`Dir`]: crate::Dir
pub trait Gateway {
    /// Open `path` with `flags`, returning a new descriptor.
    fn open_dir(&self, path: &CStr, flags: OFlags) -> io::Result<RawFd>;

    /// Read as many raw `dirent64` records as fit into `buf`.
    ///
    /// Returns the number of bytes written, or 0 at end of stream.
    fn read_entries(&self, fd: RawFd, buf: &mut [u8]) -> io::Result<usize>;

    /// Close a descriptor returned by `open_dir`.
    fn close(&self, fd: RawFd) -> io::Result<()>;
}

impl<G: Gateway + ?Sized> Gateway for &G {
    #[inline]
    fn open_dir(&self, path: &CStr, flags: OFlags) -> io::Result<RawFd> {
        (**self).open_dir(path, flags)
    }

    #[inline]
    fn read_entries(&self, fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_entries(fd, buf)
    }

    #[inline]
    fn close(&self, fd: RawFd) -> io::Result<()> {
        (**self).close(fd)
    }
}

/// The real Linux syscalls.
#[derive(Debug, Default, Clone, Copy)]
pub struct Linux;

impl Gateway for Linux {
    fn open_dir(&self, path: &CStr, flags: OFlags) -> io::Result<RawFd> {
        rustix::fs::open(path, flags, Mode::empty()).map(IntoRawFd::into_raw_fd)
    }

    fn read_entries(&self, fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
        // Records are decoded by `dir::record`, which needs the raw byte
        // count, so make the call directly.
        let ret = unsafe {
            libc::syscall(
                libc::SYS_getdents64,
                fd,
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if ret < 0 {
            Err(Errno::from_raw_os_error(errno::errno().0))
        } else {
            Ok(ret as usize)
        }
    }

    fn close(&self, fd: RawFd) -> io::Result<()> {
        // Unlike `rustix::io::close`, report the error instead of dropping it.
        if unsafe { libc::close(fd) } == 0 {
            Ok(())
        } else {
            Err(Errno::from_raw_os_error(errno::errno().0))
        }
    }
}
