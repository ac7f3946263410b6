use bitflags::bitflags;
use rustix::fd::{AsFd, BorrowedFd, OwnedFd};
use rustix::fs::{Access, Mode, OFlags};
use rustix::io;
use rustix::path::Arg;

bitflags! {
    /// How a [`File`] is opened.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        /// Open for reading.
        const READ = 1 << 0;
        /// Open for writing.
        const WRITE = 1 << 1;
        /// Position every write at the end of the file.
        const APPEND = 1 << 2;
        /// Truncate the file to zero length on open.
        const TRUNCATE = 1 << 3;
    }
}

impl OpenFlags {
    /// The `O_*` flags passed to `open`.
    ///
    /// Files are always opened with `O_NONBLOCK` and `O_CLOEXEC`.
    pub fn to_oflags(self) -> OFlags {
        let mut oflags = OFlags::NONBLOCK | OFlags::CLOEXEC;
        oflags |= match (self.contains(Self::READ), self.contains(Self::WRITE)) {
            (true, true) => OFlags::RDWR,
            (false, true) => OFlags::WRONLY,
            _ => OFlags::RDONLY,
        };
        if self.contains(Self::APPEND) {
            oflags |= OFlags::APPEND;
        }
        if self.contains(Self::TRUNCATE) {
            oflags |= OFlags::TRUNC;
        }
        oflags
    }
}

/// An open file descriptor.
///
/// This only manages the descriptor; reading and writing contents is left to
/// other layers.
#[derive(Debug)]
pub struct File {
    fd: OwnedFd,
}

impl File {
    /// Open the existing file at `path`.
    pub fn open<P: Arg>(path: P, flags: OpenFlags) -> io::Result<Self> {
        let fd = rustix::fs::open(path, flags.to_oflags(), Mode::empty())?;
        Ok(Self { fd })
    }

    /// Open the file at `path`, creating it with `mode` if it doesn't exist.
    pub fn create<P: Arg>(path: P, flags: OpenFlags, mode: Mode) -> io::Result<Self> {
        let fd = rustix::fs::open(path, flags.to_oflags() | OFlags::CREATE, mode)?;
        Ok(Self { fd })
    }

    /// The size in bytes of the file at `path`.
    pub fn size_of<P: Arg>(path: P) -> io::Result<u64> {
        let st = rustix::fs::stat(path)?;
        Ok(st.st_size as u64)
    }

    /// The size in bytes of this file.
    pub fn size(&self) -> io::Result<u64> {
        let st = rustix::fs::fstat(&self.fd)?;
        Ok(st.st_size as u64)
    }

    /// Whether anything exists at `path`.
    pub fn exists<P: Arg>(path: P) -> bool {
        rustix::fs::access(path, Access::EXISTS).is_ok()
    }

    /// Whether the calling process may read `path`.
    pub fn is_readable<P: Arg>(path: P) -> bool {
        rustix::fs::access(path, Access::READ_OK).is_ok()
    }

    /// Whether the calling process may write `path`.
    pub fn is_writable<P: Arg>(path: P) -> bool {
        rustix::fs::access(path, Access::WRITE_OK).is_ok()
    }

    /// Whether the calling process may execute `path`.
    pub fn is_executable<P: Arg>(path: P) -> bool {
        rustix::fs::access(path, Access::EXEC_OK).is_ok()
    }

    /// Remove the file at `path`.
    pub fn remove<P: Arg>(path: P) -> io::Result<()> {
        rustix::fs::unlink(path)
    }

    /// The underlying descriptor.
    #[inline]
    pub fn fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsFd for File {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl From<File> for OwnedFd {
    #[inline]
    fn from(file: File) -> Self {
        file.fd
    }
}
