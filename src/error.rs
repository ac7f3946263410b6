use libc::c_int;
use rustix::io::Errno;

/// Errors produced while enumerating a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An `open`, `getdents64`, or `close` call failed.
    #[error("{0}")]
    Os(#[from] Errno),

    /// The record stream contained a record that could not be decoded, such
    /// as one with a zero length, one running past the end of the filled
    /// bytes, or one whose name is not null-terminated.
    #[error("malformed directory record at offset {offset}")]
    Malformed {
        /// Byte offset of the offending record within the filled range.
        offset: usize,
    },

    /// The handle was never opened or has already been closed.
    #[error("directory handle is not open")]
    NotOpen,
}

impl Error {
    /// The positive `errno` value that best describes this error.
    pub fn raw_os_error(&self) -> c_int {
        match self {
            Self::Os(errno) => errno.raw_os_error(),
            Self::Malformed { .. } => libc::EUCLEAN,
            Self::NotOpen => libc::EBADF,
        }
    }

    /// The negative status code a C caller would see, as returned by the raw
    /// syscall.
    pub fn to_status(&self) -> c_int {
        -self.raw_os_error()
    }
}

/// A specialized `Result` type for directory enumeration.
pub type Result<T> = core::result::Result<T, Error>;
