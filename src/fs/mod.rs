//! Thin wrappers over the path-based syscalls that go alongside directory
//! enumeration.

mod file;

use alloc::ffi::CString;
use alloc::vec::Vec;
use rustix::fs::Mode;
use rustix::io;
use rustix::path::Arg;

pub use file::{File, OpenFlags};

/// Create a directory at `path` with permissions `mode`, subject to the
/// umask.
pub fn create_dir<P: Arg>(path: P, mode: Mode) -> io::Result<()> {
    rustix::fs::mkdir(path, mode)
}

/// Remove the empty directory at `path`.
pub fn remove_dir<P: Arg>(path: P) -> io::Result<()> {
    rustix::fs::rmdir(path)
}

/// The process's current working directory.
pub fn current_dir() -> io::Result<CString> {
    rustix::process::getcwd(Vec::new())
}

/// Change the process's current working directory.
pub fn set_current_dir<P: Arg>(path: P) -> io::Result<()> {
    rustix::process::chdir(path)
}

/// Change the process's root directory. Usually requires privileges.
pub fn change_root<P: Arg>(path: P) -> io::Result<()> {
    rustix::process::chroot(path)
}
