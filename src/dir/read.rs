use rustix::fd::RawFd;

use super::record::MAX_RECORD_LEN;
use crate::buffer::Buffer;
use rustix::io::Errno;

use crate::error::{Error, Result};
use crate::gateway::Gateway;

/// When the read loop doubles its buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// Double after every read that returned data.
    ///
    /// This may allocate well past what the directory needs, since the
    /// buffer is doubled once more before the final empty read.
    #[default]
    Always,

    /// Double only when a read filled the space it was given, or when the
    /// space left can no longer hold a record with a maximum-length name.
    OnDemand,
}

/// Tuning for a single `list` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    initial_capacity: usize,
    growth: GrowthPolicy,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            initial_capacity: rustix::param::page_size(),
            growth: GrowthPolicy::Always,
        }
    }
}

impl ListOptions {
    /// Start with a buffer of `bytes` bytes. Values too small for a record
    /// with a maximum-length name are raised to that size.
    pub fn initial_capacity(mut self, bytes: usize) -> Self {
        self.initial_capacity = bytes.max(MAX_RECORD_LEN);
        self
    }

    /// Choose when the buffer grows.
    pub fn growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// The starting buffer size in bytes.
    pub fn capacity(&self) -> usize {
        self.initial_capacity
    }

    /// The configured growth policy.
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }
}

/// Read every record `fd` currently yields into a fresh buffer.
///
/// Returns the buffer together with the number of bytes filled. On error
/// the buffer is released before returning.
///
/// Every read is offered at least `MAX_RECORD_LEN` bytes, so the kernel
/// never rejects a read because the next name is too long for the tail.
pub(crate) fn fill<G: Gateway>(
    gateway: &G,
    fd: RawFd,
    options: &ListOptions,
) -> Result<(Buffer, usize)> {
    let mut buffer = Buffer::allocate(options.initial_capacity);
    let mut filled = 0;

    loop {
        let spare = buffer.spare_from(filled);
        let requested = spare.len();
        let ret = match gateway.read_entries(fd, spare) {
            Ok(ret) => ret,
            Err(err) => {
                log::trace!("`getdents64({})` failed: {:?}", fd, err);
                buffer.free();
                return Err(err.into());
            }
        };
        log::trace!(
            "`getdents64({}, {} bytes)` returned {}",
            fd,
            requested,
            ret
        );
        if ret == 0 {
            break;
        }
        if ret > requested {
            log::debug!(
                "`getdents64({})` reported {} bytes into a {} byte buffer",
                fd,
                ret,
                requested
            );
            buffer.free();
            return Err(Error::Os(Errno::INVAL));
        }

        filled += ret;

        let grow = match options.growth {
            GrowthPolicy::Always => true,
            GrowthPolicy::OnDemand => {
                ret >= requested || buffer.capacity() - filled < MAX_RECORD_LEN
            }
        };
        if grow {
            let mut new_size = buffer.capacity() * 2;
            while new_size - filled < MAX_RECORD_LEN {
                new_size *= 2;
            }
            log::trace!(
                "Growing record buffer from {} to {} bytes",
                buffer.capacity(),
                new_size
            );
            buffer.resize(new_size);
        }
    }

    Ok((buffer, filled))
}
