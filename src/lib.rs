#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

extern crate alloc;

pub mod buffer;
pub mod dir;
mod error;
pub mod fs;
pub mod gateway;

pub use dir::{Dir, Entry, GrowthPolicy, ListOptions, Listing, Records};
pub use error::{Error, Result};
pub use gateway::{Gateway, Linux};
