#![allow(dead_code)] // not every test binary uses every helper

use rand::RngCore;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[ctor::ctor]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct TempDir(PathBuf);

impl TempDir {
    pub fn join(&self, path: &str) -> PathBuf {
        let TempDir(ref p) = *self;
        p.join(path)
    }

    pub fn path(&self) -> &Path {
        let TempDir(ref p) = *self;
        p
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let TempDir(ref p) = *self;
        fs::remove_dir_all(p).unwrap();
    }
}

pub fn tmpdir() -> TempDir {
    let p = env::temp_dir();
    let mut r = rand::thread_rng();
    let ret = p.join(&format!("picodir-{}", r.next_u32()));
    fs::create_dir(&ret).unwrap();
    TempDir(ret)
}

/// Collect every name in `path`, in kernel order.
pub fn names(path: &Path) -> picodir::Result<(i32, Vec<String>)> {
    let mut seen = Vec::new();
    let ret = picodir::Dir::each(path, |name| {
        seen.push(name.to_str().unwrap().to_owned());
        0
    })?;
    Ok((ret, seen))
}
