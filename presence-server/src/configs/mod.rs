mod settings;
mod storage;

use std::path::{Path, PathBuf};
use std::{env, io};

pub use settings::{Auth, CorruptPolicy, Devices, Logger, Server, Settings, Store, User, environment};
pub use storage::Storage;

/// Resolves `path` against the working directory unless it is already absolute.
pub fn normalize_path(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = path.as_ref();

    Ok(if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    })
}
