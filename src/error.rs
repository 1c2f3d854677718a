use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IniError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("document has no file path to save to")]
    NoPath,
}
