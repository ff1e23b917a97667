//! JSON-file fallback adapters.
//!
//! Each record set lives in one JSON array file under the fallback data
//! directory, created on demand. Every mutation is a whole-file
//! read-modify-write: the collection is loaded, changed in memory, and
//! written back through a staged temp file + rename so readers never observe
//! a torn file. An in-process async mutex serialises writers; processes
//! sharing the directory are NOT synchronised with each other, which is the
//! documented residual gap of this store.

mod invoice_repository;
mod theme_repository;

pub use invoice_repository::JsonFileInvoiceRepository;
pub use theme_repository::JsonFileThemeRepository;

use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Failures raised by the file-backed collection.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CollectionError {
    /// Filesystem access failed.
    #[error("file store io failure at {path}: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The stored payload did not decode or encode.
    #[error("file store payload invalid: {message}")]
    Codec {
        /// Codec failure description.
        message: String,
    },
}

impl CollectionError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }
}

/// One JSON-array file holding a whole record collection.
pub(crate) struct JsonCollection<T> {
    dir_path: PathBuf,
    file_name: &'static str,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(dir_path: impl Into<PathBuf>, file_name: &'static str) -> Self {
        Self {
            dir_path: dir_path.into(),
            file_name,
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    fn open_dir(&self) -> Result<Dir, CollectionError> {
        Dir::create_ambient_dir_all(&self.dir_path, ambient_authority())
            .map_err(|error| CollectionError::io(&self.dir_path, error))?;
        Dir::open_ambient_dir(&self.dir_path, ambient_authority())
            .map_err(|error| CollectionError::io(&self.dir_path, error))
    }

    fn load_rows(&self, dir: &Dir) -> Result<Vec<T>, CollectionError> {
        match dir.read(self.file_name) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|error| CollectionError::codec(error.to_string())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(error) => Err(CollectionError::io(
                self.dir_path.join(self.file_name),
                error,
            )),
        }
    }

    fn store_rows(&self, dir: &Dir, rows: &[T]) -> Result<(), CollectionError> {
        let bytes = serde_json::to_vec_pretty(rows)
            .map_err(|error| CollectionError::codec(error.to_string()))?;
        let staged = format!(".tmp-{}-{}", self.file_name, Uuid::new_v4().simple());

        dir.write(&staged, &bytes)
            .map_err(|error| CollectionError::io(self.dir_path.join(&staged), error))?;

        let result = replace_file(dir, &staged, self.file_name, &self.dir_path);
        if result.is_err() {
            let _cleanup = dir.remove_file(&staged);
        }
        result
    }

    /// Read the whole collection under the writer lock.
    pub(crate) async fn read(&self) -> Result<Vec<T>, CollectionError> {
        let _guard = self.lock.lock().await;
        let dir = self.open_dir()?;
        self.load_rows(&dir)
    }

    /// Run one read-modify-write cycle under the writer lock.
    ///
    /// The file is only rewritten when `op` succeeds, so failed mutations
    /// leave the collection byte-identical.
    pub(crate) async fn mutate<R, E>(
        &self,
        op: impl FnOnce(&mut Vec<T>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<CollectionError>,
    {
        let _guard = self.lock.lock().await;
        let dir = self.open_dir().map_err(E::from)?;
        let mut rows = self.load_rows(&dir).map_err(E::from)?;
        let result = op(&mut rows)?;
        self.store_rows(&dir, &rows).map_err(E::from)?;
        Ok(result)
    }
}

fn replace_file(
    dir: &Dir,
    from: &str,
    to: &str,
    dir_path: &Path,
) -> Result<(), CollectionError> {
    match dir.remove_file(to) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(CollectionError::io(dir_path.join(to), error)),
    }
    dir.rename(from, dir, to)
        .map_err(|error| CollectionError::io(dir_path.join(to), error))
}
