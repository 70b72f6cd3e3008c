use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ServiceError;

/// Generic JSON file-backed list store.
///
/// Reads and writes a whole `Vec<T>` as one pretty-printed JSON array.
/// Every write truncates and rewrites the file; there is no temp-file rename,
/// so a crash mid-write can leave a truncated file behind.
#[derive(Clone, Debug)]
pub struct JsonListStore<T> {
    file_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _marker: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read the list from disk. `Ok(None)` means the file does not exist.
    pub fn read(&self) -> Result<Option<Vec<T>>, ServiceError> {
        let file = match File::open(&self.file_path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ServiceError::persistence(e)),
        };
        let items: Vec<T> = serde_json::from_reader(BufReader::new(file)).map_err(ServiceError::persistence)?;
        Ok(Some(items))
    }

    /// Overwrite the file with `items`. The handle is flushed and closed before returning.
    pub fn write(&self, items: &[T]) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ServiceError::persistence)?;
        }
        let file = File::create(&self.file_path).map_err(ServiceError::persistence)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, items).map_err(ServiceError::persistence)?;
        writer.flush().map_err(ServiceError::persistence)?;
        Ok(())
    }
}
