//! Extract functions - read selected members out of an in-memory ZIP archive

use crate::ingestion::types::DatasetError;
use bytes::Bytes;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

/// A downloaded archive, parsed and held entirely in memory
pub struct Archive {
    inner: ZipArchive<Cursor<Bytes>>,
    len: usize,
}

impl Archive {
    /// Parse the bytes as a ZIP container
    pub fn open(bytes: Bytes) -> Result<Self, DatasetError> {
        let len = bytes.len();
        let inner = ZipArchive::new(Cursor::new(bytes)).map_err(DatasetError::BadZip)?;
        Ok(Archive { inner, len })
    }

    pub fn member_names(&self) -> Vec<String> {
        self.inner.file_names().map(|name| name.to_string()).collect()
    }

    /// Read one member by exact name. `Ok(None)` when the archive has no such member.
    pub fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>, DatasetError> {
        let mut file = match self.inner.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(ZipError::Io(source)) => {
                return Err(DatasetError::Member {
                    name: name.to_string(),
                    source,
                })
            }
            Err(e) => {
                return Err(DatasetError::Member {
                    name: name.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                })
            }
        };

        // Declared sizes come from the archive headers; never reserve more than was downloaded
        let hint = usize::try_from(file.size()).unwrap_or(usize::MAX).min(self.len);
        let mut data = Vec::with_capacity(hint);
        file.read_to_end(&mut data)
            .map_err(|source| DatasetError::Member {
                name: name.to_string(),
                source,
            })?;

        Ok(Some(data))
    }
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("members", &self.inner.len())
            .finish()
    }
}
