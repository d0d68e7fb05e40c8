use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::PathBuf,
};

use super::{io_to_generic_error, ReadBlobState, Storage, StorageError, StorageResult};

pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        std::fs::create_dir_all(&base_path).expect("Cannot create directory");

        Self { base_path }
    }

    fn get_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for FileStorage {
    // Writes land in a temporary sibling which is renamed over the target,
    // a failed write leaves the previous blob untouched
    fn write_blob(&self, path: String, bytes: Vec<u8>) -> StorageResult<()> {
        let temp_path = self.get_path(&format!("{}.tmp-{}", path, uuid::Uuid::new_v4()));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .map_err(|e| StorageError::UnableToWriteBlob(io_to_generic_error(e)))?;

        file.write_all(&bytes)
            .map_err(|e| StorageError::UnableToWriteBlob(io_to_generic_error(e)))?;

        file.sync_all()
            .map_err(|e| StorageError::UnableToWriteBlob(io_to_generic_error(e)))?;

        fs::rename(&temp_path, self.get_path(&path))
            .map_err(|e| StorageError::UnableToWriteBlob(io_to_generic_error(e)))
    }

    fn read_blob(&self, path: String) -> StorageResult<ReadBlobState> {
        let mut file = match File::open(self.get_path(&path)) {
            Ok(file) => file,
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => return Ok(ReadBlobState::NotFound),
                _ => return Err(StorageError::UnableToReadBlob(io_to_generic_error(err))),
            },
        };

        let mut buf = Vec::new();

        file.read_to_end(&mut buf)
            .map_err(|e| StorageError::UnableToReadBlob(io_to_generic_error(e)))?;

        Ok(ReadBlobState::Found(buf))
    }

    // Called on start-up, should be idempotent
    fn init(&self) -> StorageResult<()> {
        std::fs::create_dir_all(&self.base_path)
            .map_err(|e| StorageError::UnableToInitializePersistence(io_to_generic_error(e)))?;

        Ok(())
    }

    // Called when the dataset gets cleared (via user)
    fn reset(&self) -> StorageResult<()> {
        fs::remove_dir_all(&self.base_path)
            .map_err(|e| StorageError::UnableToResetStorage(io_to_generic_error(e)))?;

        self.init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage() -> FileStorage {
        let base_path: PathBuf = ["/", "tmp", "rosterdb", &uuid::Uuid::new_v4().to_string()]
            .iter()
            .collect();

        FileStorage::new(base_path)
    }

    #[test]
    fn written_blobs_can_be_read_back() {
        let storage = test_storage();

        storage
            .write_blob("blob.json".to_string(), b"{\"groups\":[]}".to_vec())
            .expect("write should succeed");

        match storage.read_blob("blob.json".to_string()) {
            Ok(ReadBlobState::Found(bytes)) => assert_eq!(bytes, b"{\"groups\":[]}"),
            _ => panic!("blob should exist"),
        }
    }

    #[test]
    fn reading_a_missing_blob_reports_not_found() {
        let storage = test_storage();

        assert!(matches!(
            storage.read_blob("missing.json".to_string()),
            Ok(ReadBlobState::NotFound)
        ));
    }

    #[test]
    fn overwriting_leaves_no_temporary_files_behind() {
        let storage = test_storage();

        storage
            .write_blob("blob.json".to_string(), b"first".to_vec())
            .expect("write should succeed");

        storage
            .write_blob("blob.json".to_string(), b"second".to_vec())
            .expect("overwrite should succeed");

        let entries: Vec<_> = fs::read_dir(&storage.base_path)
            .expect("directory exists")
            .map(|entry| entry.expect("entry is readable").file_name())
            .collect();

        assert_eq!(entries, vec!["blob.json"]);

        match storage.read_blob("blob.json".to_string()) {
            Ok(ReadBlobState::Found(bytes)) => assert_eq!(bytes, b"second"),
            _ => panic!("blob should exist"),
        }
    }

    #[test]
    fn reset_clears_previous_blobs() {
        let storage = test_storage();

        storage
            .write_blob("blob.json".to_string(), b"data".to_vec())
            .expect("write should succeed");

        storage.reset().expect("reset should succeed");

        assert!(matches!(
            storage.read_blob("blob.json".to_string()),
            Ok(ReadBlobState::NotFound)
        ));
    }
}
