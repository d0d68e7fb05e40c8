pub mod file;

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unable to initialize persistence: {0}")]
    UnableToInitializePersistence(anyhow::Error),

    #[error("Unable to write blob: {0}")]
    UnableToWriteBlob(anyhow::Error),

    #[error("Unable to read blob: {0}")]
    UnableToReadBlob(anyhow::Error),

    #[error("Unable to reset storage: {0}")]
    UnableToResetStorage(anyhow::Error),
}

pub fn io_to_generic_error(error: std::io::Error) -> anyhow::Error {
    anyhow::Error::new(error)
}

pub enum ReadBlobState {
    Found(Vec<u8>),
    NotFound,
}

pub trait Storage {
    fn write_blob(&self, path: String, bytes: Vec<u8>) -> StorageResult<()>;
    fn read_blob(&self, path: String) -> StorageResult<ReadBlobState>;
    fn init(&self) -> StorageResult<()>;
    fn reset(&self) -> StorageResult<()>;
}
