use crate::database::registry::registry::AddressBook;

use super::document::{Document, RestoreError};
use super::storage::{ReadBlobState, Storage, StorageResult};

const DOCUMENT_FILE: &str = "addressbook.json";

/// Bridges the registry and the storage engine: the whole dataset is read
/// and written as one document, there is no partial or incremental mode.
pub struct SnapshotManager {
    storage: Box<dyn Storage>,
}

impl SnapshotManager {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// A missing document is a first launch, not an error; it restores as
    /// an empty registry.
    #[tracing::instrument(skip(self))]
    pub fn restore_registry(&self) -> Result<AddressBook, RestoreError> {
        let document = match self.storage.read_blob(DOCUMENT_FILE.to_string())? {
            ReadBlobState::Found(bytes) => serde_json::from_slice::<Document>(&bytes)?,
            ReadBlobState::NotFound => Document::default(),
        };

        document.into_registry()
    }

    #[tracing::instrument(skip(self, address_book))]
    pub fn create_snapshot(&self, address_book: &AddressBook) -> StorageResult<()> {
        let document = Document::from_registry(address_book);

        let serialized_data = serde_json::to_string(&document)
            .expect("The document contains nothing that can fail to serialize");

        self.storage
            .write_blob(DOCUMENT_FILE.to_string(), serialized_data.into_bytes())
    }
}
