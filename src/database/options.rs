use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub data_directory: PathBuf,
    pub restore: bool,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl DatabaseOptions {
    pub fn set_data_directory(mut self, data_directory: PathBuf) -> Self {
        self.data_directory = data_directory;
        self
    }

    /// Defines whether we should attempt to restore the dataset from disk
    /// on startup
    pub fn set_restore(mut self, restore: bool) -> Self {
        self.restore = restore;
        self
    }
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        // Defaults to $CWD/data
        Self {
            data_directory: PathBuf::from("data"),
            restore: true,
        }
    }
}

#[cfg(test)]
impl DatabaseOptions {
    pub fn new_test() -> Self {
        let database_dir: PathBuf = ["/", "tmp", "rosterdb", &uuid::Uuid::new_v4().to_string()]
            .iter()
            .collect();

        DatabaseOptions::default().set_data_directory(database_dir)
    }
}
