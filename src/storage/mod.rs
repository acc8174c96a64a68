pub mod json_file;
pub mod stdout;

use async_trait::async_trait;

use crate::{
    error::StoreError,
    snapshot::Snapshot,
};



/// Single slot snapshot storage. Every `save` replaces what was stored before.
#[async_trait]
pub trait Storage {
    /// Load previously saved snapshot.
    ///
    /// `Ok(None)` means that nothing was stored yet. A stored record that can
    /// not be read back as snapshot is returned as error so that caller can
    /// report it.
    async fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}



/// Encode snapshot the same way for every storage: pretty printed UTF-8 JSON
/// with non-ASCII characters kept as-is.
pub fn encode(snapshot: &Snapshot) -> Result<String, StoreError> {
    serde_json::to_string_pretty(snapshot).map_err(StoreError::Encode)
}
