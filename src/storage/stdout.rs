use async_trait::async_trait;

use crate::{
    error::StoreError,
    snapshot::Snapshot,
    storage::{
        encode,
        Storage,
    },
};



/// Dry run storage that does not persist anything, but prints snapshot to
/// STDOUT instead. There is never a previous snapshot to fall back to.
#[derive(Debug, Default)]
pub struct Stdout;



impl Stdout {
    pub fn new() -> Self {
        Self
    }
}



#[async_trait]
impl Storage for Stdout {
    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(None)
    }



    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        println!("{}", encode(snapshot)?);
        Ok(())
    }
}
