use std::{
    io::ErrorKind,
    path::{
        Path,
        PathBuf,
    },
};

use async_trait::async_trait;

use tokio::fs;

use crate::{
    error::StoreError,
    snapshot::Snapshot,
    storage::{
        encode,
        Storage,
    },
};



/// JSON file storage.
///
/// `path` - file that front-end reads.
///
/// Saving writes into a temporary file next to `path` and renames it over
/// `path`, so that a reader never sees half written record.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}



impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }



    pub fn path(&self) -> &Path {
        &self.path
    }



    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");

        self.path.with_file_name(name)
    }
}



#[async_trait]
impl Storage for JsonFile {
    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot = serde_json::from_str(&data).map_err(StoreError::Corrupt)?;

        Ok(Some(snapshot))
    }



    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut data = encode(snapshot)?;
        data.push('\n');

        let tmp = self.tmp_path();
        fs::write(&tmp, data.as_bytes()).await?;

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            // Do not leave stale temporary file behind.
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into())
        }

        Ok(())
    }
}
