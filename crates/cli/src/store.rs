//! Directory-backed point-set store.
//!
//! Mirrors the upstream URL shape `<base>/pointset/<id>` on the filesystem,
//! so the service pipeline runs unchanged against local fixtures: a missing
//! file is "not found", any other I/O failure is "unavailable".

use std::io;
use std::path::PathBuf;

use triangulator::service::{PointSetId, PointSetStore, StoreError};

pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: &PointSetId) -> PathBuf {
        self.root.join("pointset").join(id.as_str())
    }
}

impl PointSetStore for DirStore {
    fn fetch(&self, id: &PointSetId) -> Result<Vec<u8>, StoreError> {
        match std::fs::read(self.path_for(id)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    #[test]
    fn fetches_stored_bytes() {
        let dir = tempdir().unwrap();
        let pointset_dir = dir.path().join("pointset");
        fs::create_dir_all(&pointset_dir).unwrap();
        fs::write(pointset_dir.join(ID), [1u8, 2, 3]).unwrap();

        let store = DirStore::new(dir.path());
        let id = PointSetId::parse(ID).unwrap();
        assert_eq!(store.fetch(&id).unwrap(), vec![1u8, 2, 3]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let store = DirStore::new(dir.path());
        let id = PointSetId::parse(ID).unwrap();
        assert_eq!(store.fetch(&id), Err(StoreError::NotFound));
    }
}
