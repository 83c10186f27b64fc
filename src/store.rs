//! Local key-value persistence.
//!
//! Every entity collection lives in its own JSON array under the data
//! directory, named `p4p_<collection>.json`. Access is synchronous
//! read-modify-write; a process-wide lock serializes writers inside one
//! process, separate processes are last-write-wins.

use serde::Serialize;
use serde::de::DeserializeOwned;

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const KEY_PREFIX: &str = "p4p_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Gyms,
    Courses,
    Subscriptions,
    Members,
    Instructors,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Users,
        Collection::Gyms,
        Collection::Courses,
        Collection::Subscriptions,
        Collection::Members,
        Collection::Instructors,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Gyms => "gyms",
            Collection::Courses => "courses",
            Collection::Subscriptions => "subscriptions",
            Collection::Members => "members",
            Collection::Instructors => "instructors",
        }
    }

    fn file_name(self) -> String {
        format!("{KEY_PREFIX}{}.json", self.key())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed '{collection}' collection: {source}")]
    Malformed {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode '{collection}' collection: {source}")]
    Encode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct Store {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl Store {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn contains(&self, collection: Collection) -> bool {
        self.path(collection).is_file()
    }

    /// Reads a collection; `None` when the key has never been written.
    pub fn read<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Option<Vec<T>>, StoreError> {
        let _guard = self.lock.lock().expect("store lock");
        self.read_unlocked(collection)
    }

    /// Reads a collection, treating a missing key as empty.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StoreError> {
        Ok(self.read(collection)?.unwrap_or_default())
    }

    pub fn write<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("store lock");
        self.write_unlocked(collection, items)
    }

    /// Read-modify-write under the store lock. The collection is written back
    /// after `apply` returns, whatever it did.
    pub fn update<T, R>(
        &self,
        collection: Collection,
        apply: impl FnOnce(&mut Vec<T>) -> R,
    ) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let _guard = self.lock.lock().expect("store lock");
        let mut items = self.read_unlocked(collection)?.unwrap_or_default();
        let result = apply(&mut items);
        self.write_unlocked(collection, &items)?;
        Ok(result)
    }

    pub fn remove(&self, collection: Collection) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("store lock");
        match std::fs::remove_file(self.path(collection)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            self.remove(collection)?;
        }
        Ok(())
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    fn read_unlocked<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Option<Vec<T>>, StoreError> {
        let raw = match std::fs::read_to_string(self.path(collection)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                collection: collection.key(),
                source,
            })
    }

    fn write_unlocked<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
    ) -> Result<(), StoreError> {
        let encoded =
            serde_json::to_string_pretty(items).map_err(|source| StoreError::Encode {
                collection: collection.key(),
                source,
            })?;
        atomic_write(&self.path(collection), &encoded)?;
        Ok(())
    }
}

fn atomic_write(path: &Path, contents: &str) -> std::io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("missing parent directory"))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("collection.json");
    let pid = std::process::id();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    for attempt in 0..10u32 {
        let temp_path = parent.join(format!(".{file_name}.tmp-{pid}-{nanos}-{attempt}"));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
        {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())?;
                file.flush()?;
                std::fs::rename(&temp_path, path)?;
                return Ok(());
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        "failed to allocate temp file",
    ))
}

/// Ids follow the `<prefix>-<millis><suffix>` shape of the stored records.
pub fn generate_id(prefix: &str) -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix: u16 = rand::random();
    format!("{prefix}-{millis}{suffix:04x}")
}
