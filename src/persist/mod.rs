pub mod sqlite;

#[derive(Debug)]
pub enum PersistError {
    Sqlite(rusqlite::Error),
    Serde(serde_json::Error),
    Message(String),
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Single keyed slot holding the serialized registry.
///
/// `write` replaces the whole payload; `read` returns `None` when the slot
/// has never been written.
pub trait StoragePort: Send {
    fn read(&mut self) -> PersistResult<Option<Vec<u8>>>;
    fn write(&mut self, payload: &[u8]) -> PersistResult<()>;
    fn clear(&mut self) -> PersistResult<()>;
}
