//! Cart Storage
//!
//! The cart is persisted as a whole under a single key after every mutation
//! and rehydrated on load. There is exactly one writer, so no merging or
//! conflict resolution happens here.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};

use crate::cart::{CartError, models::CartItem};

/// Key the cart is stored under.
pub const CART_STORAGE_KEY: &str = "giftbox-cart";

/// Schema version written into the persisted envelope.
pub const CART_STORAGE_VERSION: u32 = 0;

/// Backing store for the cart.
pub trait CartStorage {
    /// Load the persisted items; an absent cart is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read or parsed.
    fn load(&self) -> Result<Vec<CartItem>, CartError>;

    /// Replace the persisted items.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized or written.
    fn save(&mut self, items: &[CartItem]) -> Result<(), CartError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCart {
    state: CartState,
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CartState {
    #[serde(default)]
    items: Vec<CartItem>,
}

fn encode(items: &[CartItem]) -> Result<String, CartError> {
    serde_json::to_string_pretty(&PersistedCart {
        state: CartState {
            items: items.to_vec(),
        },
        version: CART_STORAGE_VERSION,
    })
    .map_err(CartError::Serialize)
}

fn decode(raw: &str) -> Result<Vec<CartItem>, CartError> {
    serde_json::from_str::<PersistedCart>(raw)
        .map(|persisted| persisted.state.items)
        .map_err(CartError::Corrupt)
}

/// Cart persisted to `<dir>/giftbox-cart.json`.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    /// Store the cart inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CART_STORAGE_KEY}.json")),
        }
    }

    /// Location of the cart file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: io::Error) -> CartError {
        CartError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> Result<Vec<CartItem>, CartError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(CartError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&mut self, items: &[CartItem]) -> Result<(), CartError> {
        let encoded = encode(items)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.write_error(source))?;
        }

        // The cart file is only ever replaced whole.
        let staging = self.path.with_extension("json.tmp");

        fs::write(&staging, encoded).map_err(|source| self.write_error(source))?;
        fs::rename(&staging, &self.path).map_err(|source| self.write_error(source))
    }
}

/// Key/value storage held in memory. Clones share the same entries, which
/// lets a second store rehydrate what the first one persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryCartStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw persisted value under [`CART_STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Poisoned`] if the lock is poisoned.
    pub fn raw(&self) -> Result<Option<String>, CartError> {
        let entries = self.entries.lock().map_err(|_poisoned| CartError::Poisoned)?;

        Ok(entries.get(CART_STORAGE_KEY).cloned())
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self) -> Result<Vec<CartItem>, CartError> {
        match self.raw()? {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, items: &[CartItem]) -> Result<(), CartError> {
        let encoded = encode(items)?;

        self.entries
            .lock()
            .map_err(|_poisoned| CartError::Poisoned)?
            .insert(CART_STORAGE_KEY.to_string(), encoded);

        Ok(())
    }
}
