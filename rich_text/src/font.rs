// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Custom font lookup and per-collection registration.
//!
//! Hosts install a [`FontAdapter`] per family name in a [`FontRegistry`]. When a
//! span asks for a family, the paragraph builder calls
//! [`FontCollectionResource::ensure_registered`], which resolves the adapter's
//! [`FontSource`] to bytes (cached process-wide) and registers them with the
//! engine collection once.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use hashbrown::{HashMap, HashSet};
use parking_lot::{Mutex, RwLock};

use crate::engine::FontCollection;
use crate::{Error, Result};

/// Prefix marking a path inside the application's bundled resources.
pub const RAW_FILE_PREFIX: &str = "rawfile:";

/// Where the data of a custom font comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum FontSource {
    /// Font data already in memory.
    Bytes(Arc<Vec<u8>>),
    /// A font file on disk.
    File(PathBuf),
    /// A font bundled with the application, read through the [`ResourceManager`].
    RawFile(String),
}

impl FontSource {
    /// Interprets a path, recognizing the [`RAW_FILE_PREFIX`].
    pub fn from_path(path: &str) -> Self {
        match path.strip_prefix(RAW_FILE_PREFIX) {
            Some(raw) => Self::RawFile(raw.to_owned()),
            None => Self::File(PathBuf::from(path)),
        }
    }
}

/// Resolves a family name to the source of its font data.
pub type FontAdapter = Arc<dyn Fn(&str) -> Option<FontSource> + Send + Sync>;

/// Access to files bundled with the host application.
pub trait ResourceManager: Send + Sync {
    /// Reads a bundled file, `path` being relative to the resource root.
    fn read_raw_file(&self, path: &str) -> io::Result<Vec<u8>>;
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum CacheKey {
    File(PathBuf),
    RawFile(String),
}

/// Family name to adapter map plus a cache of loaded font bytes.
///
/// A process normally uses the [`FontRegistry::global`] instance; tests create
/// their own or call [`FontRegistry::clear`].
#[derive(Default)]
pub struct FontRegistry {
    adapters: RwLock<HashMap<String, FontAdapter>>,
    cache: Mutex<HashMap<CacheKey, Arc<Vec<u8>>>>,
}

impl core::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("families", &self.adapters.read().keys().collect::<Vec<_>>())
            .field("cached", &self.cache.lock().len())
            .finish()
    }
}

impl FontRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<FontRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Installs or replaces the adapter for `family`.
    pub fn install_adapter(
        &self,
        family: impl Into<String>,
        adapter: impl Fn(&str) -> Option<FontSource> + Send + Sync + 'static,
    ) {
        self.adapters.write().insert(family.into(), Arc::new(adapter));
    }

    /// Whether an adapter is installed for `family`.
    pub fn has_adapter(&self, family: &str) -> bool {
        self.adapters.read().contains_key(family)
    }

    /// Removes every adapter and drops all cached font data.
    pub fn clear(&self) {
        self.adapters.write().clear();
        self.cache.lock().clear();
    }

    /// Resolves `family` through its adapter and loads the font data.
    pub fn load(
        &self,
        family: &str,
        resources: Option<&dyn ResourceManager>,
    ) -> Result<Arc<Vec<u8>>> {
        let adapter = self
            .adapters
            .read()
            .get(family)
            .cloned()
            .ok_or_else(|| Error::UnknownFontFamily(family.to_owned()))?;
        // The adapter is host code; call it without holding the lock.
        let source = adapter(family).ok_or_else(|| Error::FontRegistration {
            family: family.to_owned(),
            reason: "adapter returned no font source".to_owned(),
        })?;
        let key = match source {
            FontSource::Bytes(data) if data.is_empty() => {
                return Err(Error::FontRegistration {
                    family: family.to_owned(),
                    reason: "empty font buffer".to_owned(),
                });
            }
            FontSource::Bytes(data) => return Ok(data),
            FontSource::File(path) => CacheKey::File(path),
            FontSource::RawFile(path) => CacheKey::RawFile(path),
        };
        if let Some(data) = self.cache.lock().get(&key) {
            return Ok(data.clone());
        }
        let bytes = match &key {
            CacheKey::File(path) => std::fs::read(path),
            CacheKey::RawFile(path) => match resources {
                Some(resources) => resources.read_raw_file(path),
                None => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no resource manager available",
                )),
            },
        }
        .map_err(|source| Error::FontLoad {
            family: family.to_owned(),
            source,
        })?;
        let data = Arc::new(bytes);
        self.cache.lock().insert(key, data.clone());
        Ok(data)
    }
}

/// An engine font collection together with the families registered into it.
#[derive(Debug)]
pub struct FontCollectionResource<F> {
    collection: F,
    registered: HashSet<String>,
}

impl<F: FontCollection> FontCollectionResource<F> {
    /// Wraps an empty engine collection.
    pub fn new(collection: F) -> Self {
        Self {
            collection,
            registered: HashSet::new(),
        }
    }

    /// Registers `family` unless it already is.
    ///
    /// Returns whether the family is available in this collection afterwards.
    /// Families without an adapter are left to the engine's own font
    /// matching and report `false`. Failures are logged and retried on the
    /// next call.
    pub fn ensure_registered(
        &mut self,
        family: &str,
        registry: &FontRegistry,
        resources: Option<&dyn ResourceManager>,
    ) -> bool {
        if self.registered.contains(family) {
            return true;
        }
        if !registry.has_adapter(family) {
            return false;
        }
        let result = registry
            .load(family, resources)
            .and_then(|data| self.collection.register_font(family, data));
        match result {
            Ok(()) => {
                self.registered.insert(family.to_owned());
                true
            }
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    /// Whether `family` has been registered.
    pub fn is_registered(&self, family: &str) -> bool {
        self.registered.contains(family)
    }

    /// The engine collection.
    pub fn collection(&self) -> &F {
        &self.collection
    }

    /// The engine collection, mutably.
    pub fn collection_mut(&mut self) -> &mut F {
        &mut self.collection
    }
}
