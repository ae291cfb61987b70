//! Persistent, content-addressed store of compiled kernels.
//!
//! Every fused block is fingerprinted; the store maps fingerprints to loaded
//! `launcher` function pointers and is backed by a directory of shared
//! objects named `{fingerprint}.so`. Objects survive process restarts: with
//! preloading enabled the whole directory is loaded at startup, otherwise
//! objects are loaded lazily the first time their fingerprint comes up.
//!
//! The map is write-once per fingerprint; once `symbol_ready` reports true
//! the entry never changes for the store's lifetime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use libloading::Library;
use log::{debug, warn};

use crate::errors::StoreError;
use crate::types::KernelFn;

/// The symbol every compiled kernel object must export.
const LAUNCHER_SYMBOL: &[u8] = b"launcher";

/// Maps kernel fingerprints to loaded function pointers, backed by a
/// directory of compiled shared objects.
pub struct KernelStore {
    object_dir: PathBuf,
    kernel_dir: PathBuf,
    funcs: HashMap<String, KernelFn>,
    objects: HashMap<String, String>,
    // Loaded libraries are never dropped before the store itself: the raw
    // function pointers in `funcs` stay valid only while their library is
    // resident.
    libs: Vec<Library>,
}

impl std::fmt::Debug for KernelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelStore")
            .field("object_dir", &self.object_dir)
            .field("kernel_dir", &self.kernel_dir)
            .field("loaded", &self.funcs.len())
            .finish()
    }
}

impl KernelStore {
    /// Creates a store over the given object and source-dump directories.
    pub fn new(object_dir: impl Into<PathBuf>, kernel_dir: impl Into<PathBuf>) -> Self {
        Self {
            object_dir: object_dir.into(),
            kernel_dir: kernel_dir.into(),
            funcs: HashMap::new(),
            objects: HashMap::new(),
            libs: Vec::new(),
        }
    }

    /// True iff a callable function pointer is loaded for the fingerprint.
    pub fn symbol_ready(&self, fingerprint: &str) -> bool {
        self.funcs.contains_key(fingerprint)
    }

    /// The loaded launcher for a ready fingerprint.
    pub fn func(&self, fingerprint: &str) -> Option<KernelFn> {
        self.funcs.get(fingerprint).copied()
    }

    /// Number of loaded kernels.
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Scans the object directory and loads every shared object present,
    /// returning how many were loaded. Objects that fail to load are skipped
    /// with a warning; they will be recompiled on demand.
    pub fn preload(&mut self) -> Result<usize, StoreError> {
        let entries = std::fs::read_dir(&self.object_dir).map_err(|source| StoreError::Scan {
            dir: self.object_dir.clone(),
            source,
        })?;
        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("so") {
                continue;
            }
            let Some(fingerprint) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let fingerprint = fingerprint.to_string();
            self.add_symbol(&fingerprint, &format!("{fingerprint}.so"));
            if self.load(&fingerprint) {
                loaded += 1;
            }
        }
        debug!(
            "preloaded {loaded} kernel objects from {}",
            self.object_dir.display()
        );
        Ok(loaded)
    }

    /// Records that an object file for the fingerprint has been produced.
    pub fn add_symbol(&mut self, fingerprint: &str, filename: &str) {
        self.objects
            .insert(fingerprint.to_string(), filename.to_string());
    }

    /// Opens the fingerprint's object file and resolves its launcher.
    ///
    /// Returns false when the object does not exist or lacks the symbol; the
    /// cause is logged. A fingerprint that is already ready is a no-op.
    pub fn load(&mut self, fingerprint: &str) -> bool {
        if self.symbol_ready(fingerprint) {
            return true;
        }
        let path = self.obj_abspath(fingerprint);
        if !path.exists() {
            warn!("kernel object missing: {}", path.display());
            return false;
        }
        // SAFETY: the object was produced by the configured compiler from
        // source this engine emitted; loading it runs no initialization code
        // beyond the platform loader's.
        let lib = match unsafe { Library::new(&path) } {
            Ok(lib) => lib,
            Err(err) => {
                warn!("failed to load {}: {err}", path.display());
                return false;
            }
        };
        // SAFETY: every emitted object exports `launcher` with the KernelFn
        // signature; the pointer is only used while `lib` is held alive in
        // `self.libs`.
        let func: KernelFn = match unsafe { lib.get::<KernelFn>(LAUNCHER_SYMBOL) } {
            Ok(sym) => *sym,
            Err(err) => {
                warn!("{} lacks launcher symbol: {err}", path.display());
                return false;
            }
        };
        self.libs.push(lib);
        self.funcs.insert(fingerprint.to_string(), func);
        true
    }

    /// Path of the source dump for a fingerprint.
    pub fn src_abspath(&self, fingerprint: &str) -> PathBuf {
        self.kernel_dir.join(format!("{fingerprint}.c"))
    }

    /// Path of the compiled object for a fingerprint.
    pub fn obj_abspath(&self, fingerprint: &str) -> PathBuf {
        self.object_dir.join(self.obj_filename(fingerprint))
    }

    /// Bare object filename for a fingerprint.
    pub fn obj_filename(&self, fingerprint: &str) -> String {
        format!("{fingerprint}.so")
    }

    pub fn object_dir(&self) -> &Path {
        &self.object_dir
    }

    pub fn kernel_dir(&self) -> &Path {
        &self.kernel_dir
    }
}
