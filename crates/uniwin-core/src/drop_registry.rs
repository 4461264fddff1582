//! Routing of file-drop messages to the instances that asked for them.
//!
//! The message hook only sees the target window handle. The registry maps
//! that handle back to every live control layer that enabled file drop on
//! it.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::api::RawHandle;

type DropHandler = Box<dyn Fn(&[PathBuf]) + Send + Sync>;

/// The files-dropped event of one control layer.
#[derive(Default)]
pub struct FilesDropped {
    handlers: Mutex<Vec<DropHandler>>,
}

impl FilesDropped {
    /// Adds a handler that receives the dropped paths in drop order.
    ///
    /// Handlers must not subscribe further handlers from inside the call.
    pub fn subscribe(&self, handler: impl Fn(&[PathBuf]) + Send + Sync + 'static) {
        lock(&self.handlers).push(Box::new(handler));
    }

    /// Invokes every handler with `paths`.
    pub fn emit(&self, paths: &[PathBuf]) {
        for handler in lock(&self.handlers).iter() {
            handler(paths);
        }
    }

    pub fn handler_count(&self) -> usize {
        lock(&self.handlers).len()
    }
}

impl fmt::Debug for FilesDropped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesDropped")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// Identifies one registration so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(u64);

#[derive(Default)]
struct Registrations {
    next_id: u64,
    by_handle: HashMap<RawHandle, Vec<(RegistrationId, Arc<FilesDropped>)>>,
}

/// Handle → instance map consulted by the file-drop message hook.
#[derive(Default)]
pub struct DropRegistry {
    inner: Mutex<Registrations>,
}

static GLOBAL: OnceLock<Arc<DropRegistry>> = OnceLock::new();

impl DropRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry the Win32 hook dispatches into.
    pub fn global() -> Arc<DropRegistry> {
        GLOBAL.get_or_init(|| Arc::new(DropRegistry::new())).clone()
    }

    /// Routes drops targeting `hwnd` to `event`.
    pub fn register(&self, hwnd: RawHandle, event: Arc<FilesDropped>) -> RegistrationId {
        let mut inner = lock(&self.inner);
        inner.next_id += 1;
        let id = RegistrationId(inner.next_id);
        inner.by_handle.entry(hwnd).or_default().push((id, event));
        log::debug!("drop registration {id:?} for 0x{hwnd:X}");
        id
    }

    /// Removes a registration. Returns `false` if it was already gone.
    pub fn unregister(&self, id: RegistrationId) -> bool {
        let mut inner = lock(&self.inner);
        let mut removed = false;
        inner.by_handle.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|(entry_id, _)| *entry_id != id);
            removed |= entries.len() != before;
            !entries.is_empty()
        });
        removed
    }

    /// Delivers `paths` to every instance registered for `hwnd`.
    ///
    /// Returns how many instances received the drop. The registry lock is
    /// released before any handler runs.
    pub fn dispatch(&self, hwnd: RawHandle, paths: &[PathBuf]) -> usize {
        let targets: Vec<Arc<FilesDropped>> = lock(&self.inner)
            .by_handle
            .get(&hwnd)
            .map(|entries| entries.iter().map(|(_, event)| event.clone()).collect())
            .unwrap_or_default();

        if targets.is_empty() {
            log::warn!(
                "{} file(s) dropped on 0x{hwnd:X}, but no registered instance owns that window",
                paths.len()
            );
            return 0;
        }

        for event in &targets {
            event.emit(paths);
        }
        targets.len()
    }

    /// Whether any instance is registered for `hwnd`.
    pub fn is_registered(&self, hwnd: RawHandle) -> bool {
        lock(&self.inner).by_handle.contains_key(&hwnd)
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        lock(&self.inner).by_handle.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for DropRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropRegistry")
            .field("registrations", &self.len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
