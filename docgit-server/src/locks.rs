use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per repository root.
///
/// Requests for the same root queue here instead of failing on the
/// repository's file lock; requests for different roots run in parallel.
#[derive(Default)]
pub struct RepoLocks {
    locks: Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>,
}

impl RepoLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of `root`. The guard is owned so it can be
    /// moved into a blocking task and outlive a cancelled request.
    pub async fn acquire(&self, root: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(locks.entry(root.to_path_buf()).or_default())
        };
        lock.lock_owned().await
    }
}
