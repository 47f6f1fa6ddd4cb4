//! Process-wide directory of scanlation groups.

use crate::models::Group;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};
use tracing::debug;

static GLOBAL: LazyLock<Arc<GroupRegistry>> = LazyLock::new(|| Arc::new(GroupRegistry::default()));

/// Interns [`Group`]s by identifier.
///
/// Groups are consistent across the whole platform, so every request for the
/// same identifier returns the same instance. Creation is idempotent: the
/// first name seen for an identifier sticks. There is no eviction, groups
/// live as long as the registry does.
///
/// All access goes through a single mutex, one caller at a time. Nothing
/// re-enters the registry while holding the lock.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: Mutex<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    /// The registry shared by the whole process.
    pub fn global() -> Arc<GroupRegistry> {
        Arc::clone(&GLOBAL)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Group>>> {
        // Nothing inside the critical section can panic half-way through an
        // insert, so a poisoned map is still consistent.
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the group registered under `identifier`, creating it with
    /// `name` if it has never been seen. An existing group keeps its name.
    pub fn create_or_get(&self, identifier: &str, name: &str) -> Arc<Group> {
        let mut groups = self.lock();
        if let Some(group) = groups.get(identifier) {
            return Arc::clone(group);
        }
        debug!(identifier, name, "registering group");
        let group = Arc::new(Group::new(identifier, name));
        groups.insert(identifier.to_string(), Arc::clone(&group));
        group
    }

    /// Groups are only known once a book (or the group directory) that
    /// mentions them has been loaded, so this returns `None` until then.
    pub fn get(&self, identifier: &str) -> Option<Arc<Group>> {
        self.lock().get(identifier).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
