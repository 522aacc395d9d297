use std::sync::{PoisonError, RwLock};

use super::Repository;
use crate::domain::{Entity, ForeignKey};
use crate::error::{CourseCalError, CourseCalResult};

/// Vec-backed repository. Lookups are linear scans.
pub struct InMemoryRepo<T> {
    items: RwLock<Vec<T>>,
}

impl<T: Entity> InMemoryRepo<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Later duplicates of an id are dropped
    pub fn with_items(items: Vec<T>) -> Self {
        let mut unique: Vec<T> = Vec::with_capacity(items.len());
        for item in items {
            if unique.iter().all(|u| u.id() != item.id()) {
                unique.push(item);
            }
        }
        InMemoryRepo {
            items: RwLock::new(unique),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Vec<T>) -> R) -> R {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        f(&items)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut items)
    }
}

impl<T: Entity> Default for InMemoryRepo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for InMemoryRepo<T> {
    fn find(&self, id: &str) -> Option<T> {
        self.read(|items| items.iter().find(|i| i.id() == id).cloned())
    }

    fn find_by_foreign_key(&self, key: ForeignKey, value: &str) -> Vec<T> {
        self.read(|items| {
            items
                .iter()
                .filter(|i| i.foreign_key(key) == Some(value))
                .cloned()
                .collect()
        })
    }

    fn all(&self) -> Vec<T> {
        self.read(|items| items.clone())
    }

    fn insert(&self, item: &T) -> CourseCalResult<()> {
        self.write(|items| {
            if items.iter().any(|i| i.id() == item.id()) {
                return Err(CourseCalError::Conflict {
                    kind: T::KIND,
                    id: item.id().to_string(),
                });
            }
            if let Some(key) = item.natural_key() {
                if items.iter().any(|i| i.natural_key().as_ref() == Some(&key)) {
                    return Err(CourseCalError::Conflict { kind: T::KIND, id: key });
                }
            }
            items.push(item.clone());
            Ok(())
        })
    }

    fn save(&self, item: &T) -> CourseCalResult<()> {
        self.write(|items| match items.iter_mut().find(|i| i.id() == item.id()) {
            Some(existing) => {
                *existing = item.clone();
                Ok(())
            }
            None => Err(CourseCalError::not_found(T::KIND, item.id())),
        })
    }

    fn delete(&self, id: &str) -> Option<T> {
        self.write(|items| {
            let pos = items.iter().position(|i| i.id() == id)?;
            Some(items.remove(pos))
        })
    }
}
