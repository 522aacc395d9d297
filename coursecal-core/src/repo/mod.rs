//! Storage seam between the HTTP layer / exporter and the records.

mod inmemory;
mod seed;

use std::sync::Arc;

pub use inmemory::InMemoryRepo;
pub use seed::SeedData;

use crate::domain::{
    Assignment, Course, Enrollment, Entity, ForeignKey, Notification, Session, User,
};
use crate::error::CourseCalResult;

pub trait Repository<T: Entity>: Send + Sync {
    fn find(&self, id: &str) -> Option<T>;
    /// All records whose `key` equals `value`, in insertion order
    fn find_by_foreign_key(&self, key: ForeignKey, value: &str) -> Vec<T>;
    fn all(&self) -> Vec<T>;
    /// Fails with `Conflict` when the id or the natural key is taken
    fn insert(&self, item: &T) -> CourseCalResult<()>;
    /// Replaces the record with the same id, `NotFound` if there is none
    fn save(&self, item: &T) -> CourseCalResult<()>;
    fn delete(&self, id: &str) -> Option<T>;
}

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn Repository<User>>,
    pub courses: Arc<dyn Repository<Course>>,
    pub sessions: Arc<dyn Repository<Session>>,
    pub assignments: Arc<dyn Repository<Assignment>>,
    pub enrollments: Arc<dyn Repository<Enrollment>>,
    pub notifications: Arc<dyn Repository<Notification>>,
}

impl Repos {
    pub fn in_memory() -> Self {
        Repos::from_seed(SeedData::default())
    }

    pub fn from_seed(seed: SeedData) -> Self {
        Repos {
            users: Arc::new(InMemoryRepo::with_items(seed.users)),
            courses: Arc::new(InMemoryRepo::with_items(seed.courses)),
            sessions: Arc::new(InMemoryRepo::with_items(seed.sessions)),
            assignments: Arc::new(InMemoryRepo::with_items(seed.assignments)),
            enrollments: Arc::new(InMemoryRepo::with_items(seed.enrollments)),
            notifications: Arc::new(InMemoryRepo::with_items(seed.notifications)),
        }
    }
}
