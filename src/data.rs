use crate::{
    data::{
        page::{Page, Pagination},
        student::{NewStudent, Student, StudentPatch},
    },
    error::StudentsResult,
};
use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
pub mod memory;
pub mod page;
pub mod postgres;
pub mod student;

/// Everything the HTTP layer needs from wherever students are persisted.
///
/// `Ok(None)` / `Ok(false)` mean "no student with that id"; turning that into a
/// not-found response is the caller's business.
#[async_trait]
pub trait StudentStore: Debug + Send + Sync {
    async fn list(&self, pagination: Pagination) -> StudentsResult<Page<Student>>;
    async fn get(&self, id: i32) -> StudentsResult<Option<Student>>;
    async fn insert(&self, to_be_added: NewStudent) -> StudentsResult<Student>;
    /// Applies `patch` and the read that precedes it as one atomic unit.
    async fn update(&self, id: i32, patch: StudentPatch) -> StudentsResult<Option<Student>>;
    async fn remove(&self, id: i32) -> StudentsResult<bool>;
    async fn close(&self);
}
