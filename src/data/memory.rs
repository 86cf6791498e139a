use crate::{
    data::{
        StudentStore,
        page::{Page, Pagination},
        student::{NewStudent, Student, StudentPatch},
    },
    error::{DuplicateStudentNumberSnafu, StudentsResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Student>,
}

impl Table {
    fn ensure_unique(&self, student_number: &str, except: Option<i32>) -> StudentsResult<()> {
        let taken = self
            .rows
            .values()
            .any(|row| row.student_number == student_number && Some(row.id) != except);
        if taken {
            return DuplicateStudentNumberSnafu { student_number }.fail();
        }
        Ok(())
    }
}

/// Stand-in for `public.students` so the HTTP layer can be tested without postgres.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    table: Mutex<Table>,
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn list(&self, pagination: Pagination) -> StudentsResult<Page<Student>> {
        let table = self.table.lock().await;
        let items = table
            .rows
            .values()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit()).unwrap_or_default())
            .cloned()
            .collect();

        Ok(Page {
            items,
            total: table.rows.len() as u64,
            page: pagination.page,
            per_page: pagination.per_page,
        })
    }

    async fn get(&self, id: i32) -> StudentsResult<Option<Student>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn insert(&self, to_be_added: NewStudent) -> StudentsResult<Student> {
        let mut table = self.table.lock().await;
        table.ensure_unique(&to_be_added.student_number, None)?;

        table.next_id += 1;
        let student = to_be_added.with_id(table.next_id);
        table.rows.insert(student.id, student.clone());
        Ok(student)
    }

    async fn update(&self, id: i32, patch: StudentPatch) -> StudentsResult<Option<Student>> {
        let mut table = self.table.lock().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(student_number) = &patch.student_number {
            table.ensure_unique(student_number, Some(id))?;
        }

        let Some(student) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(student);
        Ok(Some(student.clone()))
    }

    async fn remove(&self, id: i32) -> StudentsResult<bool> {
        Ok(self.table.lock().await.rows.remove(&id).is_some())
    }

    async fn close(&self) {}
}
