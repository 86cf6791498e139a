use crate::{
    data::{
        StudentStore,
        page::{Page, Pagination},
        student::{NewStudent, Student, StudentPatch},
    },
    error::{
        CommitTransactionSnafu, GetDatabaseConnectionSnafu, MakeQuerySnafu, StudentsError,
        StudentsResult,
    },
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Pool, Postgres};

const COLUMNS: &str = "id, student_number, first_name, last_name, middle_name, sex, birthday";

/// Unique violations on `student_number` are the caller's fault, anything else is ours.
fn classify_write_error(source: sqlx::Error, student_number: &str) -> StudentsError {
    match &source {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            StudentsError::DuplicateStudentNumber {
                student_number: student_number.to_string(),
            }
        }
        _ => StudentsError::MakeQuery { source },
    }
}

#[derive(Clone, Debug)]
pub struct PgStudentStore {
    pool: Pool<Postgres>,
}

impl PgStudentStore {
    pub const fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn list(&self, pagination: Pagination) -> StudentsResult<Page<Student>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context(GetDatabaseConnectionSnafu)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM public.students")
            .fetch_one(&mut *conn)
            .await
            .context(MakeQuerySnafu)?;

        let items = sqlx::query_as::<_, Student>(&format!(
            "SELECT {COLUMNS} FROM public.students ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&mut *conn)
        .await
        .context(MakeQuerySnafu)?;

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or_default(),
            page: pagination.page,
            per_page: pagination.per_page,
        })
    }

    async fn get(&self, id: i32) -> StudentsResult<Option<Student>> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {COLUMNS} FROM public.students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)
    }

    async fn insert(&self, to_be_added: NewStudent) -> StudentsResult<Student> {
        let NewStudent {
            student_number,
            first_name,
            last_name,
            middle_name,
            sex,
            birthday,
        } = to_be_added;

        let student = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO public.students (student_number, first_name, last_name, middle_name, sex, birthday) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(&student_number)
        .bind(first_name)
        .bind(last_name)
        .bind(middle_name)
        .bind(sex)
        .bind(birthday)
        .fetch_one(&self.pool)
        .await
        .map_err(|source| classify_write_error(source, &student_number))?;

        info!(id = student.id, student_number = %student.student_number, "Added student");
        Ok(student)
    }

    async fn update(&self, id: i32, patch: StudentPatch) -> StudentsResult<Option<Student>> {
        let mut transaction = self.pool.begin().await.context(GetDatabaseConnectionSnafu)?;

        //dropping the transaction without committing rolls it back
        let Some(mut student) = sqlx::query_as::<_, Student>(&format!(
            "SELECT {COLUMNS} FROM public.students WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *transaction)
        .await
        .context(MakeQuerySnafu)?
        else {
            return Ok(None);
        };

        if patch.is_empty() {
            transaction.commit().await.context(CommitTransactionSnafu)?;
            return Ok(Some(student));
        }

        patch.apply_to(&mut student);
        let Student {
            id,
            student_number,
            first_name,
            last_name,
            middle_name,
            sex,
            birthday,
        } = student;

        let updated = sqlx::query_as::<_, Student>(&format!(
            "UPDATE public.students SET student_number = $2, first_name = $3, last_name = $4, middle_name = $5, sex = $6, birthday = $7 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&student_number)
        .bind(first_name)
        .bind(last_name)
        .bind(middle_name)
        .bind(sex)
        .bind(birthday)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|source| classify_write_error(source, &student_number))?;

        transaction.commit().await.context(CommitTransactionSnafu)?;

        info!(id, "Updated student");
        Ok(Some(updated))
    }

    async fn remove(&self, id: i32) -> StudentsResult<bool> {
        let removed = sqlx::query("DELETE FROM public.students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context(MakeQuerySnafu)?
            .rows_affected()
            > 0;

        if removed {
            info!(id, "Removed student");
        }
        Ok(removed)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
