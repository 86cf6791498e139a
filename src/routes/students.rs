use crate::{
    data::{
        page::{PageQuery, Pagination},
        student::{NewStudent, Student, StudentPatch},
    },
    envelope::Envelope,
    error::{MissingStudentSnafu, ReadBodySnafu, StudentsError, StudentsResult},
    state::StudentsState,
};
use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{BytesRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use snafu::{OptionExt, ResultExt};

/// Ids that aren't integers can never match a route, so they 404 like unknown paths.
fn student_id(path: Result<Path<String>, PathRejection>) -> StudentsResult<i32> {
    let Ok(Path(raw)) = path else {
        return Err(StudentsError::RouteNotFound);
    };
    raw.parse().map_err(|_| StudentsError::RouteNotFound)
}

fn body_bytes(body: Result<Bytes, BytesRejection>) -> StudentsResult<Bytes> {
    body.context(ReadBodySnafu)
}

pub async fn list_students(
    State(state): State<StudentsState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> StudentsResult<Json<Envelope<Vec<Student>>>> {
    // listing never rejects its query, unusable input just means defaults
    let query = query.map_or_else(|_| PageQuery::default(), |Query(pairs)| {
        PageQuery::from_pairs(pairs)
    });
    let pagination = Pagination::from_query(&query);
    let page = state.list(pagination).await?;
    debug!(?pagination, total = page.total, "Listed students");

    Ok(Json(Envelope::paged(page)))
}

pub async fn get_student(
    State(state): State<StudentsState>,
    path: Result<Path<String>, PathRejection>,
) -> StudentsResult<Json<Envelope<Student>>> {
    let id = student_id(path)?;
    let student = state.get(id).await?.context(MissingStudentSnafu { id })?;

    Ok(Json(Envelope::success(student)))
}

pub async fn create_student(
    State(state): State<StudentsState>,
    body: Result<Bytes, BytesRejection>,
) -> StudentsResult<(StatusCode, Json<Envelope<Student>>)> {
    let to_be_added = NewStudent::from_json(&body_bytes(body)?)?;
    let student = state.insert(to_be_added).await?;

    Ok((StatusCode::CREATED, Json(Envelope::success(student))))
}

pub async fn update_student(
    State(state): State<StudentsState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> StudentsResult<Json<Envelope<Student>>> {
    let id = student_id(path)?;

    // an unknown id wins over a bad body
    state.get(id).await?.context(MissingStudentSnafu { id })?;
    let patch = StudentPatch::from_json(&body_bytes(body)?)?;

    let student = state
        .update(id, patch)
        .await?
        .context(MissingStudentSnafu { id })?;

    Ok(Json(Envelope::success(student)))
}

pub async fn delete_student(
    State(state): State<StudentsState>,
    path: Result<Path<String>, PathRejection>,
) -> StudentsResult<Json<Envelope<String>>> {
    let id = student_id(path)?;
    if !state.remove(id).await? {
        return MissingStudentSnafu { id }.fail();
    }

    Ok(Json(Envelope::success(format!(
        "Student {id} deleted successfully"
    ))))
}
