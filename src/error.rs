use crate::envelope::Envelope;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use snafu::Snafu;
use std::num::ParseIntError;

pub type StudentsResult<T> = Result<T, StudentsError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StudentsError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error getting db connection"))]
    GetDatabaseConnection { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error commiting SQL transaction"))]
    CommitTransaction { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` as an integer", name))]
    ParseInt {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Invalid JSON body: {}", source))]
    InvalidJson { source: serde_json::Error },
    #[snafu(display("JSON body must be an object"))]
    NotAnObject,
    #[snafu(display("Unable to read request body: {}", source))]
    ReadBody {
        source: axum::extract::rejection::BytesRejection,
    },
    #[snafu(display("Missing required field: {}", field))]
    MissingField { field: &'static str },
    #[snafu(display("Invalid sex {:?}, must be 'Male' or 'Female'", original))]
    InvalidSex { original: String },
    #[snafu(display("Invalid birthday {:?}, expected YYYY-MM-DD", original))]
    ParseBirthday {
        source: chrono::ParseError,
        original: String,
    },
    #[snafu(display("A student with student_number {:?} already exists", student_number))]
    DuplicateStudentNumber { student_number: String },
    #[snafu(display("Student with id {} not found", id))]
    MissingStudent { id: i32 },
    #[snafu(display("Resource not found"))]
    RouteNotFound,
    #[snafu(display("Method not allowed"))]
    MethodNotAllowed,
    #[snafu(display("Handler panicked: {}", message))]
    Panicked { message: String },
}

impl StudentsError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input
        const NA: StatusCode = StatusCode::METHOD_NOT_ALLOWED; //not allowed

        match self {
            Self::OpenDatabase { .. } | Self::GetDatabaseConnection { .. } => ISE,
            Self::MakeQuery { source } => match source {
                sqlx::Error::RowNotFound => NF,
                _ => ISE,
            },
            Self::CommitTransaction { .. } | Self::MigrateError { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParseInt { .. } => ISE,
            Self::InvalidJson { .. } | Self::NotAnObject | Self::MissingField { .. } => BI,
            Self::ReadBody { source } => source.status(),
            Self::InvalidSex { .. } | Self::ParseBirthday { .. } => BI,
            Self::DuplicateStudentNumber { .. } => BI,
            Self::MissingStudent { .. } | Self::RouteNotFound => NF,
            Self::MethodNotAllowed => NA,
            Self::Panicked { .. } => ISE,
        }
    }
}

impl IntoResponse for StudentsError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // internal details stay in the logs
        let message = if status_code.is_server_error() {
            error!(?self, "Internal error");
            "Internal server error".to_string()
        } else {
            warn!(error = %self, %status_code, "Rejected request");
            self.to_string()
        };

        (status_code, Json(Envelope::<()>::failure(message))).into_response()
    }
}
