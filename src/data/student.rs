use crate::error::{
    InvalidJsonSnafu, InvalidSexSnafu, MissingFieldSnafu, NotAnObjectSnafu, ParseBirthdaySnafu,
    StudentsError, StudentsResult,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::{OptionExt, ResultExt};
use std::str::FromStr;

pub const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "sex")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = StudentsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            _ => InvalidSexSnafu { original: s }.fail(),
        }
    }
}

/// Bodies must be JSON objects; serde would otherwise fill a struct from an array by position.
fn from_json_object<T: DeserializeOwned>(body: &[u8]) -> StudentsResult<T> {
    let value: Value = serde_json::from_slice(body).context(InvalidJsonSnafu)?;
    if !value.is_object() {
        return NotAnObjectSnafu.fail();
    }
    serde_json::from_value(value).context(InvalidJsonSnafu)
}

pub fn parse_birthday(raw: String) -> StudentsResult<NaiveDate> {
    NaiveDate::parse_from_str(&raw, BIRTHDAY_FORMAT).context(ParseBirthdaySnafu { original: raw })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Student {
    pub id: i32,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub sex: Sex,
    pub birthday: NaiveDate,
}

/// A validated student that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub sex: Sex,
    pub birthday: NaiveDate,
}

#[derive(Deserialize, Debug, Default)]
struct NewStudentBody {
    student_number: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    middle_name: Option<String>,
    sex: Option<String>,
    birthday: Option<String>,
}

impl NewStudent {
    /// Parses and validates a create request.
    ///
    /// Checks run in a fixed order: JSON shape, required fields (the first
    /// missing one is reported), `sex`, then `birthday`.
    pub fn from_json(body: &[u8]) -> StudentsResult<Self> {
        let NewStudentBody {
            student_number,
            first_name,
            last_name,
            middle_name,
            sex,
            birthday,
        } = from_json_object(body)?;

        let student_number = student_number.context(MissingFieldSnafu {
            field: "student_number",
        })?;
        let first_name = first_name.context(MissingFieldSnafu {
            field: "first_name",
        })?;
        let last_name = last_name.context(MissingFieldSnafu { field: "last_name" })?;
        let sex = sex.context(MissingFieldSnafu { field: "sex" })?;
        let birthday = birthday.context(MissingFieldSnafu { field: "birthday" })?;

        let sex = sex.parse()?;
        let birthday = parse_birthday(birthday)?;

        Ok(Self {
            student_number,
            first_name,
            last_name,
            middle_name,
            sex,
            birthday,
        })
    }

    #[cfg(test)]
    pub fn with_id(self, id: i32) -> Student {
        let Self {
            student_number,
            first_name,
            last_name,
            middle_name,
            sex,
            birthday,
        } = self;

        Student {
            id,
            student_number,
            first_name,
            last_name,
            middle_name,
            sex,
            birthday,
        }
    }
}

/// Present-but-null becomes `Some(None)`, absent stays `None` via `#[serde(default)]`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Debug, Default)]
struct StudentPatchBody {
    student_number: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    middle_name: Option<Option<String>>,
    sex: Option<String>,
    birthday: Option<String>,
}

/// The fields an update touches; `None` leaves the stored value alone.
///
/// `middle_name` is the only nullable column, so it alone can be cleared with
/// an explicit `null`. A `null` for any other field is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub student_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<Option<String>>,
    pub sex: Option<Sex>,
    pub birthday: Option<NaiveDate>,
}

impl StudentPatch {
    pub fn from_json(body: &[u8]) -> StudentsResult<Self> {
        let StudentPatchBody {
            student_number,
            first_name,
            last_name,
            middle_name,
            sex,
            birthday,
        } = from_json_object(body)?;

        Ok(Self {
            student_number,
            first_name,
            last_name,
            middle_name,
            sex: sex.map(|sex| sex.parse()).transpose()?,
            birthday: birthday.map(parse_birthday).transpose()?,
        })
    }

    pub const fn is_empty(&self) -> bool {
        self.student_number.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.middle_name.is_none()
            && self.sex.is_none()
            && self.birthday.is_none()
    }

    pub fn apply_to(self, student: &mut Student) {
        let Self {
            student_number,
            first_name,
            last_name,
            middle_name,
            sex,
            birthday,
        } = self;

        if let Some(student_number) = student_number {
            student.student_number = student_number;
        }
        if let Some(first_name) = first_name {
            student.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            student.last_name = last_name;
        }
        if let Some(middle_name) = middle_name {
            student.middle_name = middle_name;
        }
        if let Some(sex) = sex {
            student.sex = sex;
        }
        if let Some(birthday) = birthday {
            student.birthday = birthday;
        }
    }
}
