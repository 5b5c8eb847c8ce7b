use crate::Course;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_MATRICULE_LEN: usize = 6;

/// Registration submitted by a student for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub matricule: String,
    pub course: Course,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("field '{0}' is empty")]
    Empty(&'static str),

    #[error("matricule must have at least {} characters", MIN_MATRICULE_LEN)]
    MatriculeTooShort,

    #[error("invalid email: {0}")]
    InvalidEmail(String),
}

impl RegistrationForm {
    /// Sanity checks performed by client shells before submitting.
    ///
    /// The server accepts any form as-is; these checks never run server side.
    pub fn check(&self) -> Result<(), FormError> {
        let fields = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("matricule", &self.matricule),
            ("course.code", &self.course.code),
            ("course.session", &self.course.session),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(FormError::Empty(name));
            }
        }

        if self.matricule.trim().chars().count() < MIN_MATRICULE_LEN {
            return Err(FormError::MatriculeTooShort);
        }

        if !self.email.contains('@') {
            return Err(FormError::InvalidEmail(self.email.clone()));
        }

        Ok(())
    }
}
