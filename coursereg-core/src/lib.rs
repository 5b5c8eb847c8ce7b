mod course;
mod form;

pub use course::{Course, KNOWN_SESSIONS};
pub use form::{FormError, RegistrationForm, MIN_MATRICULE_LEN};
