pub mod errors;
pub mod student;

pub use errors::ModelError;
pub use student::{Student, GRADE_MAX, GRADE_MIN};
