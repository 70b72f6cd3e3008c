use models::Student;

use crate::errors::ServiceError;

/// Trait abstraction for roster storage.
/// The interactive shell only talks to this, so any backing can be swapped in.
pub trait StudentRepository {
    fn find(&self, identifier: i64) -> Option<&Student>;
    fn list(&self) -> impl ExactSizeIterator<Item = &Student> + '_;
    fn insert(&mut self, identifier: i64, name: &str, grade: f64) -> Result<(), ServiceError>;
    /// Returns the grade that was replaced.
    fn update_grade(&mut self, identifier: i64, new_grade: f64) -> Result<f64, ServiceError>;
    /// Returns the removed record.
    fn delete(&mut self, identifier: i64) -> Result<Student, ServiceError>;
}
