use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Lowest accepted grade (inclusive).
pub const GRADE_MIN: f64 = 0.0;
/// Highest accepted grade (inclusive).
pub const GRADE_MAX: f64 = 10.0;

/// A single roster entry.
///
/// Field names on disk follow the existing data files: `matricula`, `nome`, `nota`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "matricula")]
    pub identifier: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nota")]
    pub grade: f64,
}

impl Student {
    /// Build a validated record.
    pub fn new(identifier: i64, name: impl Into<String>, grade: f64) -> Result<Self, ModelError> {
        let name = name.into();
        validate_name(&name)?;
        validate_grade(grade)?;
        Ok(Self { identifier, name, grade })
    }

    /// Replace the grade after range checking it.
    pub fn set_grade(&mut self, grade: f64) -> Result<f64, ModelError> {
        validate_grade(grade)?;
        Ok(std::mem::replace(&mut self.grade, grade))
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name must not be empty".into()));
    }
    Ok(())
}

/// NaN fails the range check.
pub fn validate_grade(grade: f64) -> Result<(), ModelError> {
    if !(GRADE_MIN..=GRADE_MAX).contains(&grade) {
        return Err(ModelError::Validation(format!(
            "grade must be between {GRADE_MIN} and {GRADE_MAX}, got {grade}"
        )));
    }
    Ok(())
}
