use std::fmt;

use crate::Step;

/// Validation error for a step record missing a required field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField { field } => {
                write!(f, "required field '{field}' is empty")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a step's required fields.
///
/// Only `action` and `quest_name` are required; everything else on a step may
/// legitimately be empty.
///
/// ```
/// use phermuth_data::{Step, validate_step};
///
/// let step = Step {
///     action: "A".into(),
///     quest_name: "The Hunt Begins".into(),
///     ..Step::default()
/// };
/// assert!(validate_step(&step).is_empty());
/// ```
pub fn validate_step(step: &Step) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if step.action.trim().is_empty() {
        errors.push(ValidationError::EmptyField { field: "action" });
    }
    if step.quest_name.trim().is_empty() {
        errors.push(ValidationError::EmptyField { field: "quest_name" });
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_step_passes() {
        let step = Step {
            action: "T".into(),
            quest_name: "Sarkoth".into(),
            ..Step::default()
        };
        assert!(validate_step(&step).is_empty());
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let errors = validate_step(&Step::default());
        assert!(errors.contains(&ValidationError::EmptyField { field: "action" }));
        assert!(errors.contains(&ValidationError::EmptyField { field: "quest_name" }));
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let step = Step {
            action: "  ".into(),
            quest_name: "Dwarven Digging".into(),
            ..Step::default()
        };
        assert_eq!(
            validate_step(&step),
            vec![ValidationError::EmptyField { field: "action" }]
        );
    }
}
