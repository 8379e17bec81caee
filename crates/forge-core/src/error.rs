//! Validation error collection for ForgeDB RS

use std::collections::HashMap;
use thiserror::Error;

/// Field-level validation errors, surfaced to API clients as a
/// `{"field": ["message", ...]}` map.
#[derive(Error, Debug, Default, Clone)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_add_and_get() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("email", "is invalid");
        errors.add("email", "is already taken");
        errors.add_base("record is stale");

        assert!(!errors.is_empty());
        assert!(errors.has_error("email"));
        assert_eq!(errors.get("email").map(|v| v.len()), Some(2));
        assert_eq!(errors.full_messages().len(), 3);
    }

    #[test]
    fn test_validation_errors_merge() {
        let mut a = ValidationErrors::new();
        a.add("name", "is required");

        let mut b = ValidationErrors::new();
        b.add("name", "is too long");
        b.add("code", "is taken");

        a.merge(b);
        assert_eq!(a.get("name").map(|v| v.len()), Some(2));
        assert!(a.has_error("code"));
    }
}
