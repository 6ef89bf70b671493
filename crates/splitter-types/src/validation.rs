//! Checks for implementation-specific TOML tables.
//!
//! Tables such as `[account.implementations.local]` stay raw TOML until the
//! implementation is built; each implementation describes the fields it
//! expects with a [`Schema`].

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: &'static str,
		actual: &'static str,
	},
}

/// Expected TOML type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
	String,
	/// Integer within inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
}

impl FieldType {
	fn check(&self, name: &str, value: &toml::Value) -> Result<(), ValidationError> {
		let mismatch = |expected| ValidationError::TypeMismatch {
			field: name.to_string(),
			expected,
			actual: value.type_str(),
		};

		match *self {
			FieldType::String => value.as_str().map(|_| ()).ok_or_else(|| mismatch("string")),
			FieldType::Integer { min, max } => {
				let n = value.as_integer().ok_or_else(|| mismatch("integer"))?;
				let below = min.is_some_and(|min| n < min);
				let above = max.is_some_and(|max| n > max);
				if below || above {
					return Err(ValidationError::InvalidValue {
						field: name.to_string(),
						message: format!("{} is out of range", n),
					});
				}
				Ok(())
			},
		}
	}
}

type Validator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named field with an optional value check.
pub struct Field {
	name: String,
	field_type: FieldType,
	validator: Option<Validator>,
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Adds a check run after the type check; `Err` carries the message.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		self.field_type.check(&self.name, value)?;
		match &self.validator {
			Some(validator) => validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			}),
			None => Ok(()),
		}
	}
}

/// Required and optional fields of a TOML table.
pub struct Schema {
	required: Vec<Field>,
	optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config.as_table().ok_or(ValidationError::TypeMismatch {
			field: "root".to_string(),
			expected: "table",
			actual: config.type_str(),
		})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}
		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}
		Ok(())
	}
}

/// Implemented by each configurable implementation to check its table.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> Schema {
		Schema::new(
			vec![Field::new("private_key", FieldType::String).with_validator(|v| {
				match v.as_str() {
					Some(s) if s.starts_with("0x") => Ok(()),
					_ => Err("must start with 0x".to_string()),
				}
			})],
			vec![Field::new(
				"gas_limit",
				FieldType::Integer {
					min: Some(21_000),
					max: None,
				},
			)],
		)
	}

	fn parse(s: &str) -> toml::Value {
		toml::from_str(s).unwrap()
	}

	#[test]
	fn test_valid_table() {
		let config = parse("private_key = \"0xabc\"\ngas_limit = 100000");
		assert!(schema().validate(&config).is_ok());
		assert!(schema().validate(&parse("private_key = \"0xabc\"")).is_ok());
	}

	#[test]
	fn test_missing_required_field() {
		let err = schema().validate(&parse("other = 1")).unwrap_err();
		assert!(matches!(err, ValidationError::MissingField(f) if f == "private_key"));
	}

	#[test]
	fn test_wrong_type() {
		let err = schema().validate(&parse("private_key = 7")).unwrap_err();
		assert!(matches!(
			err,
			ValidationError::TypeMismatch {
				expected: "string",
				actual: "integer",
				..
			}
		));
	}

	#[test]
	fn test_custom_validator_failure() {
		let err = schema().validate(&parse("private_key = \"abc\"")).unwrap_err();
		assert!(err.to_string().contains("must start with 0x"));
	}

	#[test]
	fn test_integer_bounds() {
		let config = parse("private_key = \"0xabc\"\ngas_limit = 10");
		let err = schema().validate(&config).unwrap_err();
		assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "gas_limit"));
	}
}
