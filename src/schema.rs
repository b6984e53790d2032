//! Declarative record schemas and the validator that checks candidates
//! against them.
//!
//! A [`SchemaDescriptor`] is plain data, so callers can either use the built-in
//! [`esg_document_schema`] or deserialize their own from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
}

fn default_nullable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Object { schema: SchemaDescriptor },
    Array { items: Box<FieldType> },
    Map { values: Box<FieldType> },
    Any,
}

impl FieldType {
    pub fn object(name: &str, fields: Vec<FieldSpec>) -> Self {
        Self::Object {
            schema: SchemaDescriptor::new(name, fields),
        }
    }

    pub fn array_of(items: FieldType) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    pub fn map_of(values: FieldType) -> Self {
        Self::Map {
            values: Box::new(values),
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object { schema } => &schema.name,
            Self::Array { .. } => "array",
            Self::Map { .. } => "object",
            Self::Any => "any",
        }
    }
}

impl FieldSpec {
    /// Optional, nullable field.
    pub fn optional(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            required: false,
            nullable: true,
            allowed: None,
        }
    }

    /// Required, non-null field.
    pub fn required(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            required: true,
            nullable: false,
            allowed: None,
        }
    }

    pub fn non_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|value| Value::from(*value)).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every violation found in one candidate; empty means valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaValidation {
    pub schema: String,
    pub violations: Vec<SchemaViolation>,
}

impl SchemaValidation {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Combined, human-readable description of all violations, or an empty
    /// string when the candidate is valid.
    pub fn error_text(&self) -> String {
        if self.violations.is_empty() {
            return String::new();
        }

        let noun = if self.violations.len() == 1 {
            "error"
        } else {
            "errors"
        };
        let mut text = format!(
            "{} validation {noun} for {}",
            self.violations.len(),
            self.schema
        );
        for violation in &self.violations {
            text.push('\n');
            text.push_str(&violation.to_string());
        }
        text
    }

    pub fn into_parts(self) -> (bool, String) {
        (self.is_valid(), self.error_text())
    }
}

impl SchemaDescriptor {
    pub fn new(name: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }

    /// Checks `candidate` against this schema, collecting every violation
    /// rather than stopping at the first. Fields not named by the schema are
    /// ignored.
    pub fn validate(&self, candidate: &Value) -> SchemaValidation {
        let mut violations = Vec::new();
        match candidate.as_object() {
            Some(object) => check_fields(&self.fields, object, "", &mut violations),
            None => violations.push(SchemaViolation {
                path: String::new(),
                message: format!("expected {}, got {}", self.name, json_type_name(candidate)),
            }),
        }

        SchemaValidation {
            schema: self.name.clone(),
            violations,
        }
    }
}

fn check_fields(
    specs: &[FieldSpec],
    object: &Map<String, Value>,
    prefix: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    for spec in specs {
        let path = if prefix.is_empty() {
            spec.name.clone()
        } else {
            format!("{prefix}.{}", spec.name)
        };

        match object.get(&spec.name) {
            None => {
                if spec.required {
                    violations.push(SchemaViolation {
                        path,
                        message: "field required".to_string(),
                    });
                }
            }
            Some(Value::Null) => {
                if !spec.nullable {
                    violations.push(SchemaViolation {
                        path,
                        message: "value must not be null".to_string(),
                    });
                }
            }
            Some(value) => {
                let before = violations.len();
                check_value(&spec.field_type, value, &path, violations);
                if violations.len() == before {
                    check_allowed(spec, value, &path, violations);
                }
            }
        }
    }
}

fn check_value(
    field_type: &FieldType,
    value: &Value,
    path: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    let type_ok = match field_type {
        FieldType::Any => true,
        FieldType::String => value.is_string(),
        FieldType::Integer => accepts_integer(value),
        FieldType::Number => accepts_number(value),
        FieldType::Boolean => accepts_boolean(value),
        FieldType::Object { schema } => match value.as_object() {
            Some(object) => {
                check_fields(&schema.fields, object, path, violations);
                true
            }
            None => false,
        },
        FieldType::Array { items } => match value.as_array() {
            Some(elements) => {
                for (index, element) in elements.iter().enumerate() {
                    check_value(items, element, &format!("{path}[{index}]"), violations);
                }
                true
            }
            None => false,
        },
        FieldType::Map { values } => match value.as_object() {
            Some(entries) => {
                for (key, entry) in entries {
                    check_value(values, entry, &format!("{path}.{key}"), violations);
                }
                true
            }
            None => false,
        },
    };

    if !type_ok {
        violations.push(SchemaViolation {
            path: path.to_string(),
            message: format!(
                "expected {}, got {}",
                field_type.label(),
                json_type_name(value)
            ),
        });
    }
}

fn check_allowed(
    spec: &FieldSpec,
    value: &Value,
    path: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    let Some(allowed) = &spec.allowed else {
        return;
    };
    if allowed.contains(value) {
        return;
    }

    let choices = allowed
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    violations.push(SchemaViolation {
        path: path.to_string(),
        message: format!("value {value} is not one of: {choices}"),
    });
}

/// Spellings read as a boolean when a string stands in for one.
const BOOLEAN_WORDS: [&str; 12] = [
    "0", "off", "f", "false", "n", "no", "1", "on", "t", "true", "y", "yes",
];

// Scalar checks are lax: extractors routinely emit `"2023"` or `"true"`, and
// such values still count as well-formed output. Nothing is rewritten.

fn accepts_integer(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(number) => {
            number.is_i64()
                || number.is_u64()
                || number.as_f64().is_some_and(is_integral_real)
        }
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>().is_ok() || text.parse::<f64>().is_ok_and(is_integral_real)
        }
        _ => false,
    }
}

fn accepts_number(value: &Value) -> bool {
    match value {
        Value::Bool(_) | Value::Number(_) => true,
        Value::String(text) => text.trim().parse::<f64>().is_ok(),
        _ => false,
    }
}

fn accepts_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(number) => number
            .as_f64()
            .is_some_and(|real| real == 0.0 || real == 1.0),
        Value::String(text) => BOOLEAN_WORDS.contains(&text.to_lowercase().as_str()),
        _ => false,
    }
}

fn is_integral_real(real: f64) -> bool {
    real.is_finite() && real.fract() == 0.0
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub const INDEPENDENCE_VALUES: [&str; 3] = ["Independent", "Executive", "Non-Independent"];

/// Schema for an ESG report extraction: company, reporting year, board,
/// greenhouse-gas emissions, policy flags and free-form governance data.
pub fn esg_document_schema() -> SchemaDescriptor {
    let board_member = FieldType::object(
        "BoardMember",
        vec![
            FieldSpec::required("name", FieldType::String),
            FieldSpec::required("role", FieldType::String),
            FieldSpec::optional("independence", FieldType::String).one_of(&INDEPENDENCE_VALUES),
        ],
    );

    let board = FieldType::object(
        "BoardInfo",
        vec![
            FieldSpec::optional("chair", board_member.clone()),
            FieldSpec::optional("members", FieldType::array_of(board_member)).non_null(),
            FieldSpec::optional("counts", FieldType::map_of(FieldType::Integer)),
        ],
    );

    let ghg = FieldType::object(
        "GHG",
        vec![
            FieldSpec::optional("base_year", FieldType::Integer),
            FieldSpec::optional("scope1_tco2e", FieldType::Number),
            FieldSpec::optional("scope2_market_tco2e", FieldType::Number),
            FieldSpec::optional("scope2_location_tco2e", FieldType::Number),
            FieldSpec::optional("scope3_tco2e", FieldType::Number),
            FieldSpec::optional("total_tco2e", FieldType::Number),
            FieldSpec::optional("intensity_tco2e_per_eur_m", FieldType::Number),
        ],
    );

    let policies = FieldType::object(
        "Policies",
        vec![
            FieldSpec::optional("anti_corruption", FieldType::Boolean),
            FieldSpec::optional("whistleblowing", FieldType::Boolean),
            FieldSpec::optional("human_rights", FieldType::Boolean),
            FieldSpec::optional("climate_policy", FieldType::Boolean),
            FieldSpec::optional("dei_policy", FieldType::Boolean),
            FieldSpec::optional("assurance", FieldType::String),
        ],
    );

    SchemaDescriptor::new(
        "DocESG",
        vec![
            FieldSpec::optional("company", FieldType::String),
            FieldSpec::optional("year", FieldType::Integer),
            FieldSpec::optional("board", board),
            FieldSpec::optional("ghg", ghg),
            FieldSpec::optional("policies", policies),
            FieldSpec::optional("governance", FieldType::map_of(FieldType::Any)),
        ],
    )
}
