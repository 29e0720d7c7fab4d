//! Input form
//!
//! The 18 controls of the attrition form and the values they currently hold.

pub mod controls;

pub use controls::{
    find_control, rating_to_display, ChoiceOption, ChoiceStyle, ControlKind, FormControl,
    OptionValue, CONTROLS,
};

use controls::control_index;

use crate::features::UserInput;
use crate::{AttritionError, FeatureValue, Result};

/// Current value of every form control
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    values: Vec<FeatureValue>,
}

impl Default for FormValues {
    fn default() -> Self {
        Self::initial()
    }
}

impl FormValues {
    /// Every control at its initial value
    pub fn initial() -> Self {
        FormValues {
            values: CONTROLS.iter().map(|c| c.initial_value()).collect(),
        }
    }

    /// Parse and store a raw value for a field
    pub fn set(&mut self, field: &str, raw: &str) -> Result<&'static FormControl> {
        let index = control_index(field)
            .ok_or_else(|| AttritionError::UnknownField(field.to_string()))?;
        let control = &CONTROLS[index];
        self.values[index] = control.parse(raw)?;
        Ok(control)
    }

    pub fn get(&self, field: &str) -> Option<&FeatureValue> {
        control_index(field).map(|i| &self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static FormControl, &FeatureValue)> + '_ {
        CONTROLS.iter().zip(self.values.iter())
    }

    /// Every control contributes its value
    pub fn to_user_input(&self) -> UserInput {
        self.iter()
            .map(|(control, value)| (control.field, value.clone()))
            .collect()
    }
}

/// Parse `Field=Value` assignments against the form controls
pub fn parse_assignments<'a, I>(assignments: I) -> Result<UserInput>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut input = UserInput::new();
    for assignment in assignments {
        let (field, raw) = assignment.split_once('=').ok_or_else(|| {
            AttritionError::InvalidValue {
                field: assignment.to_string(),
                message: "expected Field=Value".to_string(),
            }
        })?;
        let control =
            find_control(field).ok_or_else(|| AttritionError::UnknownField(field.to_string()))?;
        input.set(control.field, control.parse(raw)?);
    }
    Ok(input)
}

/// Parse a TOML table of field values (strings or numbers) against the form
pub fn parse_input_table(content: &str) -> Result<UserInput> {
    let table: toml::Table = toml::from_str(content)
        .map_err(|e| AttritionError::Config(format!("Failed to parse input file: {}", e)))?;

    let mut input = UserInput::new();
    for (field, value) in table {
        let control =
            find_control(&field).ok_or_else(|| AttritionError::UnknownField(field.clone()))?;
        let raw = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(n) => n.to_string(),
            other => {
                return Err(AttritionError::InvalidValue {
                    field,
                    message: format!("unsupported value {}", other),
                })
            }
        };
        input.set(control.field, control.parse(&raw)?);
    }
    Ok(input)
}
