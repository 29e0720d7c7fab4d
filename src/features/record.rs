//! Feature record assembly
//!
//! Merges user-entered values over the default tables and lays the result out
//! in the column order the artifact was trained with.

use std::collections::{BTreeMap, HashMap};

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::defaults::{categorical_defaults, expected_columns, numeric_defaults, DefaultTable};
use crate::FeatureValue;

/// Values supplied by the user, keyed by feature name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserInput {
    values: BTreeMap<String, FeatureValue>,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the previous one for this key
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FeatureValue>,
    ) -> Option<FeatureValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay another input on top of this one (the other input wins)
    pub fn extend(&mut self, other: UserInput) {
        self.values.extend(other.values);
    }
}

impl<K: Into<String>, V: Into<FeatureValue>> FromIterator<(K, V)> for UserInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        UserInput {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One complete, ordered row submitted to the artifact
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRecord {
    /// Build a record from columns already in artifact order
    pub fn from_columns(columns: Vec<(String, FeatureValue)>) -> Self {
        FeatureRecord { columns }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> + '_ {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Assemble a record from user input and the two default tables.
///
/// Precedence, lowest to highest: numeric defaults, categorical defaults,
/// user input. Column order is the numeric keys followed by the categorical
/// keys, each in declaration order, regardless of where a value came from.
/// User keys outside both tables are not part of the schema and are dropped.
pub fn assemble(
    user: &UserInput,
    numeric: &DefaultTable,
    categorical: &DefaultTable,
) -> FeatureRecord {
    let mut merged: HashMap<&str, &FeatureValue> = HashMap::new();
    for (key, value) in numeric.iter() {
        merged.insert(key, value);
    }
    for (key, value) in categorical.iter() {
        merged.insert(key, value);
    }
    for (key, value) in user.iter() {
        if !numeric.contains(key) && !categorical.contains(key) {
            log::debug!("Dropping {} from record: not in the feature schema", key);
            continue;
        }
        merged.insert(key, value);
    }

    let columns = expected_columns(numeric, categorical)
        .into_iter()
        .filter_map(|name| merged.get(name).map(|v| (name.to_string(), (*v).clone())))
        .collect();

    FeatureRecord { columns }
}

/// Assemble against the built-in median/mode tables
pub fn assemble_with_defaults(user: &UserInput) -> FeatureRecord {
    assemble(user, &numeric_defaults(), &categorical_defaults())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input_uses_defaults() {
        let record = assemble_with_defaults(&UserInput::new());
        assert_eq!(record.len(), 26);
        assert_eq!(record.get("MonthlyIncome"), Some(&FeatureValue::Number(30000.0)));
        assert_eq!(record.get("BusinessTravel"), Some(&FeatureValue::from("Travel_Rarely")));
    }

    #[test]
    fn test_user_overrides_default() {
        let mut user = UserInput::new();
        user.set("JobLevel", 5i64);
        user.set("Gender", "Female");

        let record = assemble_with_defaults(&user);
        assert_eq!(record.get("JobLevel"), Some(&FeatureValue::Number(5.0)));
        assert_eq!(record.get("Gender"), Some(&FeatureValue::from("Female")));
        // Untouched fields keep their defaults
        assert_eq!(record.get("JobInvolvement"), Some(&FeatureValue::Number(3.0)));
    }

    #[test]
    fn test_unknown_user_key_dropped() {
        let mut user = UserInput::new();
        user.set("EmployeeNumber", 1234i64);

        let record = assemble_with_defaults(&user);
        assert_eq!(record.len(), 26);
        assert!(record.get("EmployeeNumber").is_none());
    }

    #[test]
    fn test_categorical_default_overrides_numeric_default() {
        let numeric = DefaultTable::new(vec![("Shared", FeatureValue::Number(1.0))]);
        let categorical = DefaultTable::new(vec![("Shared", FeatureValue::from("mode"))]);

        let record = assemble(&UserInput::new(), &numeric, &categorical);
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("Shared"), Some(&FeatureValue::from("mode")));
    }

    #[test]
    fn test_documented_scenario() {
        let user: UserInput = [
            ("Age", FeatureValue::Number(30.0)),
            ("MonthlyIncome", FeatureValue::Number(10000.0)),
            ("OverTime", FeatureValue::from("No")),
            ("Department", FeatureValue::from("Research & Development")),
        ]
        .into_iter()
        .collect();

        let record = assemble_with_defaults(&user);
        assert_eq!(record.len(), 26);
        assert_eq!(record.get("OverTime"), Some(&FeatureValue::from("No")));
        assert_eq!(record.get("Age"), Some(&FeatureValue::Number(30.0)));
        assert_eq!(record.get("MonthlyIncome"), Some(&FeatureValue::Number(10000.0)));
        assert_eq!(
            record.get("Department"),
            Some(&FeatureValue::from("Research & Development"))
        );
    }

    #[test]
    fn test_serializes_in_column_order() {
        let record = assemble_with_defaults(&UserInput::new());
        let json = serde_json::to_string(&record).unwrap();
        let age = json.find("\"Age\"").unwrap();
        let role = json.find("\"JobRole\"").unwrap();
        assert!(age < role);
        assert!(json.starts_with("{\"Age\":30"));
    }

    fn schema_keys() -> Vec<&'static str> {
        expected_columns(&numeric_defaults(), &categorical_defaults())
    }

    fn arb_value() -> impl Strategy<Value = FeatureValue> {
        prop_oneof![
            (0i64..200_000).prop_map(|n| FeatureValue::Number(n as f64)),
            "[A-Za-z &]{1,20}".prop_map(FeatureValue::Category),
        ]
    }

    fn arb_input() -> impl Strategy<Value = UserInput> {
        let keys = schema_keys();
        let extra = prop::collection::vec(("[a-z]{3,10}", arb_value()), 0..3);
        (
            prop::collection::vec((prop::sample::select(keys), arb_value()), 0..40),
            extra,
        )
            .prop_map(|(known, extra)| {
                let mut input = UserInput::new();
                for (k, v) in known {
                    input.set(k, v);
                }
                for (k, v) in extra {
                    input.set(k, v);
                }
                input
            })
    }

    proptest! {
        #[test]
        fn prop_record_has_schema_keys_in_order(user in arb_input()) {
            let record = assemble_with_defaults(&user);
            let names: Vec<&str> = record.names().collect();
            prop_assert_eq!(names, schema_keys());
        }

        #[test]
        fn prop_user_input_wins(user in arb_input()) {
            let record = assemble_with_defaults(&user);
            for key in schema_keys() {
                if let Some(value) = user.get(key) {
                    prop_assert_eq!(record.get(key), Some(value));
                }
            }
        }
    }
}
