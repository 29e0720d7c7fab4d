//! Default value tables for fields the user does not supply
//!
//! Medians for numeric fields and modes for categorical/ordinal fields, taken
//! from the training data by the offline pipeline. Declaration order here is
//! the column order the artifact was trained with.

use crate::FeatureValue;

/// An ordered table of feature defaults
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTable {
    entries: Vec<(&'static str, FeatureValue)>,
}

impl DefaultTable {
    pub fn new(entries: Vec<(&'static str, FeatureValue)>) -> Self {
        DefaultTable { entries }
    }

    /// Keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Median defaults for the numeric fields
pub fn numeric_defaults() -> DefaultTable {
    DefaultTable::new(vec![
        ("Age", FeatureValue::Number(30.0)),
        ("DistanceFromHome", FeatureValue::Number(5.0)),
        ("MonthlyIncome", FeatureValue::Number(30000.0)),
        ("NumCompaniesWorked", FeatureValue::Number(1.0)),
        ("PercentSalaryHike", FeatureValue::Number(10.0)),
        ("TotalWorkingYears", FeatureValue::Number(5.0)),
        ("TrainingTimesLastYear", FeatureValue::Number(2.0)),
        ("YearsAtCompany", FeatureValue::Number(5.0)),
        ("YearsInCurrentRole", FeatureValue::Number(2.0)),
        ("YearsSinceLastPromotion", FeatureValue::Number(1.0)),
        ("YearsWithCurrManager", FeatureValue::Number(3.0)),
    ])
}

/// Mode defaults for the categorical and ordinal fields
pub fn categorical_defaults() -> DefaultTable {
    DefaultTable::new(vec![
        ("Education", FeatureValue::Number(3.0)),
        ("EnvironmentSatisfaction", FeatureValue::Number(3.0)),
        ("JobInvolvement", FeatureValue::Number(3.0)),
        ("JobLevel", FeatureValue::Number(2.0)),
        ("JobSatisfaction", FeatureValue::Number(3.0)),
        ("RelationshipSatisfaction", FeatureValue::Number(3.0)),
        ("WorkLifeBalance", FeatureValue::Number(3.0)),
        ("PerformanceRating", FeatureValue::Number(3.0)),
        ("BusinessTravel", "Travel_Rarely".into()),
        ("Department", "Sales".into()),
        ("Gender", "Male".into()),
        ("MaritalStatus", "Single".into()),
        ("OverTime", "No".into()),
        ("EducationField", "Life Sciences".into()),
        ("JobRole", "Sales Executive".into()),
    ])
}

/// Column order the artifact expects: numeric keys, then categorical keys
pub fn expected_columns(numeric: &DefaultTable, categorical: &DefaultTable) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = Vec::with_capacity(numeric.len() + categorical.len());
    for key in numeric.keys().chain(categorical.keys()) {
        if !columns.contains(&key) {
            columns.push(key);
        }
    }
    columns
}
