//! Form control definitions
//!
//! Each control is bound to one schema field and only produces values from its
//! own domain, so out-of-vocabulary values never reach the artifact.

use crate::{AttritionError, FeatureValue, Result};

const STAR: &str = "\u{2b50}";

/// Render a star rating as `n` star glyphs
pub fn rating_to_display(n: u8) -> String {
    STAR.repeat(n as usize)
}

/// Value an option maps to in the feature record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionValue {
    Ordinal(i64),
    Text(&'static str),
}

impl OptionValue {
    pub fn to_feature_value(self) -> FeatureValue {
        match self {
            OptionValue::Ordinal(n) => FeatureValue::Number(n as f64),
            OptionValue::Text(s) => FeatureValue::Category(s.to_string()),
        }
    }

    fn matches(self, raw: &str) -> bool {
        match self {
            OptionValue::Ordinal(n) => raw.parse::<i64>().map(|v| v == n).unwrap_or(false),
            OptionValue::Text(s) => s.eq_ignore_ascii_case(raw),
        }
    }
}

/// A labelled option of a choice control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub value: OptionValue,
}

const fn text(label: &'static str) -> ChoiceOption {
    ChoiceOption {
        label,
        value: OptionValue::Text(label),
    }
}

const fn ordinal(label: &'static str, value: i64) -> ChoiceOption {
    ChoiceOption {
        label,
        value: OptionValue::Ordinal(value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    Radio,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    /// Whole-number entry with optional bounds
    Number {
        min: Option<i64>,
        max: Option<i64>,
        initial: i64,
    },
    /// Single choice from a fixed option set; `initial` indexes `options`
    Choice {
        options: &'static [ChoiceOption],
        style: ChoiceStyle,
        initial: usize,
    },
    /// 1..=max star rating
    StarRating { max: u8, initial: u8 },
}

/// One input control of the form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormControl {
    pub field: &'static str,
    pub label: &'static str,
    pub kind: ControlKind,
}

const EDUCATION: &[ChoiceOption] = &[
    ordinal("Below College", 1),
    ordinal("College", 2),
    ordinal("Bachelor\u{2019}s", 3),
    ordinal("Master\u{2019}s", 4),
    ordinal("Doctorate(PhD)", 5),
];

const JOB_LEVEL: &[ChoiceOption] = &[
    ordinal("Junior", 1),
    ordinal("Senior", 2),
    ordinal("Lead", 3),
    ordinal("Team Lead", 4),
    ordinal("PC", 5),
];

const DEPARTMENT: &[ChoiceOption] = &[
    text("Sales"),
    text("Research & Development"),
    text("Human Resources"),
];

const GENDER: &[ChoiceOption] = &[text("Male"), text("Female")];

const JOB_ROLE: &[ChoiceOption] = &[
    text("Sales Executive"),
    text("Research Scientist"),
    text("Laboratory Technician"),
    text("Manufacturing Director"),
    text("Healthcare Representative"),
    text("Manager"),
    text("Sales Representative"),
    text("Human Resources"),
];

const MARITAL_STATUS: &[ChoiceOption] = &[text("Single"), text("Married"), text("Divorced")];

const OVER_TIME: &[ChoiceOption] = &[text("Yes"), text("No")];

const fn number(field: &'static str, label: &'static str, min: i64, initial: i64) -> FormControl {
    FormControl {
        field,
        label,
        kind: ControlKind::Number {
            min: Some(min),
            max: None,
            initial,
        },
    }
}

const fn stars(field: &'static str, label: &'static str) -> FormControl {
    FormControl {
        field,
        label,
        kind: ControlKind::StarRating { max: 5, initial: 1 },
    }
}

const fn radio(
    field: &'static str,
    label: &'static str,
    options: &'static [ChoiceOption],
) -> FormControl {
    FormControl {
        field,
        label,
        kind: ControlKind::Choice {
            options,
            style: ChoiceStyle::Radio,
            initial: 0,
        },
    }
}

/// The form, in display order
pub const CONTROLS: &[FormControl] = &[
    number("Age", "Age", 18, 18),
    radio("Education", "Education qualification", EDUCATION),
    stars("EnvironmentSatisfaction", "Environment Satisfaction"),
    radio("JobLevel", "Job Level", JOB_LEVEL),
    stars("JobSatisfaction", "Job Satisfaction"),
    FormControl {
        field: "MonthlyIncome",
        label: "Monthly Income",
        kind: ControlKind::Number {
            min: Some(1000),
            max: Some(200_000),
            initial: 10_000,
        },
    },
    number("PercentSalaryHike", "Percent Salary Hike", 0, 0),
    stars("PerformanceRating", "Performance Rating"),
    number("TotalWorkingYears", "Total Working Years", 1, 1),
    stars("WorkLifeBalance", "WorkLife Balance"),
    number("YearsAtCompany", "Years At Company", 0, 0),
    number("YearsSinceLastPromotion", "Years Since Last Promotion", 0, 0),
    number("YearsWithCurrManager", "Years With Current Manager", 0, 0),
    radio("Department", "Department", DEPARTMENT),
    radio("Gender", "Gender", GENDER),
    FormControl {
        field: "JobRole",
        label: "Job Role",
        kind: ControlKind::Choice {
            options: JOB_ROLE,
            style: ChoiceStyle::Select,
            initial: 0,
        },
    },
    radio("MaritalStatus", "Marital Status", MARITAL_STATUS),
    radio("OverTime", "OverTime", OVER_TIME),
];

/// Position of a control in `CONTROLS` by field name (trimmed, case-insensitive)
pub(crate) fn control_index(field: &str) -> Option<usize> {
    let field = field.trim();
    CONTROLS
        .iter()
        .position(|c| c.field.eq_ignore_ascii_case(field))
}

/// Look up a control by field name (case-insensitive)
pub fn find_control(field: &str) -> Option<&'static FormControl> {
    control_index(field).map(|i| &CONTROLS[i])
}

/// Fold typographic apostrophes so "Master's" matches "Master’s"
fn fold_label(s: &str) -> String {
    s.trim().replace('\u{2019}', "'").to_lowercase()
}

impl FormControl {
    /// Value the control holds before the user touches it
    pub fn initial_value(&self) -> FeatureValue {
        match self.kind {
            ControlKind::Number { initial, .. } => FeatureValue::Number(initial as f64),
            ControlKind::Choice {
                options, initial, ..
            } => options[initial].value.to_feature_value(),
            ControlKind::StarRating { initial, .. } => FeatureValue::Number(initial as f64),
        }
    }

    /// Parse raw text the way the widget would accept it
    pub fn parse(&self, raw: &str) -> Result<FeatureValue> {
        let raw = raw.trim();
        match self.kind {
            ControlKind::Number { min, max, .. } => {
                let n: i64 = raw
                    .parse()
                    .map_err(|_| self.invalid(format!("expected a whole number, got '{}'", raw)))?;
                if let Some(min) = min {
                    if n < min {
                        return Err(self.invalid(format!("must be at least {}", min)));
                    }
                }
                if let Some(max) = max {
                    if n > max {
                        return Err(self.invalid(format!("must be at most {}", max)));
                    }
                }
                Ok(FeatureValue::Number(n as f64))
            }
            ControlKind::Choice { options, .. } => {
                let folded = fold_label(raw);
                options
                    .iter()
                    .find(|o| fold_label(o.label) == folded || o.value.matches(raw))
                    .map(|o| o.value.to_feature_value())
                    .ok_or_else(|| {
                        let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
                        self.invalid(format!("expected one of: {}", labels.join(", ")))
                    })
            }
            ControlKind::StarRating { max, .. } => {
                let n = if !raw.is_empty() && raw.chars().all(|c| c == '*') {
                    raw.chars().count()
                } else if !raw.is_empty() && raw.replace(STAR, "").is_empty() {
                    raw.chars().count()
                } else {
                    raw.parse::<usize>()
                        .map_err(|_| self.invalid(format!("expected a rating 1-{}", max)))?
                };
                if n == 0 || n > max as usize {
                    return Err(self.invalid(format!("expected a rating 1-{}", max)));
                }
                Ok(FeatureValue::Number(n as f64))
            }
        }
    }

    /// Human-readable form of a value this control produced
    pub fn display_value(&self, value: &FeatureValue) -> String {
        match self.kind {
            ControlKind::Choice { options, .. } => options
                .iter()
                .find(|o| o.value.to_feature_value() == *value)
                .map(|o| o.label.to_string())
                .unwrap_or_else(|| value.to_string()),
            ControlKind::StarRating { .. } => match value.as_number() {
                Some(n) if n >= 0.0 && n <= u8::MAX as f64 => rating_to_display(n as u8),
                _ => value.to_string(),
            },
            ControlKind::Number { .. } => value.to_string(),
        }
    }

    /// Short description of what the control accepts
    pub fn describe(&self) -> String {
        match self.kind {
            ControlKind::Number { min, max, .. } => match (min, max) {
                (Some(min), Some(max)) => format!("number {}..={}", min, max),
                (Some(min), None) => format!("number >= {}", min),
                (None, Some(max)) => format!("number <= {}", max),
                (None, None) => "number".to_string(),
            },
            ControlKind::Choice { options, style, .. } => {
                let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
                let kind = match style {
                    ChoiceStyle::Radio => "one of",
                    ChoiceStyle::Select => "select",
                };
                format!("{}: {}", kind, labels.join(" | "))
            }
            ControlKind::StarRating { max, .. } => {
                let scale: Vec<String> = (1..=max).map(rating_to_display).collect();
                format!("rating: {}", scale.join(" | "))
            }
        }
    }

    fn invalid(&self, message: String) -> AttritionError {
        AttritionError::InvalidValue {
            field: self.field.to_string(),
            message,
        }
    }
}
