//! Result rendering for the terminal
//!
//! The table view mirrors the dashboard: predicted label, a favourable or
//! unfavourable status line and a two-segment stay/leave bar.

use serde::Serialize;

use crate::features::FeatureRecord;
use crate::predict::inference::{Outcome, PredictionResult, LEAVE_LABEL, STAY_LABEL};
use crate::{AttritionError, DisplayConfig, Result};

const GREEN_BG: &str = "\x1b[1;97;42m";
const RED_BG: &str = "\x1b[1;97;41m";
const GREEN: &str = "\x1b[1;32m";
const RED: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

/// Stay and leave probabilities, located by label
fn stay_leave(result: &PredictionResult) -> Result<(f64, f64)> {
    let lookup = |label: &str| {
        result.probability_of(label).ok_or_else(|| {
            AttritionError::Inference(format!("artifact does not report class '{}'", label))
        })
    };
    Ok((lookup(STAY_LABEL)?, lookup(LEAVE_LABEL)?))
}

/// Whole-number percentage label
pub fn percent(p: f64) -> String {
    format!("{:.0}%", p * 100.0)
}

fn fits(width: usize, text: &str) -> bool {
    text.chars().count() <= width
}

fn segment(width: usize, text: &str, fill: char, style: Option<&str>) -> String {
    match style {
        Some(code) => {
            let inner = if fits(width, text) {
                format!("{:^width$}", text, width = width)
            } else {
                " ".repeat(width)
            };
            format!("{}{}{}", code, inner, RESET)
        }
        None => fill.to_string().repeat(width),
    }
}

/// Two-segment proportional bar: stay on the left, leave on the right
pub fn probability_bar(stay: f64, leave: f64, width: usize, color: bool) -> String {
    let total = stay + leave;
    let stay_share = if total > 0.0 { stay / total } else { 0.5 };
    let stay_cells = ((stay_share * width as f64).round() as usize).min(width);
    let leave_cells = width - stay_cells;

    let (stay_style, leave_style) = if color {
        (Some(GREEN_BG), Some(RED_BG))
    } else {
        (None, None)
    };

    let (stay_text, leave_text) = (percent(stay), percent(leave));
    let bar = format!(
        "{}{}",
        segment(stay_cells, &stay_text, '\u{2588}', stay_style),
        segment(leave_cells, &leave_text, '\u{2591}', leave_style)
    );
    if !color {
        return bar;
    }

    // A colored segment too narrow for its label gets it beside the bar
    let stay_outside = !fits(stay_cells, &stay_text);
    let leave_outside = !fits(leave_cells, &leave_text);
    match (stay_outside, leave_outside) {
        (false, false) => bar,
        (true, false) => format!("{} {}", stay_text, bar),
        (false, true) => format!("{} {}", bar, leave_text),
        (true, true) => format!("{} {} {}", stay_text, bar, leave_text),
    }
}

/// Status line for the predicted outcome
pub fn status_line(result: &PredictionResult, color: bool) -> String {
    let (text, code) = match result.outcome() {
        Outcome::Leave => ("\u{26a0}\u{fe0f}  Employee is likely to leave.", RED),
        Outcome::Stay => ("\u{2705} Employee is likely to stay.", GREEN),
    };
    if color {
        format!("{}{}{}", code, text, RESET)
    } else {
        text.to_string()
    }
}

/// Format a prediction for display
pub fn format_prediction(result: &PredictionResult, display: &DisplayConfig) -> Result<String> {
    let (stay, leave) = stay_leave(result)?;

    Ok(format!(
        r#"
┌─────────────────────────────────────────────────┐
│  Prediction Result
├─────────────────────────────────────────────────┤
│  Predicted Attrition:  {}
│  {}
├─────────────────────────────────────────────────┤
│  Prediction Probabilities
│  {}
│  Stay ({}): {}    Leave ({}): {}
└─────────────────────────────────────────────────┘
"#,
        result.label,
        status_line(result, display.color),
        probability_bar(stay, leave, display.bar_width, display.color),
        STAY_LABEL,
        percent(stay),
        LEAVE_LABEL,
        percent(leave),
    ))
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    record: &'a FeatureRecord,
    prediction: &'a PredictionResult,
}

/// Record and prediction as a JSON document, record keys in column order
pub fn format_json(record: &FeatureRecord, result: &PredictionResult) -> Result<String> {
    let output = JsonOutput {
        record,
        prediction: result,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Header plus one row
pub fn format_csv(result: &PredictionResult) -> Result<String> {
    let (stay, leave) = stay_leave(result)?;
    Ok(format!(
        "label,no_probability,yes_probability\n{},{:.3},{:.3}",
        result.label, stay, leave
    ))
}

/// Render in the requested format
pub fn render(
    format: OutputFormat,
    record: &FeatureRecord,
    result: &PredictionResult,
    display: &DisplayConfig,
) -> Result<String> {
    match format {
        OutputFormat::Table => format_prediction(result, display),
        OutputFormat::Json => format_json(record, result),
        OutputFormat::Csv => format_csv(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{assemble_with_defaults, UserInput};
    use crate::predict::inference::ClassProbability;

    fn result(label: &str, no: f64, yes: f64) -> PredictionResult {
        PredictionResult {
            label: label.to_string(),
            probabilities: vec![
                ClassProbability {
                    label: "No".to_string(),
                    probability: no,
                },
                ClassProbability {
                    label: "Yes".to_string(),
                    probability: yes,
                },
            ],
        }
    }

    fn plain() -> DisplayConfig {
        DisplayConfig {
            color: false,
            bar_width: 20,
        }
    }

    #[test]
    fn test_percent_rounds_to_whole() {
        assert_eq!(percent(0.726), "73%");
        assert_eq!(percent(0.274), "27%");
        assert_eq!(percent(1.0), "100%");
    }

    #[test]
    fn test_plain_bar_proportions() {
        let bar = probability_bar(0.75, 0.25, 20, false);
        assert_eq!(bar.chars().filter(|&c| c == '\u{2588}').count(), 15);
        assert_eq!(bar.chars().filter(|&c| c == '\u{2591}').count(), 5);
    }

    #[test]
    fn test_bar_full_width_either_way() {
        for (stay, leave) in [(1.0, 0.0), (0.0, 1.0), (0.5, 0.5), (0.333, 0.667)] {
            let bar = probability_bar(stay, leave, 17, false);
            assert_eq!(bar.chars().count(), 17);
        }
    }

    #[test]
    fn test_colored_bar_labels_segments() {
        let bar = probability_bar(0.6, 0.4, 20, true);
        assert!(bar.contains("60%"));
        assert!(bar.contains("40%"));
        assert!(bar.starts_with(GREEN_BG));
    }

    #[test]
    fn test_narrow_colored_segment_keeps_percentage() {
        let bar = probability_bar(0.02, 0.98, 40, true);
        assert!(bar.contains("2%"));
        assert!(bar.contains("98%"));
        // Label sits outside the colored cells
        assert!(bar.starts_with("2% "));
        assert_eq!(bar.matches(RESET).count(), 2);

        let bar = probability_bar(0.99, 0.01, 40, true);
        assert!(bar.contains("99%"));
        assert!(bar.ends_with(&format!("{} 1%", RESET)));

        // Plain bars are unchanged
        let plain_bar = probability_bar(0.02, 0.98, 40, false);
        assert_eq!(plain_bar.chars().count(), 40);
    }

    #[test]
    fn test_table_for_leave() {
        let text = format_prediction(&result("Yes", 0.27, 0.73), &plain()).unwrap();
        assert!(text.contains("Predicted Attrition:  Yes"));
        assert!(text.contains("likely to leave"));
        assert!(text.contains("Stay (No): 27%"));
        assert!(text.contains("Leave (Yes): 73%"));
    }

    #[test]
    fn test_table_for_stay() {
        let text = format_prediction(&result("No", 0.9, 0.1), &plain()).unwrap();
        assert!(text.contains("likely to stay"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_lookup_by_name_not_position() {
        let mut reversed = result("Yes", 0.2, 0.8);
        reversed.probabilities.reverse();
        let csv = format_csv(&reversed).unwrap();
        assert!(csv.ends_with("Yes,0.200,0.800"));
    }

    #[test]
    fn test_missing_class_is_error() {
        let mut odd = result("Yes", 0.2, 0.8);
        odd.probabilities[0].label = "Stayed".to_string();
        assert!(format_prediction(&odd, &plain()).is_err());
    }

    #[test]
    fn test_json_contains_record_and_prediction() {
        let record = assemble_with_defaults(&UserInput::new());
        let json = format_json(&record, &result("No", 0.7, 0.3)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["prediction"]["label"], "No");
        assert_eq!(value["record"]["OverTime"], "No");
        assert_eq!(value["record"].as_object().unwrap().len(), 26);
    }

    #[test]
    fn test_json_keeps_column_order() {
        let record = assemble_with_defaults(&UserInput::new());
        let json = format_json(&record, &result("No", 0.7, 0.3)).unwrap();
        let at = |key: &str| json.find(&format!("\"{}\"", key)).unwrap();

        // Numeric defaults precede categorical ones in the trained layout
        assert!(at("DistanceFromHome") < at("BusinessTravel"));
        assert!(at("Age") < at("JobRole"));
        assert!(at("record") < at("prediction"));

        let positions: Vec<usize> = record.names().map(at).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
