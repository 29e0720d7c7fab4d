//! Interactive form session
//!
//! Idle -> Submitted -> ResultDisplayed, and back to Idle on the next edit.
//! Every submission re-assembles the record from the current form values.

use std::io::{BufRead, Write};

use crate::features::{assemble_with_defaults, FeatureRecord};
use crate::form::FormValues;
use crate::model::Classifier;
use crate::predict::{format_prediction, InferenceService, PredictionResult};
use crate::{DisplayConfig, Result};

/// Where the session is in the form/submit/result cycle
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Submitted,
    ResultDisplayed(PredictionResult),
}

/// One user's form state over a shared, read-only predictor
pub struct Session<'a, C: Classifier> {
    service: &'a InferenceService<C>,
    form: FormValues,
    state: SessionState,
}

impl<'a, C: Classifier> Session<'a, C> {
    pub fn new(service: &'a InferenceService<C>) -> Self {
        Session {
            service,
            form: FormValues::initial(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    /// Change one form value; any accepted edit drops the shown result
    pub fn edit(&mut self, field: &str, raw: &str) -> Result<()> {
        self.form.set(field, raw)?;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// The record a submission would send right now
    pub fn record(&self) -> FeatureRecord {
        assemble_with_defaults(&self.form.to_user_input())
    }

    /// Assemble, classify and hold the result for display
    pub fn submit(&mut self) -> Result<PredictionResult> {
        self.state = SessionState::Submitted;
        let record = self.record();
        match self.service.predict(&record) {
            Ok(result) => {
                self.state = SessionState::ResultDisplayed(result.clone());
                Ok(result)
            }
            Err(e) => {
                self.state = SessionState::Idle;
                Err(e)
            }
        }
    }
}

const HELP: &str = "\
Commands:
  show                  show the form
  set <Field> <value>   change a field (also: <Field>=<value>)
  predict               run the prediction
  help                  show this help
  quit                  leave the session";

fn write_form<W: Write, C: Classifier>(out: &mut W, session: &Session<'_, C>) -> Result<()> {
    writeln!(out, "Enter Employee Details")?;
    for (control, value) in session.form().iter() {
        writeln!(
            out,
            "  {:<28} {:<24} [{}]",
            control.field,
            control.display_value(value),
            control.describe()
        )?;
    }
    Ok(())
}

/// Drive a session from line-oriented input until `quit` or end of input
pub fn run<R, W, C>(
    session: &mut Session<'_, C>,
    input: R,
    out: &mut W,
    display: &DisplayConfig,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    C: Classifier,
{
    writeln!(out, "Employee Attrition Prediction")?;
    writeln!(out, "{}", HELP)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match command.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" => writeln!(out, "{}", HELP)?,
            "show" => write_form(out, session)?,
            "predict" => match session.submit() {
                Ok(result) => {
                    let text = format_prediction(&result, display)?;
                    writeln!(out, "{}", text)?;
                }
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            "set" => match rest.trim().split_once(char::is_whitespace) {
                Some((field, raw)) => report_edit(out, session.edit(field, raw))?,
                None => writeln!(out, "Usage: set <Field> <value>")?,
            },
            _ => match line.split_once('=') {
                Some((field, raw)) => report_edit(out, session.edit(field, raw))?,
                None => writeln!(out, "Unknown command: {} (try 'help')", command)?,
            },
        }
    }

    Ok(())
}

fn report_edit<W: Write>(out: &mut W, edit: Result<()>) -> Result<()> {
    if let Err(e) = edit {
        writeln!(out, "Error: {}", e)?;
    }
    Ok(())
}
