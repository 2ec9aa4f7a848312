//! Line-driven editing of an [EstimateForm], redrawing the breakdown after
//! every change.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::{
    form::{EstimateForm, FormCommand},
    render::{render_breakdown, render_inputs, RenderOptions},
};

/// Read commands from `input` until it ends or a `quit` arrives, writing
/// the form and its breakdown to `output` after each one. Commands that do
/// not parse are reported and skipped.
pub fn run<R: BufRead, W: Write>(
    form: &mut EstimateForm,
    opts: &RenderOptions,
    input: R,
    mut output: W,
) -> Result<()> {
    write!(output, "{}", render_inputs(form.inputs(), opts))?;
    write!(output, "{}", render_breakdown(form.breakdown(), opts))?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;

        let command = match line.parse::<FormCommand>() {
            Ok(command) => command,
            Err(err) => {
                tracing::debug!(line = line.as_str(), "rejected command");
                writeln!(output, "error: {}", err)?;
                continue;
            }
        };

        match form.apply(&command) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                writeln!(output, "error: {}", err)?;
                continue;
            }
        }

        if matches!(command, FormCommand::Show | FormCommand::Reset) {
            write!(output, "{}", render_inputs(form.inputs(), opts))?;
        }
        write!(output, "{}", render_breakdown(form.breakdown(), opts))?;
        output.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::CostInputs;

    fn run_lines(lines: &str) -> (EstimateForm, String) {
        let mut form = EstimateForm::default();
        let mut out = Vec::new();
        run(&mut form, &RenderOptions::default(), Cursor::new(lines), &mut out).unwrap();
        (form, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_session_updates() {
        let (form, out) = run_lines("item-count=3\ntoggle requires-modification\n");

        assert_eq!(form.inputs().item_count, 3.0);
        assert!(form.inputs().requires_modification);
        assert!(out.contains("| Total Cost               | EGP 106.88 |"));
        assert!(out.contains("| Total Cost               | EGP 156.88 |"));
    }

    #[test]
    fn test_session_stops_at_quit() {
        let (form, _) = run_lines("quit\nitem-count=9\n");

        assert_eq!(*form.inputs(), CostInputs::default());
    }

    #[test]
    fn test_session_reports_bad_lines() {
        let (form, out) = run_lines("colour=red\ntoggle print-time\nfilament-weight=10\n");

        assert!(out.contains("error: unknown field \"colour\""));
        assert!(out.contains("error: field print-time is not a checkbox"));
        assert_eq!(form.inputs().filament_weight_grams, 10.0);
    }
}
