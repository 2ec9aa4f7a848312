//! Text rendering of estimates: the breakdown table, the input form, and
//! the light/dark theme they are drawn in.

use comfy_table::{presets::ASCII_FULL, Attribute, Cell, CellAlignment, Color, Table, TableComponent};
use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

use crate::{form::Field, CostBreakdown, CostInputs};

/// Currency code used when nothing else is configured.
pub const DEFAULT_CURRENCY: &str = "EGP";

/// Display theme. Has no bearing on any amount, only on how it is drawn.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Display, FromStr, Deserialize, Serialize)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Dark text on a light background.
    #[default]
    Light,
    /// Light text on a dark background.
    Dark,
}

impl Theme {
    /// Work out the host terminal's theme.
    ///
    /// `PRINT_COST_THEME` wins if it names a theme; otherwise the background
    /// color from `COLORFGBG` is used, falling back to [Theme::Light].
    pub fn detect() -> Self {
        Self::from_env_values(
            std::env::var("PRINT_COST_THEME").ok().as_deref(),
            std::env::var("COLORFGBG").ok().as_deref(),
        )
    }

    /// [Theme::detect], with the environment passed in.
    pub fn from_env_values(explicit: Option<&str>, colorfgbg: Option<&str>) -> Self {
        if let Some(theme) = explicit.and_then(|t| t.trim().to_ascii_lowercase().parse().ok()) {
            return theme;
        }

        // `fg;bg` or `fg;default;bg`; the background is always last.
        let background = colorfgbg
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());

        match background {
            Some(0..=6) | Some(8) => Theme::Dark,
            _ => Theme::Light,
        }
    }

    fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                heading: Color::DarkBlue,
                text: Color::Black,
                total: Color::Black,
            },
            Theme::Dark => Palette {
                heading: Color::Cyan,
                text: Color::White,
                total: Color::White,
            },
        }
    }
}

struct Palette {
    heading: Color,
    text: Color,
    total: Color,
}

/// How to draw a table.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Currency code prefixed to every amount.
    pub currency: String,

    /// Theme the colors are picked from.
    pub theme: Theme,

    /// Emit ANSI colors. Without them output is identical for every theme.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_owned(),
            theme: Theme::default(),
            color: false,
        }
    }
}

/// Format an amount as `<currency> <value>` with two fraction digits.
///
/// The exact binary value is rounded, so `0.015` (stored just below the
/// midpoint) shows as `0.01`. Values sitting exactly halfway between two
/// cents round away from zero, so `0.125` shows as `0.13`. Negative zero
/// shows as `0.00`.
pub fn format_amount(currency: &str, value: f64) -> String {
    let magnitude = value.abs();

    // Only an odd number of eighths lands exactly on a half cent.
    let eighths = magnitude * 8.0;
    let digits = if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let cents = (magnitude * 100.0 + 0.5).floor();
        format!("{:.2}", cents / 100.0)
    } else {
        format!("{magnitude:.2}")
    };

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{currency} {sign}{digits}")
}

/// Render the cost breakdown table.
pub fn render_breakdown(breakdown: &CostBreakdown, opts: &RenderOptions) -> String {
    let rows: Vec<(String, String)> = breakdown
        .line_items()
        .iter()
        .map(|item| (item.label.to_owned(), format_amount(&opts.currency, item.amount)))
        .collect();

    table(["Cost Breakdown", "Amount"], &rows, true, opts)
}

/// Render the form's current inputs.
pub fn render_inputs(inputs: &CostInputs, opts: &RenderOptions) -> String {
    let rows: Vec<(String, String)> = Field::ALL
        .iter()
        .map(|field| {
            let value = match field.flag(inputs) {
                Some(true) => "[x]".to_owned(),
                Some(false) => "[ ]".to_owned(),
                None => field.value(inputs),
            };
            (field.label(&opts.currency), value)
        })
        .collect();

    table(["Inputs", "Value"], &rows, false, opts)
}

/// Two column table with the values right aligned. With `total` set the
/// last row is emphasized.
fn table(header: [&str; 2], rows: &[(String, String)], total: bool, opts: &RenderOptions) -> String {
    let palette = opts.theme.palette();

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_style(TableComponent::MiddleHeaderIntersections, '+')
        .remove_style(TableComponent::HorizontalLines)
        .remove_style(TableComponent::MiddleIntersections)
        .remove_style(TableComponent::LeftBorderIntersections)
        .remove_style(TableComponent::RightBorderIntersections);

    if opts.color {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    let style = |cell: Cell, color: Color, bold: bool| {
        if !opts.color {
            return cell;
        }
        let cell = cell.fg(color);
        if bold {
            cell.add_attribute(Attribute::Bold)
        } else {
            cell
        }
    };

    table.set_header(vec![
        style(Cell::new(header[0]), palette.heading, true),
        style(Cell::new(header[1]).set_alignment(CellAlignment::Right), palette.heading, true),
    ]);

    let last = rows.len().saturating_sub(1);
    for (i, (label, value)) in rows.iter().enumerate() {
        let emphasize = total && i == last;
        let color = if emphasize { palette.total } else { palette.text };
        table.add_row(vec![
            style(Cell::new(label), color, emphasize),
            style(Cell::new(value).set_alignment(CellAlignment::Right), color, emphasize),
        ]);
    }

    format!("{table}\n")
}
