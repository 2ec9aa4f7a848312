//! Coercion of raw user text into cost inputs.
//!
//! Nothing here fails: text that does not start with a number becomes `0`,
//! and anything that is not recognizably "checked" is `false`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::CostInputs;

/// Coerce free-form text into a number.
///
/// Leading whitespace is skipped and the longest prefix that reads as a
/// decimal number is used, so `"12abc"` is `12` and `" .5"` is `0.5`. Text
/// without a numeric prefix, as well as anything that would not be finite,
/// is `0`. So is `"-0"`: zero never carries a sign.
pub fn coerce_number(text: &str) -> f64 {
    let text = text.trim_start();
    let prefix = &text[..numeric_prefix_len(text)];

    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() => value + 0.0,
        _ => 0.0,
    }
}

/// Coerce free-form text into a checkbox state.
pub fn coerce_flag(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "yes" | "1" | "checked"
    )
}

/// Length, in bytes, of the longest leading `[+-]digits[.digits][e[+-]digits]`
/// run of `text`. Zero if there are no mantissa digits at all.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    end = digits_from(end);
    let mut mantissa_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    end
}

/// Cost inputs exactly as a user typed them. Absent fields keep whatever
/// default they are applied over.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct RawCostInputs {
    /// Number of identical items printed.
    pub item_count: Option<String>,
    /// Filament mass per item, in grams.
    pub filament_weight_grams: Option<String>,
    /// Material price, per kilogram.
    pub filament_cost_per_kg: Option<String>,
    /// Printer power draw, in watts.
    pub power_consumption_watts: Option<String>,
    /// Energy price, per kilowatt-hour.
    pub electricity_rate_per_kwh: Option<String>,
    /// Print duration per item, in hours.
    pub print_time_hours: Option<String>,
    /// Manual color-change events per item.
    pub color_changes: Option<String>,
    /// Operator time per color change, in minutes.
    pub manual_color_change_minutes: Option<String>,
    /// Labor rate, per hour.
    pub labor_cost_per_hour: Option<String>,
    /// Acquisition cost of the printer.
    pub printer_cost: Option<String>,
    /// Total expected duty hours over the printer's life.
    pub printer_lifespan_hours: Option<String>,
    /// Amortize the printer's cost over the job.
    pub include_depreciation: Option<String>,
    /// Charge the flat design-modification fee.
    pub requires_modification: Option<String>,
}

impl RawCostInputs {
    /// Coerce every present field and lay the result over `defaults`.
    pub fn into_inputs(self, defaults: CostInputs) -> CostInputs {
        let number = |raw: Option<String>, fallback: f64| raw.as_deref().map(coerce_number).unwrap_or(fallback);
        let flag = |raw: Option<String>, fallback: bool| raw.as_deref().map(coerce_flag).unwrap_or(fallback);

        CostInputs {
            item_count: number(self.item_count, defaults.item_count),
            filament_weight_grams: number(self.filament_weight_grams, defaults.filament_weight_grams),
            filament_cost_per_kg: number(self.filament_cost_per_kg, defaults.filament_cost_per_kg),
            power_consumption_watts: number(self.power_consumption_watts, defaults.power_consumption_watts),
            electricity_rate_per_kwh: number(self.electricity_rate_per_kwh, defaults.electricity_rate_per_kwh),
            print_time_hours: number(self.print_time_hours, defaults.print_time_hours),
            color_changes: number(self.color_changes, defaults.color_changes),
            manual_color_change_minutes: number(
                self.manual_color_change_minutes,
                defaults.manual_color_change_minutes,
            ),
            labor_cost_per_hour: number(self.labor_cost_per_hour, defaults.labor_cost_per_hour),
            printer_cost: number(self.printer_cost, defaults.printer_cost),
            printer_lifespan_hours: number(self.printer_lifespan_hours, defaults.printer_lifespan_hours),
            include_depreciation: flag(self.include_depreciation, defaults.include_depreciation),
            requires_modification: flag(self.requires_modification, defaults.requires_modification),
        }
    }
}
