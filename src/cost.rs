//! The cost model: a pure mapping from a print job's parameters to an
//! itemized breakdown of what the job costs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Flat fee charged once per job when the design has to be modified before
/// it can be printed.
pub const DESIGN_MODIFICATION_FEE: f64 = 50.0;

/// Everything needed to price a print job.
///
/// Counts are carried as `f64` alongside the rest of the numbers; they
/// arrive from the same numeric text fields and are never required to be
/// integral.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct CostInputs {
    /// Number of identical items printed.
    pub item_count: f64,

    /// Filament mass per item, in grams.
    pub filament_weight_grams: f64,

    /// Material price, per kilogram.
    pub filament_cost_per_kg: f64,

    /// Printer power draw, in watts.
    pub power_consumption_watts: f64,

    /// Energy price, per kilowatt-hour.
    pub electricity_rate_per_kwh: f64,

    /// Print duration per item, in hours.
    pub print_time_hours: f64,

    /// Manual color-change events per item.
    pub color_changes: f64,

    /// Operator time spent on each color change, in minutes.
    pub manual_color_change_minutes: f64,

    /// Labor rate, per hour.
    pub labor_cost_per_hour: f64,

    /// Acquisition cost of the printer.
    pub printer_cost: f64,

    /// Total expected duty hours over the printer's life.
    pub printer_lifespan_hours: f64,

    /// Amortize the printer's cost over the job.
    pub include_depreciation: bool,

    /// Charge the flat design-modification fee.
    pub requires_modification: bool,
}

impl Default for CostInputs {
    fn default() -> Self {
        CostInputs {
            item_count: 1.0,
            filament_weight_grams: 5.0,
            filament_cost_per_kg: 600.0,
            power_consumption_watts: 100.0,
            electricity_rate_per_kwh: 1.25,
            print_time_hours: 1.0,
            color_changes: 2.0,
            manual_color_change_minutes: 5.0,
            labor_cost_per_hour: 150.0,
            printer_cost: 15000.0,
            printer_lifespan_hours: 2000.0,
            include_depreciation: true,
            requires_modification: false,
        }
    }
}

impl CostInputs {
    /// Price this job. See [compute].
    pub fn compute(&self) -> CostBreakdown {
        compute(self)
    }
}

/// Itemized cost of a print job, in the caller's currency.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct CostBreakdown {
    /// Material used across all items.
    pub filament_cost: f64,

    /// Electricity used across all items.
    pub energy_cost: f64,

    /// Share of the printer's cost consumed by this job.
    pub machine_depreciation: f64,

    /// Operator time spent on manual color changes.
    pub color_change_cost: f64,

    /// Flat design-modification fee, if any.
    pub design_modification_cost: f64,

    /// Sum of the five components above.
    pub total_cost: f64,
}

/// One labelled row of a [CostBreakdown], in display order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineItem {
    /// Human readable label for the row.
    pub label: &'static str,

    /// Amount, unrounded.
    pub amount: f64,
}

impl CostBreakdown {
    /// The five components followed by the total.
    pub fn line_items(&self) -> [LineItem; 6] {
        [
            LineItem {
                label: "Filament Cost",
                amount: self.filament_cost,
            },
            LineItem {
                label: "Energy Cost",
                amount: self.energy_cost,
            },
            LineItem {
                label: "Machine Depreciation",
                amount: self.machine_depreciation,
            },
            LineItem {
                label: "Manual Color Change Cost",
                amount: self.color_change_cost,
            },
            LineItem {
                label: "Design Modification Cost",
                amount: self.design_modification_cost,
            },
            LineItem {
                label: "Total Cost",
                amount: self.total_cost,
            },
        ]
    }
}

/// Compute the cost breakdown for a job.
///
/// This never fails. A printer lifespan of zero hours yields zero
/// depreciation rather than an infinite or NaN amount. No rounding is
/// applied; that is left to whatever displays the result.
pub fn compute(inputs: &CostInputs) -> CostBreakdown {
    let items = inputs.item_count;

    let filament_cost = inputs.filament_weight_grams * (inputs.filament_cost_per_kg / 1000.0) * items;

    let energy_cost =
        (inputs.power_consumption_watts * inputs.print_time_hours / 1000.0) * inputs.electricity_rate_per_kwh * items;

    let machine_depreciation = if inputs.include_depreciation && inputs.printer_lifespan_hours != 0.0 {
        (inputs.printer_cost / inputs.printer_lifespan_hours) * inputs.print_time_hours * items
    } else {
        0.0
    };

    let color_change_cost =
        inputs.color_changes * (inputs.manual_color_change_minutes / 60.0) * inputs.labor_cost_per_hour * items;

    // Charged once per job, regardless of how many items are printed.
    let design_modification_cost = if inputs.requires_modification {
        DESIGN_MODIFICATION_FEE
    } else {
        0.0
    };

    let total_cost = filament_cost + energy_cost + machine_depreciation + color_change_cost + design_modification_cost;

    CostBreakdown {
        filament_cost,
        energy_cost,
        machine_depreciation,
        color_change_cost,
        design_modification_cost,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_default_job() {
        let breakdown = compute(&CostInputs::default());

        assert_close(breakdown.filament_cost, 3.0);
        assert_close(breakdown.energy_cost, 0.125);
        assert_close(breakdown.machine_depreciation, 7.5);
        assert_close(breakdown.color_change_cost, 25.0);
        assert_eq!(breakdown.design_modification_cost, 0.0);
        assert_close(breakdown.total_cost, 35.625);
    }

    #[test]
    fn test_item_count_scales_everything_but_the_fee() {
        let single = compute(&CostInputs {
            requires_modification: true,
            ..Default::default()
        });
        let triple = compute(&CostInputs {
            item_count: 3.0,
            requires_modification: true,
            ..Default::default()
        });

        assert_close(triple.filament_cost, single.filament_cost * 3.0);
        assert_close(triple.energy_cost, single.energy_cost * 3.0);
        assert_close(triple.machine_depreciation, single.machine_depreciation * 3.0);
        assert_close(triple.color_change_cost, single.color_change_cost * 3.0);
        assert_eq!(triple.design_modification_cost, DESIGN_MODIFICATION_FEE);
        assert_eq!(single.design_modification_cost, DESIGN_MODIFICATION_FEE);
    }

    #[test]
    fn test_three_items() {
        let breakdown = CostInputs {
            item_count: 3.0,
            ..Default::default()
        }
        .compute();

        assert_close(breakdown.filament_cost, 9.0);
        assert_close(breakdown.energy_cost, 0.375);
        assert_close(breakdown.machine_depreciation, 22.5);
        assert_close(breakdown.color_change_cost, 75.0);
        assert_eq!(breakdown.design_modification_cost, 0.0);
        assert_close(breakdown.total_cost, 106.875);
    }

    #[test]
    fn test_depreciation_disabled() {
        for (printer_cost, lifespan, hours) in [(15000.0, 2000.0, 1.0), (1e9, 1.0, 500.0), (0.0, 0.0, 0.0)] {
            let breakdown = compute(&CostInputs {
                printer_cost,
                printer_lifespan_hours: lifespan,
                print_time_hours: hours,
                include_depreciation: false,
                ..Default::default()
            });
            assert_eq!(breakdown.machine_depreciation, 0.0);
        }
    }

    #[test]
    fn test_zero_lifespan_is_finite() {
        let breakdown = compute(&CostInputs {
            printer_lifespan_hours: 0.0,
            include_depreciation: true,
            ..Default::default()
        });

        assert_eq!(breakdown.machine_depreciation, 0.0);
        assert!(breakdown.total_cost.is_finite());
        assert_close(breakdown.total_cost, 28.125);
    }

    #[test]
    fn test_modification_fee() {
        let without = compute(&CostInputs::default());
        let with = compute(&CostInputs {
            requires_modification: true,
            ..Default::default()
        });

        assert_eq!(without.design_modification_cost, 0.0);
        assert_eq!(with.design_modification_cost, 50.0);
        assert_close(with.total_cost - without.total_cost, 50.0);
    }

    #[test]
    fn test_total_is_exact_sum() {
        let inputs = CostInputs {
            item_count: 7.0,
            filament_weight_grams: 123.4,
            filament_cost_per_kg: 871.3,
            power_consumption_watts: 333.0,
            electricity_rate_per_kwh: 0.17,
            print_time_hours: 9.75,
            color_changes: 4.0,
            manual_color_change_minutes: 2.5,
            labor_cost_per_hour: 42.0,
            printer_cost: 799.0,
            printer_lifespan_hours: 5000.0,
            include_depreciation: true,
            requires_modification: true,
        };
        let b = compute(&inputs);

        assert_eq!(
            b.total_cost,
            b.filament_cost + b.energy_cost + b.machine_depreciation + b.color_change_cost + b.design_modification_cost
        );
    }

    #[test]
    fn test_compute_is_idempotent() {
        let inputs = CostInputs {
            filament_cost_per_kg: 1.0 / 3.0,
            electricity_rate_per_kwh: 0.1,
            ..Default::default()
        };
        let first = compute(&inputs);
        let second = compute(&inputs);

        for (a, b) in first.line_items().iter().zip(second.line_items().iter()) {
            assert_eq!(a.amount.to_bits(), b.amount.to_bits());
        }
    }

    #[test]
    fn test_zero_inputs() {
        let inputs = CostInputs {
            item_count: 0.0,
            filament_weight_grams: 0.0,
            filament_cost_per_kg: 0.0,
            power_consumption_watts: 0.0,
            electricity_rate_per_kwh: 0.0,
            print_time_hours: 0.0,
            color_changes: 0.0,
            manual_color_change_minutes: 0.0,
            labor_cost_per_hour: 0.0,
            printer_cost: 0.0,
            printer_lifespan_hours: 0.0,
            include_depreciation: true,
            requires_modification: false,
        };

        assert_eq!(compute(&inputs).total_cost, 0.0);
    }

    #[test]
    fn test_line_items_order() {
        let labels: Vec<_> = compute(&CostInputs::default())
            .line_items()
            .iter()
            .map(|item| item.label)
            .collect();

        assert_eq!(
            labels,
            vec![
                "Filament Cost",
                "Energy Cost",
                "Machine Depreciation",
                "Manual Color Change Cost",
                "Design Modification Cost",
                "Total Cost",
            ]
        );
    }

    #[test]
    fn test_missing_json_fields_take_defaults() {
        let inputs: CostInputs = serde_json::from_str(r#"{"item_count": 3}"#).unwrap();

        assert_eq!(
            inputs,
            CostInputs {
                item_count: 3.0,
                ..Default::default()
            }
        );
    }
}
