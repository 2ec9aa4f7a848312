//! Host-side state for an estimate that is edited one field at a time.
//!
//! The form owns a full [CostInputs] snapshot. Every edit goes through the
//! same coercion as any other user text and the breakdown is recomputed
//! immediately, so [EstimateForm::breakdown] always matches
//! [EstimateForm::inputs].

use parse_display::{Display, FromStr};

use crate::{
    input::{coerce_flag, coerce_number},
    CostBreakdown, CostInputs,
};

/// An editable field of the estimate form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, FromStr)]
#[display(style = "kebab-case")]
pub enum Field {
    /// Number of identical items printed.
    ItemCount,
    /// Filament mass per item.
    FilamentWeight,
    /// Material price per kilogram.
    FilamentCostPerKg,
    /// Printer power draw.
    PowerConsumption,
    /// Energy price per kilowatt-hour.
    ElectricityRate,
    /// Print duration per item.
    PrintTime,
    /// Manual color-change events per item.
    ColorChanges,
    /// Operator minutes per color change.
    ColorChangeMinutes,
    /// Labor rate per hour.
    LaborCost,
    /// Acquisition cost of the printer.
    PrinterCost,
    /// Expected duty hours over the printer's life.
    PrinterLifespan,
    /// Amortize the printer over the job.
    IncludeDepreciation,
    /// Charge the design-modification fee.
    RequiresModification,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 13] = [
        Field::ItemCount,
        Field::FilamentWeight,
        Field::FilamentCostPerKg,
        Field::PowerConsumption,
        Field::ElectricityRate,
        Field::PrintTime,
        Field::ColorChanges,
        Field::ColorChangeMinutes,
        Field::LaborCost,
        Field::PrinterCost,
        Field::PrinterLifespan,
        Field::RequiresModification,
        Field::IncludeDepreciation,
    ];

    /// Label shown next to the field. Currency amounts are labelled with
    /// `currency`.
    pub fn label(&self, currency: &str) -> String {
        match self {
            Field::ItemCount => "Number of Items".to_owned(),
            Field::FilamentWeight => "Filament Weight (g)".to_owned(),
            Field::FilamentCostPerKg => format!("Filament Cost per Kg ({currency})"),
            Field::PowerConsumption => "Printer Power (W)".to_owned(),
            Field::ElectricityRate => format!("Electricity Rate ({currency}/kWh)"),
            Field::PrintTime => "Print Time (hr)".to_owned(),
            Field::ColorChanges => "Color Changes".to_owned(),
            Field::ColorChangeMinutes => "Manual Color Change Time (min)".to_owned(),
            Field::LaborCost => format!("Labor Cost ({currency}/hr)"),
            Field::PrinterCost => format!("Printer Cost ({currency})"),
            Field::PrinterLifespan => "Printer Lifespan (hrs)".to_owned(),
            Field::IncludeDepreciation => "Include Printer Depreciation?".to_owned(),
            Field::RequiresModification => "Requires Design Modification?".to_owned(),
        }
    }

    /// Whether the field is a checkbox rather than a number.
    pub fn is_flag(&self) -> bool {
        matches!(self, Field::IncludeDepreciation | Field::RequiresModification)
    }

    /// Current value of this field, as the form would display it.
    pub fn value(&self, inputs: &CostInputs) -> String {
        match (self.number(inputs), self.flag(inputs)) {
            (Some(n), _) => n.to_string(),
            (None, Some(checked)) => checked.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Checkbox state, or `None` for numeric fields.
    pub fn flag(&self, inputs: &CostInputs) -> Option<bool> {
        match self {
            Field::IncludeDepreciation => Some(inputs.include_depreciation),
            Field::RequiresModification => Some(inputs.requires_modification),
            _ => None,
        }
    }

    fn number(&self, inputs: &CostInputs) -> Option<f64> {
        Some(match self {
            Field::ItemCount => inputs.item_count,
            Field::FilamentWeight => inputs.filament_weight_grams,
            Field::FilamentCostPerKg => inputs.filament_cost_per_kg,
            Field::PowerConsumption => inputs.power_consumption_watts,
            Field::ElectricityRate => inputs.electricity_rate_per_kwh,
            Field::PrintTime => inputs.print_time_hours,
            Field::ColorChanges => inputs.color_changes,
            Field::ColorChangeMinutes => inputs.manual_color_change_minutes,
            Field::LaborCost => inputs.labor_cost_per_hour,
            Field::PrinterCost => inputs.printer_cost,
            Field::PrinterLifespan => inputs.printer_lifespan_hours,
            Field::IncludeDepreciation | Field::RequiresModification => return None,
        })
    }

    fn number_mut<'a>(&self, inputs: &'a mut CostInputs) -> Option<&'a mut f64> {
        Some(match self {
            Field::ItemCount => &mut inputs.item_count,
            Field::FilamentWeight => &mut inputs.filament_weight_grams,
            Field::FilamentCostPerKg => &mut inputs.filament_cost_per_kg,
            Field::PowerConsumption => &mut inputs.power_consumption_watts,
            Field::ElectricityRate => &mut inputs.electricity_rate_per_kwh,
            Field::PrintTime => &mut inputs.print_time_hours,
            Field::ColorChanges => &mut inputs.color_changes,
            Field::ColorChangeMinutes => &mut inputs.manual_color_change_minutes,
            Field::LaborCost => &mut inputs.labor_cost_per_hour,
            Field::PrinterCost => &mut inputs.printer_cost,
            Field::PrinterLifespan => &mut inputs.printer_lifespan_hours,
            Field::IncludeDepreciation | Field::RequiresModification => return None,
        })
    }

    fn flag_mut<'a>(&self, inputs: &'a mut CostInputs) -> Option<&'a mut bool> {
        match self {
            Field::IncludeDepreciation => Some(&mut inputs.include_depreciation),
            Field::RequiresModification => Some(&mut inputs.requires_modification),
            _ => None,
        }
    }
}

/// Problems understanding an edit sent to the form.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FormError {
    /// No field goes by this name.
    #[error("unknown field {0:?}")]
    UnknownField(String),

    /// Only checkbox fields can be toggled.
    #[error("field {0} is not a checkbox")]
    NotAFlag(Field),

    /// The line is not a command the form understands.
    #[error("could not understand {0:?}; expected `field=value`, `toggle field`, `show`, `reset` or `quit`")]
    MalformedCommand(String),
}

fn parse_field(name: &str) -> Result<Field, FormError> {
    let name = name.trim();
    name.parse().map_err(|_| FormError::UnknownField(name.to_owned()))
}

/// A single edit or request, as read from a line of user text.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    /// Replace a field's value with the given raw text.
    Set(Field, String),
    /// Flip a checkbox field.
    Toggle(Field),
    /// Go back to the starting inputs.
    Reset,
    /// Show the current estimate without changing anything.
    Show,
    /// Stop editing.
    Quit,
}

impl std::str::FromStr for FormCommand {
    type Err = FormError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();

        match line {
            "show" | "" => return Ok(FormCommand::Show),
            "reset" => return Ok(FormCommand::Reset),
            "quit" | "exit" => return Ok(FormCommand::Quit),
            _ => {}
        }

        if let Some(name) = line.strip_prefix("toggle ") {
            return Ok(FormCommand::Toggle(parse_field(name)?));
        }

        if let Some((name, value)) = line.split_once('=') {
            return Ok(FormCommand::Set(parse_field(name)?, value.trim().to_owned()));
        }

        Err(FormError::MalformedCommand(line.to_owned()))
    }
}

/// An estimate being edited, with its breakdown kept current.
#[derive(Debug, Copy, Clone)]
pub struct EstimateForm {
    initial: CostInputs,
    inputs: CostInputs,
    breakdown: CostBreakdown,
}

impl EstimateForm {
    /// Start editing from `inputs`. [EstimateForm::reset] returns here.
    pub fn new(inputs: CostInputs) -> Self {
        Self {
            initial: inputs,
            inputs,
            breakdown: inputs.compute(),
        }
    }

    /// Current inputs.
    pub fn inputs(&self) -> &CostInputs {
        &self.inputs
    }

    /// Breakdown of the current inputs.
    pub fn breakdown(&self) -> &CostBreakdown {
        &self.breakdown
    }

    /// Replace one field with raw user text and recompute.
    pub fn set(&mut self, field: Field, raw: &str) -> &CostBreakdown {
        if let Some(slot) = field.number_mut(&mut self.inputs) {
            *slot = coerce_number(raw);
        } else if let Some(slot) = field.flag_mut(&mut self.inputs) {
            *slot = coerce_flag(raw);
        }
        self.recompute()
    }

    /// Flip a checkbox field and recompute.
    pub fn toggle(&mut self, field: Field) -> Result<&CostBreakdown, FormError> {
        let slot = field.flag_mut(&mut self.inputs).ok_or(FormError::NotAFlag(field))?;
        *slot = !*slot;
        Ok(self.recompute())
    }

    /// Restore the starting inputs.
    pub fn reset(&mut self) -> &CostBreakdown {
        self.inputs = self.initial;
        self.recompute()
    }

    /// Apply a parsed command. Returns `false` once editing should stop.
    pub fn apply(&mut self, command: &FormCommand) -> Result<bool, FormError> {
        match command {
            FormCommand::Set(field, raw) => {
                self.set(*field, raw);
            }
            FormCommand::Toggle(field) => {
                self.toggle(*field)?;
            }
            FormCommand::Reset => {
                self.reset();
            }
            FormCommand::Show => {}
            FormCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn recompute(&mut self) -> &CostBreakdown {
        self.breakdown = self.inputs.compute();
        tracing::debug!(total = self.breakdown.total_cost, "recomputed estimate");
        &self.breakdown
    }
}

impl Default for EstimateForm {
    fn default() -> Self {
        Self::new(CostInputs::default())
    }
}
