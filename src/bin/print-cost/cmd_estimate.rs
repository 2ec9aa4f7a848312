use anyhow::Result;
use clap::Args;
use print_cost::{
    config::Config,
    input::RawCostInputs,
    render::{render_breakdown, RenderOptions},
    server::endpoints::Estimate,
};

/// Job parameters. Each is read as text the same way the form reads it:
/// anything that is not a number counts as zero. Parameters left out take
/// the configured defaults.
#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Number of identical items printed.
    #[arg(long)]
    items: Option<String>,

    /// Filament mass per item, in grams.
    #[arg(long)]
    filament_weight: Option<String>,

    /// Material price per kilogram.
    #[arg(long)]
    filament_cost_per_kg: Option<String>,

    /// Printer power draw, in watts.
    #[arg(long)]
    power: Option<String>,

    /// Energy price per kilowatt-hour.
    #[arg(long)]
    electricity_rate: Option<String>,

    /// Print duration per item, in hours.
    #[arg(long)]
    print_time: Option<String>,

    /// Manual color changes per item.
    #[arg(long)]
    color_changes: Option<String>,

    /// Operator minutes per color change.
    #[arg(long)]
    color_change_minutes: Option<String>,

    /// Labor rate per hour.
    #[arg(long)]
    labor_cost: Option<String>,

    /// Acquisition cost of the printer.
    #[arg(long)]
    printer_cost: Option<String>,

    /// Expected duty hours over the printer's life.
    #[arg(long)]
    printer_lifespan: Option<String>,

    /// Amortize the printer's cost over the job [true, false].
    #[arg(long)]
    depreciation: Option<String>,

    /// Charge the flat design-modification fee [true, false].
    #[arg(long)]
    modification: Option<String>,

    /// Print the estimate as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Draw the table without ANSI colors.
    #[arg(long)]
    no_color: bool,
}

impl EstimateArgs {
    fn raw_inputs(&self) -> RawCostInputs {
        RawCostInputs {
            item_count: self.items.clone(),
            filament_weight_grams: self.filament_weight.clone(),
            filament_cost_per_kg: self.filament_cost_per_kg.clone(),
            power_consumption_watts: self.power.clone(),
            electricity_rate_per_kwh: self.electricity_rate.clone(),
            print_time_hours: self.print_time.clone(),
            color_changes: self.color_changes.clone(),
            manual_color_change_minutes: self.color_change_minutes.clone(),
            labor_cost_per_hour: self.labor_cost.clone(),
            printer_cost: self.printer_cost.clone(),
            printer_lifespan_hours: self.printer_lifespan.clone(),
            include_depreciation: self.depreciation.clone(),
            requires_modification: self.modification.clone(),
        }
    }
}

pub fn main(cfg: &Config, args: &EstimateArgs) -> Result<()> {
    let inputs = args.raw_inputs().into_inputs(cfg.defaults);
    let breakdown = inputs.compute();
    tracing::debug!(total = breakdown.total_cost, "computed estimate");

    if args.json {
        let estimate = Estimate::new(&cfg.currency, inputs, breakdown);
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    let opts = RenderOptions {
        currency: cfg.currency.clone(),
        theme: cfg.theme(),
        color: !args.no_color,
    };
    print!("{}", render_breakdown(&breakdown, &opts));

    Ok(())
}
