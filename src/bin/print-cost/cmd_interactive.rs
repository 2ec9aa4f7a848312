use anyhow::Result;
use print_cost::{config::Config, form::EstimateForm, render::RenderOptions, session};

pub fn main(cfg: &Config, color: bool) -> Result<()> {
    let opts = RenderOptions {
        currency: cfg.currency.clone(),
        theme: cfg.theme(),
        color,
    };
    tracing::info!(theme = %opts.theme, "editing estimate; `field=value`, `toggle field`, `show`, `reset`, `quit`");

    let mut form = EstimateForm::new(cfg.defaults);
    session::run(&mut form, &opts, std::io::stdin().lock(), std::io::stdout().lock())
}
