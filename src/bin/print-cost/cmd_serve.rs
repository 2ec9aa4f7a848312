use super::Cli;
use anyhow::Result;
use print_cost::{config::Config, server};

pub async fn main(cli: &Cli, mut cfg: Config, bind: Option<&str>) -> Result<()> {
    if let Some(bind) = bind {
        cfg.server.bind = bind.to_owned();
    }

    tracing::info!(
        bind_addr = cfg.server.bind.as_str(),
        currency = cfg.currency.as_str(),
        "starting server"
    );

    let logger = server::create_logger("print-cost", cli.json_logs);
    server::serve(&cfg, logger).await
}
