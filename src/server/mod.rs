//! HTTP API for pricing print jobs.

pub mod context;
pub mod endpoints;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use dropshot::{ApiDescription, ConfigDropshot, HandlerTaskMode, ServerBuilder};
use slog::Drain;

use crate::{config::Config, server::context::Context};

/// Create an API description for the server.
pub fn create_api_description() -> Result<ApiDescription<Arc<Context>>> {
    fn register_endpoints(api: &mut ApiDescription<Arc<Context>>) -> Result<()> {
        api.register(endpoints::ping).map_err(|e| anyhow!("{}", e))?;
        api.register(endpoints::api_get_schema).map_err(|e| anyhow!("{}", e))?;
        api.register(endpoints::get_metrics).map_err(|e| anyhow!("{}", e))?;
        api.register(endpoints::get_estimate_defaults)
            .map_err(|e| anyhow!("{}", e))?;
        api.register(endpoints::estimate).map_err(|e| anyhow!("{}", e))?;
        api.register(endpoints::estimate_form).map_err(|e| anyhow!("{}", e))?;

        Ok(())
    }

    // Describe the API.
    let tag_config = serde_json::from_str(include_str!("../../openapi/tag-config.json"))?;
    let mut api = ApiDescription::new().tag_config(tag_config);

    register_endpoints(&mut api).map_err(|err| anyhow!("failed to register entrypoints: {}", err))?;

    Ok(api)
}

/// Get the OpenAPI specification for the server.
pub fn get_openapi(api: &mut ApiDescription<Arc<Context>>) -> Result<serde_json::Value> {
    let version = semver::Version::parse(clap::crate_version!())?;

    // Create the API schema.
    let mut definition = api.openapi("print-cost", version);
    definition
        .description("Itemized cost estimates for 3D print jobs.")
        .json()
        .map_err(|e| e.into())
}

/// Build the slog logger dropshot logs through.
pub fn create_logger(name: &str, json: bool) -> slog::Logger {
    if json {
        let drain = slog_json::Json::default(std::io::stderr()).fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        slog::Logger::root(drain, slog::o!("name" => name.to_owned()))
    } else {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        slog::Logger::root(drain, slog::o!("name" => name.to_owned()))
    }
}

/// Start serving on `cfg.server.bind`. The returned server runs until it
/// is closed or the process exits.
pub fn create_server(cfg: &Config, logger: slog::Logger) -> Result<(dropshot::HttpServer<Arc<Context>>, Arc<Context>)> {
    let mut api = create_api_description()?;
    let schema = get_openapi(&mut api)?;

    let config_dropshot = ConfigDropshot {
        bind_address: cfg.server.bind.parse()?,
        default_request_body_max_bytes: 64 * 1024,
        default_handler_task_mode: HandlerTaskMode::Detached,
        ..Default::default()
    };

    let dropshot_logger = logger.new(slog::o!("component" => "dropshot"));
    let api_context = Arc::new(Context::new(schema, logger, cfg.clone()));

    let server = ServerBuilder::new(api, api_context.clone(), dropshot_logger)
        .config(config_dropshot)
        .start()
        .map_err(|error| anyhow!("failed to create server: {}", error))?;

    Ok((server, api_context))
}

/// Serve until the server fails or the process is signalled.
pub async fn serve(cfg: &Config, logger: slog::Logger) -> Result<()> {
    let (server, _api_context) = create_server(cfg, logger)?;

    tracing::info!(bind_addr = server.local_addr().to_string(), "serving cost estimates");

    server.await.map_err(|error| anyhow!("server failed: {}", error))?;

    Ok(())
}
