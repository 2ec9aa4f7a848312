//! Request handlers.

use dropshot::{endpoint, Body, HttpError, HttpResponseOk, RequestContext, TypedBody};
use http::{Response, StatusCode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::context::{Context, EstimateSource};
use crate::{input::RawCostInputs, render::format_amount, CostBreakdown, CostInputs};

/// Return the OpenAPI schema in JSON format.
#[endpoint {
    method = GET,
    path = "/",
    tags = ["meta"],
}]
pub async fn api_get_schema(
    rqctx: RequestContext<Arc<Context>>,
) -> Result<HttpResponseOk<serde_json::Value>, HttpError> {
    Ok(HttpResponseOk(rqctx.context().schema.clone()))
}

/// The response from the `/ping` endpoint.
#[derive(Deserialize, Debug, JsonSchema, Serialize)]
pub struct Pong {
    /// The pong response.
    pub message: String,
}

/** Return pong. */
#[endpoint {
    method = GET,
    path = "/ping",
    tags = ["meta"],
}]
pub async fn ping(_rqctx: RequestContext<Arc<Context>>) -> Result<HttpResponseOk<Pong>, HttpError> {
    Ok(HttpResponseOk(Pong {
        message: "pong".to_string(),
    }))
}

/// Export estimate counters in the Prometheus text format.
#[endpoint {
    method = GET,
    path = "/metrics",
    tags = ["meta"],
}]
pub async fn get_metrics(rqctx: RequestContext<Arc<Context>>) -> Result<Response<Body>, HttpError> {
    let text = rqctx.context().metrics.encode().map_err(|e| {
        tracing::warn!(error = format!("{:?}", e), "failed to encode metrics");
        HttpError::for_internal_error(format!("{:?}", e))
    })?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(
            http::header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )
        .body(Body::from(text))?)
}

/// One formatted row of an estimate, ready for display.
#[derive(Deserialize, Debug, Clone, JsonSchema, Serialize)]
pub struct FormattedLine {
    /// Row label, e.g. `Filament Cost`.
    pub label: String,

    /// Amount with currency code and two fraction digits, e.g. `EGP 3.00`.
    pub amount: String,
}

/// The priced job.
#[derive(Deserialize, Debug, Clone, JsonSchema, Serialize)]
pub struct Estimate {
    /// Currency code the amounts are in.
    pub currency: String,

    /// Inputs the estimate was computed from, after coercion and defaults.
    pub inputs: CostInputs,

    /// Unrounded cost components and total.
    pub breakdown: CostBreakdown,

    /// The breakdown as six display rows, total last.
    pub formatted: Vec<FormattedLine>,
}

impl Estimate {
    /// Bundle a computed breakdown with its display rows.
    pub fn new(currency: &str, inputs: CostInputs, breakdown: CostBreakdown) -> Self {
        let formatted = breakdown
            .line_items()
            .iter()
            .map(|item| FormattedLine {
                label: item.label.to_owned(),
                amount: format_amount(currency, item.amount),
            })
            .collect();

        Estimate {
            currency: currency.to_owned(),
            inputs,
            breakdown,
            formatted,
        }
    }
}

/// Return the inputs an estimate starts from when a field is left out.
#[endpoint {
    method = GET,
    path = "/estimate/defaults",
    tags = ["estimate"],
}]
pub async fn get_estimate_defaults(
    rqctx: RequestContext<Arc<Context>>,
) -> Result<HttpResponseOk<CostInputs>, HttpError> {
    Ok(HttpResponseOk(rqctx.context().config.defaults))
}

/** Price a print job. Fields left out take the configured defaults. */
#[endpoint {
    method = POST,
    path = "/estimate",
    tags = ["estimate"],
}]
pub async fn estimate(
    rqctx: RequestContext<Arc<Context>>,
    body: TypedBody<serde_json::Map<String, serde_json::Value>>,
) -> Result<HttpResponseOk<Estimate>, HttpError> {
    let ctx = rqctx.context();
    let inputs = merge_over_defaults(&ctx.config.defaults, body.into_inner())?;

    let breakdown = ctx.estimate(&inputs, EstimateSource::Json);
    Ok(HttpResponseOk(Estimate::new(&ctx.config.currency, inputs, breakdown)))
}

/// Lay the fields present in `body` over `defaults`.
fn merge_over_defaults(
    defaults: &CostInputs,
    body: serde_json::Map<String, serde_json::Value>,
) -> Result<CostInputs, HttpError> {
    let mut merged = match serde_json::to_value(defaults) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => return Err(HttpError::for_internal_error("defaults are not an object".to_string())),
    };
    merged.extend(body);

    serde_json::from_value(serde_json::Value::Object(merged)).map_err(|e| {
        tracing::info!(error = format!("{:?}", e), "rejecting estimate inputs");
        HttpError::for_bad_request(None, format!("invalid cost inputs: {}", e))
    })
}

/** Price a print job from raw form text. Text that is not a number counts as zero. */
#[endpoint {
    method = POST,
    path = "/estimate/form",
    tags = ["estimate"],
}]
pub async fn estimate_form(
    rqctx: RequestContext<Arc<Context>>,
    body: TypedBody<RawCostInputs>,
) -> Result<HttpResponseOk<Estimate>, HttpError> {
    let ctx = rqctx.context();
    let inputs = body.into_inner().into_inputs(ctx.config.defaults);

    let breakdown = ctx.estimate(&inputs, EstimateSource::Form);
    Ok(HttpResponseOk(Estimate::new(&ctx.config.currency, inputs, breakdown)))
}
