use std::{collections::BTreeMap, sync::Arc};

use anyhow::{Context, Result};
use expectorate::assert_contents;
use pretty_assertions::assert_eq;
use test_context::{test_context, AsyncTestContext};
use testresult::TestResult;

use crate::{config::Config, server::endpoints::Estimate, CostInputs};

struct ServerContext {
    config: Config,
    server: dropshot::HttpServer<Arc<crate::server::context::Context>>,
    client: reqwest::Client,
}

impl ServerContext {
    pub async fn new() -> Result<Self> {
        // Find an unused port.
        let port = portpicker::pick_unused_port().ok_or_else(|| anyhow::anyhow!("no port available"))?;
        let mut config = Config::default();
        config.server.bind = format!("127.0.0.1:{}", port);

        let (server, _context) = crate::server::create_server(&config, crate::server::create_logger("test", false))?;

        Ok(ServerContext {
            config,
            server,
            client: reqwest::Client::new(),
        })
    }

    pub async fn stop(self) -> Result<()> {
        // Stop the server.
        self.server
            .close()
            .await
            .map_err(|e| anyhow::anyhow!("closing the server failed: {}", e))
    }

    pub fn get_url(&self, path: &str) -> String {
        format!("http://{}/{}", self.config.server.bind, path.trim_start_matches('/'))
    }
}

impl AsyncTestContext for ServerContext {
    async fn setup() -> Self {
        ServerContext::new().await.unwrap()
    }

    async fn teardown(self) {
        self.stop().await.unwrap();
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[test]
fn test_openapi() -> TestResult {
    let mut api = crate::server::create_api_description()?;
    let schema = crate::server::get_openapi(&mut api)?;

    let spec: openapiv3::OpenAPI = serde_json::from_value(schema).expect("schema was not valid OpenAPI");

    assert_eq!(spec.openapi, "3.0.3");
    assert_eq!(spec.info.title, "print-cost");
    assert_eq!(spec.info.version, "0.1.0");

    // Spot check a couple of items.
    assert!(!spec.paths.paths.is_empty());
    assert!(spec.paths.paths.get("/ping").is_some());
    assert!(spec.paths.paths.get("/estimate").is_some());

    // Construct a string that helps us identify the organization of tags and
    // operations.
    let mut ops_by_tag = BTreeMap::<String, Vec<(String, String)>>::new();
    for (path, _, op) in spec.operations() {
        // Make sure each operation has exactly one tag.
        assert_eq!(
            op.tags.len(),
            1,
            "operation '{}' has {} tags rather than 1",
            op.operation_id.as_ref().context("missing operation_id")?,
            op.tags.len()
        );

        ops_by_tag
            .entry(op.tags.first().context("no tags")?.to_string())
            .or_default()
            .push((
                op.operation_id.as_ref().context("missing operation_id")?.to_string(),
                path.to_string(),
            ));
    }

    let mut tags = String::new();
    for (tag, mut ops) in ops_by_tag {
        ops.sort();
        tags.push_str(&format!(r#"API operations found with tag "{tag}""#));
        tags.push_str(&format!("\n{:40} {}\n", "OPERATION ID", "URL PATH"));
        for (operation_id, path) in ops {
            tags.push_str(&format!("{operation_id:40} {path}\n"));
        }
        tags.push('\n');
    }

    // When this fails, verify that operations on which you're adding,
    // renaming, or changing the tags are what you intend.
    assert_contents("openapi/api-tags.txt", &tags);

    Ok(())
}

#[test_context(ServerContext)]
#[tokio::test]
async fn test_root(ctx: &mut ServerContext) -> TestResult {
    let response = ctx.client.get(ctx.get_url("")).send().await?;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let text = response.text().await?;
    let expected = r#""components":{""#;
    if !text.contains(expected) {
        assert_eq!(text, expected);
    }

    Ok(())
}

#[test_context(ServerContext)]
#[tokio::test]
async fn test_ping(ctx: &mut ServerContext) -> TestResult {
    let response = ctx.client.get(ctx.get_url("ping")).send().await?;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let text = response.text().await?;
    assert_eq!(text, r#"{"message":"pong"}"#);

    Ok(())
}

#[test_context(ServerContext)]
#[tokio::test]
async fn test_estimate_defaults(ctx: &mut ServerContext) -> TestResult {
    let response = ctx.client.get(ctx.get_url("estimate/defaults")).send().await?;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let inputs: CostInputs = response.json().await?;
    assert_eq!(inputs, CostInputs::default());

    Ok(())
}

#[test_context(ServerContext)]
#[tokio::test]
async fn test_estimate(ctx: &mut ServerContext) -> TestResult {
    let response = ctx
        .client
        .post(ctx.get_url("estimate"))
        .json(&serde_json::json!({ "item_count": 3 }))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let estimate: Estimate = response.json().await?;

    assert_eq!(estimate.currency, "EGP");
    assert_eq!(estimate.inputs.item_count, 3.0);
    assert_eq!(estimate.inputs.printer_cost, 15000.0);
    assert_close(estimate.breakdown.total_cost, 106.875);
    assert_eq!(estimate.breakdown.design_modification_cost, 0.0);
    assert_eq!(estimate.formatted[5].amount, "EGP 106.88");

    Ok(())
}

#[test_context(ServerContext)]
#[tokio::test]
async fn test_estimate_rejects_bad_json(ctx: &mut ServerContext) -> TestResult {
    let response = ctx
        .client
        .post(ctx.get_url("estimate"))
        .json(&serde_json::json!({ "item_count": "lots" }))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    Ok(())
}

#[test_context(ServerContext)]
#[tokio::test]
async fn test_estimate_form_coerces_text(ctx: &mut ServerContext) -> TestResult {
    let response = ctx
        .client
        .post(ctx.get_url("estimate/form"))
        .json(&serde_json::json!({
            "item_count": "3",
            "filament_weight_grams": "junk",
            "printer_lifespan_hours": "",
            "requires_modification": "on",
        }))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let estimate: Estimate = response.json().await?;

    assert_eq!(estimate.inputs.filament_weight_grams, 0.0);
    assert_eq!(estimate.breakdown.filament_cost, 0.0);
    // A zero lifespan means no depreciation rather than an infinite one.
    assert_eq!(estimate.breakdown.machine_depreciation, 0.0);
    assert_eq!(estimate.breakdown.design_modification_cost, 50.0);
    assert_close(estimate.breakdown.total_cost, 0.375 + 75.0 + 50.0);

    Ok(())
}

#[test_context(ServerContext)]
#[tokio::test]
async fn test_metrics_count_estimates(ctx: &mut ServerContext) -> TestResult {
    for _ in 0..2 {
        let response = ctx
            .client
            .post(ctx.get_url("estimate"))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    let response = ctx.client.get(ctx.get_url("metrics")).send().await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let text = response.text().await?;

    assert!(text.contains(r#"print_cost_estimates_total{source="Json"} 2"#), "{text}");
    assert!(!text.contains(r#"source="Form""#), "{text}");

    Ok(())
}
