//! Pre-traffic gate CLI
//!
//! The `pretraffic` command runs the deployment gate and the data-access
//! handlers against a cloud gateway, reading events from a file or stdin and
//! writing the response document to stdout. Logs go to stderr.
//!
//! ## Commands
//!
//! - `hook`: evaluate one lifecycle hook event
//! - `alarms`: active alarms for a site
//! - `user-settings`: settings of the calling user

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use cloud_gateway::{GatewayClient, GatewayConfig};
use cloud_ports::ItemStore;
use pretraffic_core::{GateConfig, GateController, GatePorts, HookResponse};
use pretraffic_handlers::{
    AlarmsHandler, ApiHandler, ApiRequest, HandlerConfig, InvocationContext, UserSettingsHandler,
};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "pretraffic")]
#[command(author = "Stevedores Org")]
#[command(version = pretraffic_core::VERSION)]
#[command(about = "Pre-traffic deployment gate", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one lifecycle hook event and report the decision
    Hook {
        /// Event document (JSON), `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: PathBuf,

        #[command(flatten)]
        gate: GateArgs,

        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Fetch the latest active alarm per code for a site
    Alarms {
        #[command(flatten)]
        api: ApiArgs,

        /// Alarms table (default: $ALARMS_TABLE or dev_isr_mqa_alarm)
        #[arg(long)]
        table: Option<String>,

        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Fetch the calling user's settings
    UserSettings {
        #[command(flatten)]
        api: ApiArgs,

        /// User table (default: $USER_TABLE or dev_isr_user_info)
        #[arg(long)]
        table: Option<String>,

        #[command(flatten)]
        gateway: GatewayArgs,
    },
}

/// Gate configuration, taken from the deployment template's environment
/// when the flag is absent.
///
/// Optional at parse time so the sentinel event can be answered before any
/// of it is set.
#[derive(Args, Debug, Clone)]
struct GateArgs {
    /// Stack whose resources are compliance-checked
    #[arg(long, env = "StackId")]
    stack_id: Option<String>,

    /// Function version under deployment
    #[arg(long, env = "CurrentVersion")]
    function_name: Option<String>,

    /// Metric namespace for the fitness datapoint
    #[arg(long, env = "Namespace")]
    namespace: Option<String>,

    /// Metric name for the fitness datapoint
    #[arg(long, env = "MetricName")]
    metric_name: Option<String>,

    /// Also score rule compliance of every stack resource
    #[arg(long, env = "ComplianceChecks", value_parser = clap::builder::FalseyValueParser::new())]
    compliance_checks: bool,

    /// Points per invocation-test point
    #[arg(long, default_value_t = pretraffic_core::config::DEFAULT_INVOCATION_WEIGHT)]
    invocation_weight: u64,

    /// Points per compliant rule
    #[arg(long, default_value_t = pretraffic_core::config::DEFAULT_COMPLIANCE_WEIGHT)]
    compliance_weight: u64,
}

fn required<'a>(value: &'a Option<String>, flag: &str, env: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| anyhow!("--{flag} (or ${env}) is required to evaluate a deployment"))
}

impl GateArgs {
    fn config(&self) -> Result<GateConfig> {
        Ok(GateConfig::new(
            required(&self.stack_id, "stack-id", "StackId")?,
            required(&self.function_name, "function-name", "CurrentVersion")?,
            required(&self.namespace, "namespace", "Namespace")?,
            required(&self.metric_name, "metric-name", "MetricName")?,
        )
        .with_compliance_checks(self.compliance_checks)
        .with_weights(self.invocation_weight, self.compliance_weight))
    }
}

/// Overrides for the gateway settings read from the environment.
#[derive(Args, Debug, Clone)]
struct GatewayArgs {
    /// Gateway base URL (default: $CLOUD_GATEWAY_ENDPOINT)
    #[arg(long)]
    gateway_endpoint: Option<String>,

    /// Bearer token (default: $CLOUD_GATEWAY_TOKEN)
    #[arg(long)]
    gateway_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    gateway_timeout: Option<u64>,
}

impl GatewayArgs {
    fn config(&self) -> GatewayConfig {
        let mut config = GatewayConfig::from_env();
        if let Some(endpoint) = &self.gateway_endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(token) = &self.gateway_token {
            config = config.with_token(token);
        }
        if let Some(secs) = self.gateway_timeout {
            config = config.with_timeout_secs(secs);
        }
        config
    }

    fn client(&self) -> Result<Arc<GatewayClient>> {
        let client = GatewayClient::new(self.config()).context("Failed to create gateway client")?;
        Ok(Arc::new(client))
    }
}

#[derive(Args, Debug, Clone)]
struct ApiArgs {
    /// API request document (JSON), `-` for stdin
    #[arg(short, long, default_value = "-")]
    request: PathBuf,

    /// Request id echoed in error responses (default: random)
    #[arg(long)]
    request_id: Option<String>,
}

impl ApiArgs {
    fn invocation(&self, function_name: &str) -> InvocationContext {
        let mut ctx = InvocationContext::new(
            self.request_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        );
        ctx.function_name = function_name.to_string();
        ctx
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    pretraffic_core::telemetry::init_tracing(cli.json, level);

    let output = match cli.command {
        Commands::Hook {
            event,
            gate,
            gateway,
        } => {
            let raw = read_json_input(&event)?;
            match HookResponse::for_sentinel(&raw) {
                Some(ack) => ack.to_json()?,
                None => {
                    let ports = GatePorts::shared(gateway.client()?);
                    let controller = GateController::new(gate.config()?, ports);
                    cmd_hook(&controller, &raw).await?
                }
            }
        }
        Commands::Alarms {
            api,
            table,
            gateway,
        } => {
            let mut config = HandlerConfig::from_env();
            if let Some(table) = table {
                config = config.with_alarms_table(&table);
            }
            let store: Arc<dyn ItemStore> = gateway.client()?;
            let handler = AlarmsHandler::new(store, config.alarms_table);
            cmd_api(&handler, &api).await?
        }
        Commands::UserSettings {
            api,
            table,
            gateway,
        } => {
            let mut config = HandlerConfig::from_env();
            if let Some(table) = table {
                config = config.with_user_table(&table);
            }
            let store: Arc<dyn ItemStore> = gateway.client()?;
            let handler = UserSettingsHandler::new(store, config.user_table);
            cmd_api(&handler, &api).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
fn read_json_input(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

async fn cmd_hook(controller: &GateController, raw: &Value) -> Result<Value> {
    let response = controller
        .handle(raw)
        .await
        .context("Pre-traffic validation inconclusive")?;

    if let HookResponse::Evaluated(outcome) = &response {
        info!(
            invocation_id = %outcome.invocation_id,
            score = outcome.report.score(),
            status = %outcome.report.status(),
            decision_reported = outcome.decision_reported(),
            "gate finished"
        );
    }
    Ok(response.to_json()?)
}

async fn cmd_api(handler: &dyn ApiHandler, args: &ApiArgs) -> Result<Value> {
    let raw = read_json_input(&args.request)?;
    let request: ApiRequest =
        serde_json::from_value(raw).context("Request does not match the API request shape")?;
    let ctx = args.invocation(handler.name());

    let response = handler.handle(&request, &ctx).await;
    info!(
        handler = handler.name(),
        request_id = %ctx.aws_request_id,
        status = response.status_code,
        "request handled"
    );
    Ok(serde_json::to_value(&response)?)
}
