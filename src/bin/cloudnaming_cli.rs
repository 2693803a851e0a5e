//! CloudNaming CLI - Bridge interface for provisioning automation
//!
//! Commands: categories, derive, plan, validate, validate-plan, tags
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure, 1 on bad input

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use cloudnaming_core::{
    derive, derive_plan, registry, validate, validate_plan, GovernanceInputs, NamingComponents,
    ResourceCategory, TagComposer,
};

#[derive(Parser)]
#[command(name = "cloudnaming-cli")]
#[command(about = "CloudNaming CLI - deterministic resource names and governance tags")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List every resource category and its naming constraint
    Categories,

    /// Derive a name for one category
    Derive {
        /// Resource category (e.g. storage_account, kv)
        #[arg(short, long)]
        category: String,

        /// JSON payload (NamingComponents)
        #[arg(short, long)]
        payload: String,
    },

    /// Derive names for every category
    Plan {
        /// JSON payload (NamingComponents)
        #[arg(short, long)]
        payload: String,
    },

    /// Validate a single name
    Validate {
        /// Resource category
        #[arg(short, long)]
        category: String,

        /// Candidate name
        #[arg(short, long)]
        name: String,
    },

    /// Validate a set of names, keyed by category
    ValidatePlan {
        /// JSON payload ({"storage_account": "...", ...})
        #[arg(short, long)]
        payload: String,
    },

    /// Compose governance tags
    Tags {
        /// JSON payload (TagsRequest)
        #[arg(short, long)]
        payload: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagsRequest {
    #[serde(default)]
    user_tags: BTreeMap<String, String>,
    governance: GovernanceInputs,
}

fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            true
        }
        Err(e) => {
            error!(error = %e, "failed to serialize output");
            false
        }
    }
}

fn fail(message: String) -> ExitCode {
    print_json(&serde_json::json!({ "success": false, "error": message }));
    ExitCode::FAILURE
}

fn parse_payload<T: for<'de> Deserialize<'de>>(payload: &str) -> Result<T, String> {
    serde_json::from_str(payload).map_err(|e| format!("Invalid payload: {}", e))
}

fn parse_category(category: &str) -> Result<ResourceCategory, String> {
    category.parse().map_err(|e: cloudnaming_core::NamingError| e.to_string())
}

fn finish(printed: bool, success: ExitCode) -> ExitCode {
    if printed { success } else { ExitCode::FAILURE }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Categories => {
            let categories: Vec<_> = registry::list()
                .into_iter()
                .map(|c| serde_json::json!({
                    "abbreviation": c.category.abbreviation(),
                    "constraint": c,
                }))
                .collect();

            finish(print_json(&categories), ExitCode::SUCCESS)
        }

        Commands::Derive { category, payload } => {
            let category = match parse_category(&category) {
                Ok(c) => c,
                Err(e) => return fail(e),
            };
            let components: NamingComponents = match parse_payload(&payload) {
                Ok(c) => c,
                Err(e) => return fail(e),
            };

            match derive(category, &components) {
                Ok(name) => {
                    let output = serde_json::json!({
                        "success": true,
                        "category": category,
                        "name": name,
                    });
                    finish(print_json(&output), ExitCode::SUCCESS)
                }
                Err(e) => fail(e.to_string()),
            }
        }

        Commands::Plan { payload } => {
            let components: NamingComponents = match parse_payload(&payload) {
                Ok(c) => c,
                Err(e) => return fail(e),
            };

            match derive_plan(&components) {
                Ok(plan) => {
                    debug!(fingerprint = %plan.fingerprint, "plan ready");
                    finish(print_json(&plan), ExitCode::SUCCESS)
                }
                Err(e) => fail(e.to_string()),
            }
        }

        Commands::Validate { category, name } => {
            let category = match parse_category(&category) {
                Ok(c) => c,
                Err(e) => return fail(e),
            };

            let verdict = validate(category, &name);
            let code = if verdict.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)  // Validation failure
            };
            finish(print_json(&verdict), code)
        }

        Commands::ValidatePlan { payload } => {
            let names: BTreeMap<ResourceCategory, String> = match parse_payload(&payload) {
                Ok(n) => n,
                Err(e) => return fail(e),
            };

            let verdict = validate_plan(&names);
            let code = if verdict.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            };
            finish(print_json(&verdict), code)
        }

        Commands::Tags { payload } => {
            let request: TagsRequest = match parse_payload(&payload) {
                Ok(r) => r,
                Err(e) => return fail(e),
            };

            let tags = TagComposer::new().compose(&request.user_tags, &request.governance);
            finish(print_json(&tags), ExitCode::SUCCESS)
        }
    }
}
