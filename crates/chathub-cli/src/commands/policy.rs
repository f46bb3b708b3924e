//! Access policy inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use chathub_auth::rbac::GrantSummary;
use chathub_auth::{AccessManager, PolicyDefinition};
use chathub_core::config::AppConfig;
use chathub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for policy commands
#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// Policy file to inspect instead of the configured one
    #[arg(long, global = true)]
    pub file: Option<String>,

    /// Policy subcommand
    #[command(subcommand)]
    pub command: PolicyCommand,
}

/// Policy subcommands
#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// Validate the policy and list roles with their inheritance chains
    Check,
    /// Show the effective grants of one role
    Show {
        /// Role id, e.g. `ADMIN`
        role: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    role: String,
    inherits: String,
    grants: usize,
}

#[derive(Debug, Serialize, Tabled)]
struct GrantRow {
    resource: String,
    action: String,
    conditions: String,
    granted_by: String,
}

impl From<GrantSummary> for GrantRow {
    fn from(g: GrantSummary) -> Self {
        Self {
            resource: g.resource,
            action: g.action,
            conditions: if g.conditions.is_empty() {
                "-".to_string()
            } else {
                g.conditions.join(", ")
            },
            granted_by: g.granted_by,
        }
    }
}

/// Execute policy commands
pub fn execute(args: &PolicyArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let manager = match &args.file {
        Some(path) => AccessManager::new(PolicyDefinition::from_file(path)?)?,
        None => AccessManager::from_config(&config.access)?,
    };

    match &args.command {
        PolicyCommand::Check => {
            let mut rows = Vec::new();
            for role in manager.roles() {
                let inherits = manager
                    .closure(role)
                    .map(|chain| chain.iter().skip(1).cloned().collect::<Vec<_>>().join(" → "))
                    .unwrap_or_default();
                rows.push(RoleRow {
                    role: role.to_string(),
                    inherits: if inherits.is_empty() { "-".to_string() } else { inherits },
                    grants: manager.effective_grants(role)?.len(),
                });
            }
            if format == OutputFormat::Table {
                output::print_success("Policy is valid.");
            }
            output::print_list(&rows, format);
        }
        PolicyCommand::Show { role } => {
            let rows: Vec<GrantRow> = manager
                .effective_grants(role)?
                .into_iter()
                .map(GrantRow::from)
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
