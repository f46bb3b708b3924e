//! Operator account commands.

use std::sync::Arc;

use clap::{Args, Subcommand};

use chathub_auth::password::CredentialHasher;
use chathub_auth::{Argon2Hasher, PasswordPolicy};
use chathub_core::config::AppConfig;
use chathub_core::error::AppError;
use chathub_database::PgUserRepository;
use chathub_entity::UserRole;
use chathub_service::{CreateUserCommand, UserRepo, create_account};

use crate::output;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create the operator account (`SUPER_ADMIN`)
    Create {
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
        /// Given name
        #[arg(long, default_value = "Super")]
        first_name: String,
        /// Family name
        #[arg(long, default_value = "Admin")]
        last_name: String,
    },
}

/// Execute admin commands
pub async fn execute(args: &AdminArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        AdminCommand::Create {
            email,
            password,
            first_name,
            last_name,
        } => {
            let email = match email {
                Some(e) => e.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Admin email")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let db = super::connect_database(config).await?;
            chathub_database::migration::run_migrations(db.pool()).await?;

            let users: UserRepo = Arc::new(PgUserRepository::new(db.pool().clone()));
            let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new(&config.auth)?);
            let policy = PasswordPolicy::new(&config.auth);

            let user = create_account(
                &users,
                &hasher,
                &policy,
                CreateUserCommand {
                    email,
                    password,
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    role: UserRole::SuperAdmin,
                },
            )
            .await?;

            output::print_success(&format!("Operator '{}' created", user.email));
            output::print_kv("id", &user.id.to_string());
            output::print_kv("role", user.role.as_str());
            db.close().await;
        }
    }

    Ok(())
}
