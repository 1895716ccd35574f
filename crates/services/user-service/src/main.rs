//! User Service - command-line user management.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_service_lib::config::UserServiceConfig;
use user_service_lib::{MigrateAction, UserAction};

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User management service")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// User management commands
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum UserCommands {
    /// List users, ten per page
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a new user
    Register(RegisterArgs),
    /// Change the password of an existing user
    ChangePassword(ChangePasswordArgs),
    /// Delete a user
    Delete {
        #[arg(long)]
        email: String,
    },
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, env = "USER_PASSWORD_REPEAT", hide_env_values = true)]
    password_repeat: String,
}

#[derive(Args)]
struct ChangePasswordArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "USER_CURRENT_PASSWORD", hide_env_values = true)]
    current_password: String,
    #[arg(long, env = "USER_NEW_PASSWORD", hide_env_values = true)]
    new_password: String,
    #[arg(long, env = "USER_NEW_PASSWORD_REPEAT", hide_env_values = true)]
    new_password_repeat: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration (reads .env)
    let config = UserServiceConfig::from_env();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(&config, cli.verbose);

    let result = match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            user_service_lib::run_migrations(&config, migrate_action).await
        }
        Commands::Users { action } => {
            let user_action = match action {
                UserCommands::List { page, json } => UserAction::List { page, json },
                UserCommands::Register(args) => UserAction::Register {
                    email: args.email,
                    password: args.password,
                    password_repeat: args.password_repeat,
                },
                UserCommands::ChangePassword(args) => UserAction::ChangePassword {
                    email: args.email,
                    current_password: args.current_password,
                    new_password: args.new_password,
                    new_password_repeat: args.new_password_repeat,
                },
                UserCommands::Delete { email } => UserAction::Delete { email },
            };
            user_service_lib::run_user_action(&config, user_action).await
        }
    };

    // Handle errors
    if let Err(e) = result {
        tracing::error!(code = e.code(), "Command failed: {}", e.user_message());
        for field_error in e.field_errors() {
            eprintln!("  {}", field_error);
        }
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(config: &UserServiceConfig, verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        config.log_filter.clone()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
