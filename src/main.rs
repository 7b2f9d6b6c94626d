//! roleguard CLI
//!
//! Validates a role/capability policy and answers access questions against it.

use clap::{Args as ClapArgs, Parser, Subcommand};
use roleguard::{
    access_control::{AccessRequirement, Decision, PermissionKey, Principal, RoleRequirement},
    authorizer::Authorizer,
    config::{AppConfig, LogFormat, load_config},
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit code reported when access is denied
const EXIT_DENIED: u8 = 2;

/// roleguard - deny-by-default role and capability authorization
#[derive(Parser, Debug)]
#[command(name = "roleguard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "ROLEGUARD_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "ROLEGUARD_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, env = "ROLEGUARD_LOG_FORMAT", global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate the configuration
    Validate,

    /// Check whether a role may visit a route
    CheckPath {
        /// Role of the principal
        #[arg(long)]
        role: String,

        /// Route path to check
        #[arg(long)]
        path: String,
    },

    /// Evaluate an access requirement for a principal
    Check(CheckArgs),

    /// Resolve every declared capability for a principal and print them as JSON
    Capabilities {
        #[command(flatten)]
        principal: PrincipalArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct CheckArgs {
    #[command(flatten)]
    principal: PrincipalArgs,

    /// Require an admin principal
    #[arg(long, conflicts_with_all = ["require_hr", "require_role"])]
    require_admin: bool,

    /// Require an HR (or admin) principal
    #[arg(long, conflicts_with = "require_role")]
    require_hr: bool,

    /// Require one of these roles (repeatable)
    #[arg(long)]
    require_role: Vec<String>,

    /// Require at least one of these capabilities (resource:action, repeatable)
    #[arg(long = "any", value_parser = parse_key)]
    any_of: Vec<PermissionKey>,

    /// Require all of these capabilities (resource:action, repeatable)
    #[arg(long = "all", value_parser = parse_key)]
    all_of: Vec<PermissionKey>,

    /// Require route access to this path
    #[arg(long = "require-path")]
    require_path: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct PrincipalArgs {
    /// Role of the principal
    #[arg(long)]
    role: String,

    /// Principal identifier used in messages
    #[arg(long)]
    id: Option<String>,

    /// Capability held by the principal (resource:action, repeatable)
    #[arg(long = "permission", value_parser = parse_key)]
    permissions: Vec<PermissionKey>,
}

impl PrincipalArgs {
    fn to_principal(&self) -> Principal {
        let principal = Principal::new(&self.role).with_permissions(self.permissions.iter().cloned());
        match &self.id {
            Some(id) => principal.with_id(id),
            None => principal,
        }
    }
}

fn parse_key(s: &str) -> Result<PermissionKey, String> {
    s.parse().map_err(|e: roleguard::error::RequirementError| e.to_string())
}

fn init_logging(args: &Args, config: &AppConfig) {
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let format = args.log_format.unwrap_or(config.logging.format);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

fn build_requirement(args: &CheckArgs) -> roleguard::Result<AccessRequirement> {
    let mut requirement = AccessRequirement::new();

    if args.require_admin {
        requirement = requirement.with_role(RoleRequirement::IsAdmin);
    } else if args.require_hr {
        requirement = requirement.with_role(RoleRequirement::IsHr);
    } else if !args.require_role.is_empty() {
        requirement = requirement.with_role(RoleRequirement::one_of(&args.require_role)?);
    }
    if !args.any_of.is_empty() {
        requirement = requirement.with_any_of(args.any_of.iter().cloned());
    }
    if !args.all_of.is_empty() {
        requirement = requirement.with_all_of(args.all_of.iter().cloned());
    }
    if let Some(path) = &args.require_path {
        requirement = requirement.with_path(path.clone());
    }

    Ok(requirement.build()?)
}

fn report(decision: &Decision) -> ExitCode {
    match decision {
        Decision::Allowed => {
            println!("allow");
            ExitCode::SUCCESS
        }
        Decision::Denied(denial) => {
            println!("deny: {}", denial);
            ExitCode::from(EXIT_DENIED)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Load configuration
    let config = load_config(args.config.as_deref())?;

    init_logging(&args, &config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        roles = config.policy.roles.len(),
        capabilities = config.capabilities.len(),
        "Loaded configuration"
    );

    let authz = Authorizer::from_config(&config)
        .inspect_err(|e| error!(error = %e, "Failed to build authorizer"))?;

    let code = match &args.command {
        Command::Validate => {
            println!(
                "ok: {} roles, {} capabilities",
                authz.policy().len(),
                authz.capabilities().len()
            );
            ExitCode::SUCCESS
        }
        Command::CheckPath { role, path } => {
            let principal = Principal::new(role);
            if authz.evaluator().is_authorized_for_path(&principal, path) {
                println!("allow");
                ExitCode::SUCCESS
            } else {
                println!("deny");
                ExitCode::from(EXIT_DENIED)
            }
        }
        Command::Check(check) => {
            let requirement = build_requirement(check)
                .inspect_err(|e| error!(error = %e, "Invalid requirement"))?;
            let principal = check.principal.to_principal();
            report(&authz.guard().evaluate(Some(&principal), &requirement))
        }
        Command::Capabilities { principal } => {
            let principal = principal.to_principal();
            let capabilities = authz.navigation(Some(&principal));
            println!("{}", serde_json::to_string_pretty(&capabilities)?);
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_flag_is_validated() {
        let args = Args::try_parse_from(["roleguard", "--log-format", "json", "validate"]).unwrap();
        assert_eq!(args.log_format, Some(LogFormat::Json));

        for bad in ["xml", "JSON"] {
            let result = Args::try_parse_from(["roleguard", "--log-format", bad, "validate"]);
            assert!(result.is_err(), "accepted --log-format {}", bad);
        }
    }

    #[test]
    fn test_check_builds_requirement() {
        let args = Args::try_parse_from([
            "roleguard",
            "check",
            "--role",
            "hr",
            "--require-hr",
            "--any",
            "biometric:read",
        ])
        .unwrap();
        let Command::Check(check) = &args.command else {
            panic!("expected check command");
        };

        let requirement = build_requirement(check).unwrap();
        assert_eq!(requirement.role(), Some(&RoleRequirement::IsHr));
        assert_eq!(requirement.any_of().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_check_without_clauses_is_requirement_error() {
        let args = Args::try_parse_from(["roleguard", "check", "--role", "hr"]).unwrap();
        let Command::Check(check) = &args.command else {
            panic!("expected check command");
        };

        assert!(matches!(
            build_requirement(check),
            Err(roleguard::AppError::Requirement(_))
        ));
    }
}
