//! CLI command definitions and dispatch.

pub mod account;
pub mod config;
pub mod dish;
pub mod route;

use clap::{Parser, Subcommand};

use dishhub_core::config::AppConfig;
use dishhub_core::error::AppError;

use crate::context::CliContext;
use crate::output::OutputFormat;

/// DishHub: share photos of the food you cook
#[derive(Debug, Parser)]
#[command(name = "dishhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Signup(account::SignupArgs),
    /// Sign in with email and password
    Login(account::LoginArgs),
    /// Sign out of the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Dish feed, uploads, likes and comments
    Dish(dish::DishArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Resolve a client path through the route guard
    Route(route::RouteArgs),
    /// Check that the platform is reachable
    Health,
}

impl Cli {
    /// Execute the CLI command against an already loaded configuration
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, &config, &self.config, self.format);
        }

        config.validate()?;
        let ctx = CliContext::open(config).await?;
        self.dispatch(&ctx).await
    }

    /// Execute the command with a prepared context
    pub async fn dispatch(&self, ctx: &CliContext) -> Result<(), AppError> {
        match &self.command {
            Commands::Signup(args) => account::signup(ctx, args, self.format).await,
            Commands::Login(args) => account::login(ctx, args, self.format).await,
            Commands::Logout => account::logout(ctx).await,
            Commands::Whoami => account::whoami(ctx, self.format),
            Commands::Dish(args) => dish::execute(ctx, args, self.format).await,
            Commands::Config(args) => {
                config::execute(args, &ctx.config, &self.config, self.format)
            }
            Commands::Route(args) => route::execute(ctx, args).await,
            Commands::Health => health(ctx).await,
        }
    }
}

async fn health(ctx: &CliContext) -> Result<(), AppError> {
    if ctx.platform.health_check().await? {
        crate::output::print_success(&format!(
            "Platform reachable at {}",
            ctx.config.platform.endpoint
        ));
        Ok(())
    } else {
        Err(AppError::fetch(format!(
            "Platform unreachable at {}",
            ctx.config.platform.endpoint
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishhub_auth::SignUpForm;
    use dishhub_core::config::PlatformProvider;
    use dishhub_core::error::ErrorKind;
    use dishhub_platform::{MemoryPlatform, Platform};

    fn memory_config(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.platform.provider = PlatformProvider::Memory;
        config.platform.project_id = "proj".to_string();
        config.platform.database_id = "db".to_string();
        config.platform.collection_id = "dishes".to_string();
        config.platform.bucket_id = "images".to_string();
        config.session.session_file = dir.join("session").display().to_string();
        config
    }

    async fn context(dir: &std::path::Path) -> CliContext {
        let platform = Platform::in_memory(MemoryPlatform::new("memory://dishhub", "proj"));
        CliContext::with_platform(memory_config(dir), platform)
            .await
            .expect("context")
    }

    #[test]
    fn test_parses_upload_with_tags() {
        let cli = Cli::try_parse_from([
            "dishhub", "dish", "upload", "pho.jpg", "--caption", "Pho", "--tags", "soup, noodles",
        ])
        .expect("parse");
        let Commands::Dish(args) = cli.command else {
            panic!("dish command expected");
        };
        let dish::DishCommand::Upload { path, caption, tags } = args.command else {
            panic!("upload expected");
        };
        assert_eq!(path, std::path::PathBuf::from("pho.jpg"));
        assert_eq!(caption.as_deref(), Some("Pho"));
        assert_eq!(tags, "soup, noodles");
    }

    #[test]
    fn test_rejects_malformed_dish_id() {
        assert!(Cli::try_parse_from(["dishhub", "dish", "show", "a/b"]).is_err());
    }

    #[tokio::test]
    async fn test_config_check_needs_no_platform() {
        let cli = Cli::try_parse_from(["dishhub", "config", "check"]).expect("parse");
        let err = cli
            .execute(AppConfig::default())
            .await
            .expect_err("incomplete config");
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_upload_requires_sign_in() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context(dir.path()).await;
        let cli = Cli::try_parse_from(["dishhub", "dish", "upload", "pho.jpg"]).expect("parse");
        let err = cli.dispatch(&ctx).await.expect_err("anonymous upload");
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_upload_then_like_from_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = dir.path().join("pho.jpg");
        std::fs::write(&image, b"\xFF\xD8\xFFjpeg").expect("write image");

        let ctx = context(dir.path()).await;
        ctx.session
            .sign_up(&SignUpForm::new("Ana", "ana@example.com", "password1", "password1"))
            .await
            .expect("sign up");

        let path = image.display().to_string();
        let upload = Cli::try_parse_from(["dishhub", "dish", "upload", path.as_str(), "-t", "soup"])
            .expect("parse");
        upload.dispatch(&ctx).await.expect("upload");

        let dishes = ctx.dishes.get_all_dishes(10).await.expect("feed");
        assert_eq!(dishes.len(), 1);
        assert_eq!(dishes[0].tags, vec!["soup"]);

        let id = dishes[0].id.to_string();
        let like = Cli::try_parse_from(["dishhub", "dish", "like", id.as_str()]).expect("parse");
        like.dispatch(&ctx).await.expect("like");
        assert_eq!(ctx.dishes.get_dish(&dishes[0].id).await.expect("dish").likes, 1);
    }
}
