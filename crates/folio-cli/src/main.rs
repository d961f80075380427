use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio_core::parallax::{Direction, ParallaxConfig};
use folio_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Terminal viewer for a portfolio profile API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal viewer
    Run,
    /// Load the profile once and report what the API returned
    Check,
    /// Evaluate one parallax transform
    Parallax {
        /// Vertical scroll offset in pixels
        #[arg(long, default_value_t = 0)]
        scroll: u32,
        /// Document-relative top of the element in pixels
        #[arg(long)]
        top: i64,
        /// Element height in pixels
        #[arg(long)]
        height: u32,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 800)]
        viewport: u32,
        /// Speed multiplier (defaults to the configured value)
        #[arg(long)]
        speed: Option<f64>,
        /// up, down, left or right (defaults to the configured value)
        #[arg(long)]
        direction: Option<Direction>,
        /// Static offset in pixels
        #[arg(long)]
        offset: Option<f64>,
        /// Easing exponent
        #[arg(long)]
        easing: Option<f64>,
        /// Pin the element
        #[arg(long)]
        disabled: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Edit the portfolio on the backend (needs an admin token)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Update profile fields; unset fields are left unchanged
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Add a project, or replace one with --id
    Project {
        #[arg(long)]
        id: Option<u64>,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        role: String,
        /// Comma-separated list
        #[arg(long, default_value = "")]
        technologies: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        github: Option<String>,
        /// Hide the project from the portfolio
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a project
    DeleteProject { id: u64 },
    /// Add a skill group, or replace one with --id
    Skills {
        #[arg(long)]
        id: Option<u64>,
        #[arg(long)]
        category: String,
        /// Comma-separated list
        #[arg(long)]
        skills: String,
    },
    /// Delete a skill group
    DeleteSkills { id: u64 },
}

impl From<AdminAction> for commands::admin::Write {
    fn from(action: AdminAction) -> Self {
        use commands::admin::{split_list, ProfileUpdate, ProjectInput, SkillGroupInput, Write};

        match action {
            AdminAction::Profile {
                first_name,
                last_name,
                email,
                bio,
            } => Write::Profile(ProfileUpdate {
                first_name,
                last_name,
                email,
                bio,
            }),
            AdminAction::Project {
                id,
                title,
                description,
                role,
                technologies,
                url,
                github,
                inactive,
            } => Write::Project(ProjectInput {
                id,
                title,
                description,
                role,
                technologies: split_list(&technologies),
                project_url: url,
                github_url: github,
                is_active: !inactive,
            }),
            AdminAction::DeleteProject { id } => Write::DeleteProject(id),
            AdminAction::Skills {
                id,
                category,
                skills,
            } => Write::SkillGroup(SkillGroupInput {
                id,
                category,
                skills_list: split_list(&skills),
            }),
            AdminAction::DeleteSkills { id } => Write::DeleteSkillGroup(id),
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    let command = cli.command.unwrap_or(Commands::Run);

    // The viewer owns the terminal, so its logs go to a file
    init_logging(&config, matches!(command, Commands::Run))?;

    match command {
        Commands::Run => commands::run::run(config).await,
        Commands::Check => commands::check::run(&config).await,
        Commands::Parallax {
            scroll,
            top,
            height,
            viewport,
            speed,
            direction,
            offset,
            easing,
            disabled,
        } => {
            let mut params = ParallaxConfig::from(&config.parallax);
            params.speed = speed.unwrap_or(params.speed);
            params.direction = direction.unwrap_or(params.direction);
            params.offset_px = offset.unwrap_or(params.offset_px);
            params.easing = easing.unwrap_or(params.easing);
            params.disabled |= disabled;
            commands::parallax::run(scroll, top, height, viewport, &params)
        }
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(force),
        },
        Commands::Admin { action } => commands::admin::run(&config, action.into()).await,
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
