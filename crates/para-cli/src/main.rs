//! para - browse WinCC OA PARA datapoint configuration
//!
//! Reads a project's SQLite stores read-only and writes values through the
//! project's MCP HTTP control service.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use para_cli::commands;
use para_cli::config::Config;
use para_cli::discovery::{Discovered, Discovery};
use para_cli::output::{OutputContext, OutputFormat};
use para_cli::session::Session;

#[derive(Parser)]
#[command(name = "para")]
#[command(author, version, about = "WinCC OA PARA browser")]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (contains db/wincc_oa/sqlite)
    #[arg(short, long, env = "PARA_PROJECT", global = true)]
    project: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "PARA_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    output: Option<OutputFormat>,

    /// Include internal (`_`-prefixed) types and datapoints
    #[arg(long, global = true)]
    show_internal: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current project, or select one
    Project {
        /// Save DIR as the selected project
        #[arg(long, value_name = "DIR")]
        select: Option<PathBuf>,
    },

    /// List datapoint types
    Types {
        /// Include internal types
        #[arg(long)]
        all: bool,
    },

    /// List datapoints
    Datapoints {
        /// Only datapoints of this type
        #[arg(long = "type", value_name = "TYPE")]
        dp_type: Option<String>,

        /// Include internal datapoints
        #[arg(long)]
        all: bool,
    },

    /// Expand a type, datapoint or element
    Tree {
        /// Datapoint or type name (`Pump1`, `Pump1.state`, `Pump`)
        target: String,

        /// Element path below the datapoint (`state.running`)
        element: Option<String>,

        /// Levels to expand
        #[arg(long, default_value = "1")]
        depth: usize,
    },

    /// Show the configuration of a datapoint element
    Show {
        /// Element name (`Pump1.state.running`)
        dpe: String,
    },

    /// Write a value through the control service
    Set {
        /// Element name (`Pump1.cmd`)
        dpe: String,

        /// Value (`true`/`false`, a number, or text)
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Check the control service
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let mut config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        Config::default()
    };

    let merged = config.merge_with_args(
        cli.project.as_deref(),
        cli.output,
        cli.no_color,
        cli.show_internal,
    );
    let ctx = OutputContext::new(merged.output, merged.no_color, cli.quiet);

    if let Commands::Project { select: Some(dir) } = &cli.command {
        commands::select_project(&mut config, &config_path, dir, &ctx)?;
    }

    // Re-merge so a fresh selection takes effect
    let merged = config.merge_with_args(
        cli.project.as_deref(),
        cli.output,
        cli.no_color,
        cli.show_internal,
    );
    let mut roots = merged.workspace_roots.clone();
    roots.extend(std::env::current_dir().ok());
    let discovered = Discovery {
        explicit: merged.explicit_project.as_deref(),
        saved: merged.saved_project.as_deref(),
        source: None,
        workspace_roots: &roots,
    }
    .discover();

    let mut session = Session::new()?;

    // Execute command
    match &cli.command {
        Commands::Project { .. } => {
            if let Some(found) = &discovered {
                if let Err(e) = session.connect(&found.path).await {
                    ctx.warn(&format!("{:#}", e));
                }
            }
            commands::project(&session, discovered.as_ref(), &ctx)?;
        }

        Commands::Types { all } => {
            connect(&mut session, discovered.as_ref()).await?;
            commands::types(session.catalog(), *all || merged.show_internal, &ctx)?;
        }

        Commands::Datapoints { dp_type, all } => {
            connect(&mut session, discovered.as_ref()).await?;
            commands::datapoints(
                session.catalog(),
                dp_type.as_deref(),
                *all || merged.show_internal,
                &ctx,
            )?;
        }

        Commands::Tree {
            target,
            element,
            depth,
        } => {
            connect(&mut session, discovered.as_ref()).await?;
            commands::tree(session.catalog(), target, element.as_deref(), *depth, &ctx)?;
        }

        Commands::Show { dpe } => {
            connect(&mut session, discovered.as_ref()).await?;
            commands::show(session.catalog(), dpe, &ctx)?;
        }

        Commands::Set { dpe, value } => {
            connect(&mut session, discovered.as_ref()).await?;
            commands::set(&session, dpe, value, &ctx).await?;
        }

        Commands::Health => {
            let project = require_project(discovered.as_ref())?;
            commands::health(session.client_mut(), &project.path, &ctx).await?;
        }
    }

    Ok(())
}

fn require_project(discovered: Option<&Discovered>) -> Result<&Discovered> {
    discovered.context(
        "No WinCC OA project found. Use --project or `para project --select <DIR>`",
    )
}

/// Open the discovered project in `session`
async fn connect(session: &mut Session, discovered: Option<&Discovered>) -> Result<()> {
    let project = require_project(discovered)?;
    session.connect(&project.path).await?;
    Ok(())
}
