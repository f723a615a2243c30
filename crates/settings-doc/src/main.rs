//! settings-doc - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "settings-doc")]
#[command(version)]
#[command(about = "Reference documentation for site set settings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the categorized settings tree and print it as JSON
    Build {
        /// Settings definition file (prefix with PROJECT: to resolve against the project root)
        settings: String,

        /// Documentation root for plain paths
        #[arg(long, default_value = ".")]
        doc_root: PathBuf,

        /// Project root for PROJECT: paths (defaults to the current directory)
        #[arg(long)]
        project_root: Option<PathBuf>,

        /// Directory of the including document, relative to the documentation root
        #[arg(long, default_value = "")]
        document_dir: String,

        /// Menu name, used as anchor prefix
        #[arg(long)]
        name: Option<String>,

        /// Menu caption
        #[arg(long)]
        caption: Option<String>,

        /// Display mode
        #[arg(long)]
        display: Option<String>,

        /// Exclude the settings from the index
        #[arg(long)]
        noindex: bool,

        /// Additional directive option (NAME or NAME=VALUE, e.g. Label=max=30)
        #[arg(long = "option", value_name = "NAME[=VALUE]")]
        options: Vec<String>,
    },

    /// Print the label tables read from an XLIFF file
    Labels {
        /// XLIFF translation file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "settings_doc=info,settings_tree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            settings,
            doc_root,
            project_root,
            document_dir,
            name,
            caption,
            display,
            noindex,
            options,
        } => commands::build::execute(commands::build::BuildArgs {
            settings,
            doc_root,
            project_root,
            document_dir,
            name,
            caption,
            display,
            noindex,
            options,
        }),
        Commands::Labels { file } => commands::labels::execute(&file),
    }
}
