use anyhow::Result;
use clap::{Parser, Subcommand};
use guide_sync::commands::{check_command, compare_command, init_command, sections_command};
use guide_sync::{init_tracing, log_level};

/// Structural drift checker for families of near-duplicate Markdown guides.
///
/// This CLI is a thin wrapper around `guide-sync-core` (exposed in code as
/// `guide_sync_core`). All substantive logic lives in the library.
#[derive(Parser, Debug)]
#[command(
    name = "guide-sync",
    version,
    about = "Check variant documents for missing and diverged sections",
    long_about = None,
    after_help = "EXIT CODES:\n    0  All groups consistent\n    1  Drift found, a group could not be compared, or an error occurred"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the configured check over every declared variant group.
    ///
    /// Reads `.guide-sync/config.yaml` under the root unless `--config` is given.
    Check {
        /// Project root; relative document paths resolve against it.
        #[arg(long, default_value = ".")]
        root: String,

        /// Explicit config file (YAML, or JSON when it ends in `.json`); relative to --root.
        #[arg(long)]
        config: Option<String>,

        /// Report format.
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Compare the given documents as a single ad-hoc group.
    Compare {
        /// Documents to compare; the first is the reference.
        #[arg(required = true, num_args = 1..)]
        paths: Vec<String>,

        /// Character run that introduces a heading.
        #[arg(long, default_value = "#")]
        marker: String,

        /// Compare headings case-sensitively.
        #[arg(long, default_value_t = false)]
        case_sensitive: bool,

        /// Treat marker lines inside fenced code blocks as headings too.
        #[arg(long, default_value_t = false)]
        no_skip_fences: bool,

        /// Report format.
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the sections of one document.
    Sections {
        /// Document to split.
        #[arg(long)]
        path: String,

        /// Character run that introduces a heading.
        #[arg(long, default_value = "#")]
        marker: String,

        /// Keep heading keys case-sensitive.
        #[arg(long, default_value_t = false)]
        case_sensitive: bool,

        /// Treat marker lines inside fenced code blocks as headings too.
        #[arg(long, default_value_t = false)]
        no_skip_fences: bool,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Scaffold a config listing the Markdown files in the root as one group.
    Init {
        /// Project root. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Name of the group holding the discovered documents.
        #[arg(long, default_value = "guide")]
        group: String,

        /// Overwrite an existing config.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(log_level(cli.verbose, cli.quiet));

    let status = match cli.command {
        Command::Check { root, config, format } => {
            check_command(&root, config.as_deref(), &format)?
        }
        Command::Compare { paths, marker, case_sensitive, no_skip_fences, format } => {
            compare_command(&paths, &marker, case_sensitive, no_skip_fences, &format)?
        }
        Command::Sections { path, marker, case_sensitive, no_skip_fences, json } => {
            sections_command(&path, &marker, case_sensitive, no_skip_fences, json)?;
            0
        }
        Command::Init { root, group, force } => {
            init_command(&root, &group, force)?;
            0
        }
    };

    if status != 0 {
        std::process::exit(status);
    }
    Ok(())
}
