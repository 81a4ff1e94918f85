//! splitgroup CLI — partition validation and group assignment from the shell.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "splitgroup",
    version,
    about = "User partition and split-test group assignment"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign (or look up) a learner's group in a partition
    Assign {
        /// Course id the assignment is scoped to
        #[arg(long)]
        course: String,

        /// Learner id
        #[arg(long)]
        user: String,

        /// Partition id
        #[arg(long)]
        partition: i64,

        /// Partition definition file (overrides config)
        #[arg(long)]
        partitions: Option<PathBuf>,

        /// JSON tag store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Fixed random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Pick the split-test child for a group
    Select {
        /// group_id_to_child JSON object
        #[arg(long)]
        map: String,

        /// Assigned group id
        #[arg(long)]
        group: String,

        /// Available child ids (comma-separated)
        #[arg(long)]
        children: String,

        /// Fixed random seed for the fallback pick
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print export attributes for a new split test over a partition
    Export {
        /// Partition id
        #[arg(long)]
        partition: i64,

        /// Child ids, one per group in order (comma-separated)
        #[arg(long)]
        children: String,

        /// Partition definition file (overrides config)
        #[arg(long)]
        partitions: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List partitions and their groups
    List {
        /// Partition definition file (overrides config)
        #[arg(long)]
        partitions: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a partition definition file
    Validate {
        /// Path to the partition file
        #[arg(long)]
        partitions: PathBuf,
    },

    /// Create starter config and partition file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("splitgroup=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assign {
            course,
            user,
            partition,
            partitions,
            store,
            seed,
            config,
        } => {
            commands::assign::execute(course, user, partition, partitions, store, seed, config)
                .await
        }
        Commands::Select {
            map,
            group,
            children,
            seed,
        } => commands::select::execute(map, group, children, seed),
        Commands::Export {
            partition,
            children,
            partitions,
            config,
        } => commands::export::execute(partition, children, partitions, config),
        Commands::List { partitions, config } => commands::list::execute(partitions, config),
        Commands::Validate { partitions } => commands::validate::execute(partitions),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
