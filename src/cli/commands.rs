use clap::{Parser, Subcommand};
use content_abilities::security::Role;
use std::path::PathBuf;

/// `content-abilities` - schema-validated, permission-gated content operations.
#[derive(Parser, Debug)]
#[command(name = "content-abilities")]
#[command(version = "0.1.0")]
#[command(about = "Discover and invoke content abilities.", long_about = None)]
pub struct Cli {
    /// Log at debug level regardless of the configured `log_level`
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.content-abilities/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the descriptors of every registered ability
    List,

    /// Print the descriptor of one ability
    Describe {
        /// Ability id, e.g. content/create-post
        id: String,
    },

    /// Run one ability against a freshly seeded in-memory store
    Invoke {
        /// Ability id, e.g. content/list-posts
        id: String,

        /// JSON object passed as the ability input
        #[arg(short, long, default_value = "{}")]
        input: String,

        /// Role whose default capabilities the caller receives
        #[arg(short, long, default_value = "administrator")]
        role: Role,

        /// Login name of the calling user
        #[arg(short, long, default_value = "admin")]
        user: String,
    },
}
