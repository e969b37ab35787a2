//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hatchling")]
#[command(about = "Memory journal tagging and export", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new workspace
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Author id sent with entries and exports
        #[arg(short, long)]
        author: String,

        /// Base URL of the journal API
        #[arg(long)]
        api_url: Option<String>,

        /// Tag classification endpoint
        #[arg(long)]
        classifier_url: Option<String>,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Preview the tags an entry would get
    Tags {
        /// Entry text
        content: String,

        /// URL of attached media
        #[arg(long, requires = "media_type")]
        media_url: Option<String>,

        /// MIME type of attached media (e.g., image/jpeg)
        #[arg(long, requires = "media_url")]
        media_type: Option<String>,
    },

    /// Create or update an entry
    Submit {
        /// Entry text
        #[arg(short, long, default_value = "")]
        content: String,

        /// Date of the memory (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// private or shared
        #[arg(short, long, default_value = "private")]
        privacy: String,

        /// Explicit tag (repeatable); without tags, tags are generated
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        #[arg(long, requires = "media_type")]
        media_url: Option<String>,

        #[arg(long, requires = "media_url")]
        media_type: Option<String>,

        /// app, sms or voice
        #[arg(long, default_value = "app")]
        source: String,

        /// Overwrite this existing entry instead of creating one
        #[arg(long)]
        entry_id: Option<String>,

        /// Generate tags even when explicit tags are given
        #[arg(long)]
        regenerate_tags: bool,
    },

    /// Export entries (no ids: everything you can see)
    Export {
        /// Entry ids to export
        ids: Vec<String>,

        /// pdf, csv or json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Start date filter (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date filter (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only entries with this privacy
        #[arg(long)]
        privacy: Option<String>,
    },
}
