use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "link-keeper", version, about = "Keep markdown links intact across renames and heading edits")]
pub struct Cli {
    /// Workspace root holding the documents
    #[arg(long, env = "LINK_KEEPER_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Config file (defaults to link-keeper.toml in the root)
    #[arg(long, env = "LINK_KEEPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Move a document or folder and repair every reference to it
    Rename {
        from: String,
        to: String,
        /// Move on disk and write the edits instead of printing them
        #[arg(long)]
        apply: bool,
    },
    /// Repair anchor links after headings in a document were renamed
    Save {
        path: String,
        /// File holding the document text before the edit
        #[arg(long)]
        before: PathBuf,
        #[arg(long)]
        apply: bool,
    },
    /// Process a change event given as JSON (`-` reads stdin)
    Event {
        file: String,
        #[arg(long)]
        apply: bool,
    },
    /// List the references of a document and the documents referencing it
    Links { path: String },
}
