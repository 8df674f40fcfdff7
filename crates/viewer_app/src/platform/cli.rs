use std::path::PathBuf;

use clap::Parser;

/// Looks up one conda artifact from the page URL's query and renders it as HTML.
///
/// Navigation commands are read from stdin, one per line:
/// `open <href>`, `goto <url>`, `refresh`, `history`, `quit`.
#[derive(Debug, Parser)]
#[command(name = "artifact-viewer", version)]
pub struct Cli {
    /// Starting page URL, e.g. `http://localhost/?pkg=numpy&channel=conda-forge&arch=linux-64&name=...`
    pub start_url: String,

    /// RON configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where the rendered HTML document is written.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Artifact lookup endpoint of the metadata service.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}
