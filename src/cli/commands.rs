use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mnav", about = concat!("mnav v", env!("CARGO_PKG_VERSION"), " - browse a menu tree from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different site directory
    #[arg(short = 'C', long = "site-dir", global = true)]
    pub site_dir: Option<String>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show errors on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a menunav/ site in the current directory
    Init(InitArgs),
    /// Show the current level, trail and navigation state
    Show,
    /// Print the whole menu as an outline
    Tree(TreeArgs),
    /// Activate an entry of the current level
    Open(OpenArgs),
    /// Go back one level
    Back,
    /// Go forward again after going back
    Forward,
    /// Return to the top of the menu
    Home,
    /// Jump to a breadcrumb (0 = first level)
    Crumb(CrumbArgs),
    /// Search from the current level (everything when at home)
    Search(SearchArgs),
    /// Show or set the display language
    Lang(LangArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Application title (default: inferred from directory name)
    #[arg(long)]
    pub title: Option<String>,
    /// Overwrite an existing menunav/ configuration
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Only print this many levels
    #[arg(long)]
    pub depth: Option<usize>,
}

#[derive(Args)]
pub struct OpenArgs {
    /// Entry title (exact, then case-insensitive)
    pub title: String,
    /// Hand resolved links to the system opener
    #[arg(long)]
    pub launch: bool,
}

#[derive(Args)]
pub struct CrumbArgs {
    /// Breadcrumb index, 0-based
    pub index: usize,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in titles, descriptions and urls
    #[arg(default_value = "")]
    pub query: String,
}

#[derive(Args)]
pub struct LangArgs {
    /// Language code to switch to (omit to show the current one)
    pub code: Option<String>,
    /// Also make it the site default in menunav.toml
    #[arg(long)]
    pub default: bool,
}
