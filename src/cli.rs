use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ansi::{Color, Modifier};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "ctools", version, about = "Small terminal helpers and an interactive file browser")]
pub struct Cli {
    #[arg(short = 'C', long = "chdir", global = true)]
    pub chdir: Option<PathBuf>,
    /// Use this config file instead of the discovered one.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse directories interactively and print the selected path.
    Browse(BrowseArgs),
    /// Prompt until a valid integer is entered, then print it.
    ReadInt(ReadIntArgs),
    /// Generate random values.
    Random {
        #[command(subcommand)]
        command: RandomCommand,
    },
    /// Run a command and report how many seconds it took.
    Time(TimeArgs),
    /// Print styled text.
    Print(PrintArgs),
    /// Read, append to, or create text files.
    File {
        #[command(subcommand)]
        command: FileCommand,
    },
    /// Configuration display and template generation.
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommand>,
    },
}

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Directory to start in (defaults to the config value, then the working directory).
    #[arg(long = "start")]
    pub start: Option<PathBuf>,
    /// Offer `d` to select the current directory.
    #[arg(long = "select-dir")]
    pub select_dir: bool,
    /// List directories first, then by name.
    #[arg(long = "sort")]
    pub sort: bool,
    /// Leave out dot-entries.
    #[arg(long = "hide-hidden")]
    pub hide_hidden: bool,
}

#[derive(Args, Debug)]
pub struct ReadIntArgs {
    #[arg(long = "prompt", default_value = "Enter an integer:")]
    pub prompt: String,
}

#[derive(Subcommand, Debug)]
pub enum RandomCommand {
    /// Uniform integers in the closed range [min, max].
    Int {
        #[arg(long, allow_hyphen_values = true, default_value_t = i64::MIN)]
        min: i64,
        #[arg(long, allow_hyphen_values = true, default_value_t = i64::MAX)]
        max: i64,
        #[command(flatten)]
        draw: DrawArgs,
    },
    /// Uniform reals in the closed range [min, max].
    Real {
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        min: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 1.0)]
        max: f64,
        #[command(flatten)]
        draw: DrawArgs,
    },
    /// Print the given items in random order.
    Shuffle {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(required = true)]
        items: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct DrawArgs {
    #[arg(long, default_value_t = 1)]
    pub count: usize,
    /// Seed for a reproducible sequence.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct TimeArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PrintArgs {
    #[arg(long, value_enum)]
    pub color: Option<Color>,
    #[arg(long, value_enum)]
    pub modifier: Option<Modifier>,
    /// Separator written after the text.
    #[arg(long, default_value = "\n")]
    pub sep: String,
    #[arg(required = true)]
    pub text: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum FileCommand {
    /// Print a file's contents.
    Read { path: PathBuf },
    /// Append text to an existing file.
    Append(FileTextArgs),
    /// Create a new file holding the given text. Existing files are kept.
    Create(FileTextArgs),
}

#[derive(Args, Debug)]
pub struct FileTextArgs {
    pub path: PathBuf,
    /// Words joined with single spaces.
    pub text: Vec<String>,
    /// Written after the text.
    #[arg(long, default_value = "\n")]
    pub sep: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Show,
    Path,
    /// Print the example configuration.
    Example,
    Generate {
        #[arg()]
        path: Option<PathBuf>,
        #[arg(long = "force", default_value_t = false)]
        force: bool,
    },
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
