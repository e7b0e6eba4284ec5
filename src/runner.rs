use std::path::PathBuf;
use std::process::Command as ProcessCommand;

use anyhow::{Context, Result, anyhow, bail};
use camino::Utf8PathBuf;
use tracing::{debug, info};

use crate::ansi::{Color, Style};
use crate::cli::{
    BrowseArgs, Cli, Command, ConfigCommand, DrawArgs, FileCommand, FileTextArgs, PrintArgs,
    RandomCommand, ReadIntArgs, TimeArgs,
};
use crate::config::{self, ConfigPathSource, ToolsConfig};
use crate::console::{Console, ConsoleOptions};
use crate::files::{self, TextFile};
use crate::navigator::{BrowseOptions, Navigator};
use crate::random::{self, RandomGenerator};
use crate::templates;
use crate::timer::Stopwatch;
use crate::util;

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);
    ctx.apply_chdir()?;

    match cli.command {
        Command::Config { command } => handle_config(&ctx, command),
        other => {
            let state = AppState::new(ctx)?;
            handle_with_state(&state, other)
        }
    }
}

fn handle_with_state(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Browse(args) => handle_browse(state, args),
        Command::ReadInt(args) => handle_read_int(state, args),
        Command::Random { command } => handle_random(command),
        Command::Time(args) => handle_time(args),
        Command::Print(args) => handle_print(state, args),
        Command::File { command } => handle_file(command),
        Command::Config { .. } => unreachable!("config commands handled earlier"),
    }
}

fn handle_browse(state: &AppState, args: BrowseArgs) -> Result<()> {
    let options = browse_options(state.config.browse_options(), &args);
    let start = match args.start.or_else(|| {
        state
            .config
            .browser
            .start_dir
            .clone()
            .map(Utf8PathBuf::into_std_path_buf)
    }) {
        Some(dir) => util::fs::canonical_dir(&dir)?,
        None => util::fs::canonical_dir(util::fs::current_working_dir()?.as_std_path())?,
    };
    debug!(start = %start, ?options, "starting browser");

    let mut console = Console::stdio(state.console_options());
    let mut navigator = Navigator::new(start, options);
    match navigator.run(&mut console)? {
        Some(path) => console.println(path.as_str(), Style::PLAIN),
        None => {
            info!("no selection made");
            Ok(())
        }
    }
}

/// Command-line switches can only turn features on over the config values.
fn browse_options(mut options: BrowseOptions, args: &BrowseArgs) -> BrowseOptions {
    options.allow_dir_select |= args.select_dir;
    options.sort_entries |= args.sort;
    if args.hide_hidden {
        options.show_hidden = false;
    }
    options
}

fn handle_read_int(state: &AppState, args: ReadIntArgs) -> Result<()> {
    let mut console = Console::stdio(state.console_options());
    console.prompt(&args.prompt, Style::color(Color::Green))?;
    let value = console.read_int()?;
    console.println(&value.to_string(), Style::PLAIN)
}

fn handle_random(command: RandomCommand) -> Result<()> {
    match command {
        RandomCommand::Int { min, max, draw } => print_draws(min, max, &draw),
        RandomCommand::Real { min, max, draw } => print_draws(min, max, &draw),
        RandomCommand::Shuffle { seed, mut items } => {
            match seed {
                Some(seed) => random::shuffle_with_seed(&mut items, seed),
                None => random::shuffle(&mut items),
            }
            for item in items {
                println!("{}", item);
            }
            Ok(())
        }
    }
}

fn print_draws<T>(min: T, max: T, draw: &DrawArgs) -> Result<()>
where
    T: rand::distr::uniform::SampleUniform + PartialOrd + Copy + std::fmt::Display,
{
    let mut generator = match draw.seed {
        Some(seed) => RandomGenerator::with_seed(min, max, seed)?,
        None => RandomGenerator::new(min, max)?,
    };
    for value in generator.take(draw.count) {
        println!("{}", value);
    }
    Ok(())
}

fn handle_time(args: TimeArgs) -> Result<()> {
    let argv = args.command;
    if argv.is_empty() {
        bail!("no command given to time");
    }

    let mut stopwatch = Stopwatch::started();
    let status = run_process(&argv)?;
    stopwatch.stop();
    let elapsed = stopwatch.take_elapsed_secs()?;

    println!("Elapsed: {} s", elapsed);
    if status.success() {
        Ok(())
    } else {
        bail!(
            "command `{}` failed with exit code {:?}",
            format_command(&argv),
            status.code()
        )
    }
}

fn handle_print(state: &AppState, args: PrintArgs) -> Result<()> {
    let style = Style {
        color: args.color,
        modifier: args.modifier,
    };
    let mut console = Console::stdio(state.console_options());
    console.print_text(&args.text.join(" "), style, &args.sep)?;
    console.flush()
}

fn handle_file(command: FileCommand) -> Result<()> {
    match command {
        FileCommand::Read { path } => {
            let file = files::read_file(&utf8_path(path)?)?;
            print!("{}", file.text);
            Ok(())
        }
        FileCommand::Append(args) => {
            let (path, text) = file_text(args)?;
            files::append_file(&path, &text)?;
            info!(path = %path, bytes = text.len(), "appended to file");
            Ok(())
        }
        FileCommand::Create(args) => {
            let (path, text) = file_text(args)?;
            files::create_file_with(&TextFile::new(path.clone(), text))?;
            println!("Created {}", path);
            Ok(())
        }
    }
}

fn file_text(args: FileTextArgs) -> Result<(Utf8PathBuf, String)> {
    let mut text = args.text.join(" ");
    text.push_str(&args.sep);
    Ok((utf8_path(args.path)?, text))
}

fn utf8_path(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|path| anyhow!("{} is not valid UTF-8", path.display()))
}

fn handle_config(ctx: &CliContext, command: Option<ConfigCommand>) -> Result<()> {
    let resolved = ctx.resolve_config_path()?;
    let config_path = resolved.path;
    match command {
        Some(ConfigCommand::Path) => {
            println!("Config path: {} ({})", config_path, resolved.source.as_str());
            Ok(())
        }
        None | Some(ConfigCommand::Show) => {
            if !config_path.exists() {
                println!("No config found at {}; using defaults.", config_path);
                println!("Use `ctools config generate` to scaffold one.");
                println!("{}", config::format_summary(&ToolsConfig::default()));
                return Ok(());
            }

            let config = config::load_from_path(&config_path)?;
            println!("Config path: {} ({})", config_path, resolved.source.as_str());
            println!("{}", config::format_summary(&config));
            Ok(())
        }
        Some(ConfigCommand::Example) => {
            print!("{}", templates::get_string("config/example.config.toml")?);
            Ok(())
        }
        Some(ConfigCommand::Generate { path, force }) => {
            let target = match path {
                Some(path) => Utf8PathBuf::from_path_buf(path)
                    .map_err(|_| anyhow!("config generate path must be valid UTF-8"))?,
                None => config_path.clone(),
            };
            config::write_example_config(&target, force)?;
            if force {
                println!("Overwrote config at {}", target);
            } else {
                println!("Wrote example config to {}", target);
            }
            Ok(())
        }
    }
}

fn run_process(argv: &[String]) -> Result<std::process::ExitStatus> {
    let mut command = ProcessCommand::new(&argv[0]);
    if argv.len() > 1 {
        command.args(&argv[1..]);
    }
    command
        .status()
        .with_context(|| format!("executing `{}`", format_command(argv)))
}

fn format_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.chars().any(|c| c.is_whitespace()) {
                let escaped = arg.replace('"', "\\\"");
                format!("\"{}\"", escaped)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

struct CliContext {
    chdir: Option<PathBuf>,
    config: Option<PathBuf>,
    no_color: bool,
}

impl CliContext {
    fn apply_chdir(&self) -> Result<()> {
        if let Some(path) = &self.chdir {
            std::env::set_current_dir(path)
                .with_context(|| format!("changing directory to {}", path.display()))?;
        }
        Ok(())
    }

    fn resolve_config_path(&self) -> Result<config::ResolvedConfigPath> {
        let explicit = match &self.config {
            Some(path) => Some(
                Utf8PathBuf::from_path_buf(path.clone())
                    .map_err(|_| anyhow!("config path must be valid UTF-8"))?,
            ),
            None => None,
        };
        let cwd = util::fs::current_working_dir()?;
        config::resolve_path(explicit.as_deref(), &cwd)
    }
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            chdir: cli.chdir.clone(),
            config: cli.config.clone(),
            no_color: cli.no_color,
        }
    }
}

struct AppState {
    ctx: CliContext,
    config: ToolsConfig,
}

impl AppState {
    fn new(ctx: CliContext) -> Result<Self> {
        let resolved = ctx.resolve_config_path()?;
        // An explicitly named config must exist; discovered ones are optional.
        let config = if resolved.source == ConfigPathSource::Explicit {
            config::load_from_path(&resolved.path)?
        } else {
            config::load_or_default(&resolved.path)?
        };
        debug!(path = %resolved.path, source = resolved.source.as_str(), "loaded config");
        Ok(Self { ctx, config })
    }

    fn console_options(&self) -> ConsoleOptions {
        let mut options = self.config.console_options();
        if self.ctx.no_color {
            options.color = false;
        }
        options
    }
}
