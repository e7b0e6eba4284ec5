mod ansi;
mod cli;
mod config;
mod console;
mod files;
mod logging;
mod navigator;
mod random;
mod runner;
mod templates;
mod timer;
mod util;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}
