use std::io;

use clap::Parser;
use plainpaste_cli::{logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let styled = !cli.no_color && console::colors_enabled();
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    run(&cli, &mut stdin, &mut stdout, styled)
}
