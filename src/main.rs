use anyhow::Context;
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use wavecat::cli::{Cli, TextSource, write_output};
use wavecat::config::Config;
use wavecat::logging;
use wavecat::render::{Animate, AnsiSink, CancelToken, OsEntropy};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::discover(cli.config.as_deref())?;
    let mut entropy = OsEntropy::new();
    let settings = cli.resolve(&config, &mut entropy)?;
    let text = settings.source.as_ref().map(TextSource::load).transpose()?;

    let cancel = CancelToken::new();
    if text.is_some() && settings.render.animate == Animate::Loop {
        install_signal_handlers(&cancel).context("installing signal handlers")?;
    }

    let stdout = io::stdout();
    let mut sink = AnsiSink::new(BufWriter::new(stdout.lock()));
    write_output(&settings, text.as_deref(), &mut entropy, &mut sink, &cancel).context("writing output")?;
    Ok(())
}

/// The first signal stops the loop after the current frame, a second one exits right away.
fn install_signal_handlers(cancel: &CancelToken) -> io::Result<()> {
    for signal in [SIGINT, SIGTERM] {
        flag::register_conditional_shutdown(signal, 1, cancel.flag())?;
        flag::register(signal, cancel.flag())?;
    }
    Ok(())
}
