use std::fs::OpenOptions;
use std::io::{self, Write};
use std::process::exit;
use std::sync::Arc;

use luatrace_filter::present::TextPresenter;
use luatrace_filter::resolve::WorkspaceResolver;
use luatrace_runner::cli::{apply_cli, parse_args, usage};
use luatrace_runner::config::load_config;
use luatrace_runner::runner::Runner;
use luatrace_runner::sink::WriterSink;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("luatrace-runner: {err}");
            eprint!("{}", usage());
            exit(2);
        }
    };

    if opts.show_help {
        print!("{}", usage());
        return;
    }
    if opts.show_version {
        println!("luatrace-runner {}", env!("CARGO_PKG_VERSION"));
        return;
    }
    if opts.command.is_empty() {
        eprintln!("luatrace-runner: command is required");
        eprint!("{}", usage());
        exit(2);
    }

    let (mut config, _config_path) = match load_config(opts.config_file.as_deref()) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("luatrace-runner: {err}");
            exit(2);
        }
    };
    apply_cli(&mut config, &opts);

    let events_writer: Box<dyn Write + Send> = match &config.events_path {
        Some(path) => {
            let file = match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => file,
                Err(err) => {
                    eprintln!("luatrace-runner: open events file: {err}");
                    exit(2);
                }
            };
            Box::new(file)
        }
        None => Box::new(io::stderr()),
    };

    let mut runner = Runner::new(opts.command.clone());
    runner.event_sink = Arc::new(WriterSink::new(events_writer));
    runner.resolver = Arc::new(WorkspaceResolver::new(config.root.clone()));
    runner.presenter = Arc::new(TextPresenter::new(Box::new(io::stdout())));
    runner.output_writer = if config.echo {
        Box::new(io::stdout())
    } else {
        Box::new(io::sink())
    };

    match runner.run() {
        Ok(code) => exit(code),
        Err(err) => {
            eprintln!("luatrace-runner: {err}");
            exit(1);
        }
    }
}
