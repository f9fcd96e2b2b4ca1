use std::{
    fs::File,
    io::{BufRead, BufReader, stdin},
    path::{Path, PathBuf},
    process::exit,
    time::SystemTime,
};

use chess_arbiter::{
    GameRegistry,
    commands::{CommandInterface, CommandResult},
};
use clap::Parser;
use log::{LevelFilter, error, info};

build_info::build_info!(fn build_info);

#[derive(Parser, Debug)]
#[command(version, about = "Referee for chess games played one text command at a time")]
struct Args {
    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    #[arg(long, default_value = "chess-arbiter.log")]
    log_file: PathBuf,

    /// Also write log lines to stderr
    #[arg(long)]
    log_stderr: bool,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Create a game with this name before reading any commands
    #[arg(long)]
    name: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logger(args.log_level, &args.log_file, args.log_stderr) {
        eprintln!("Failed to set up logging to {}: {e}", args.log_file.display());
        exit(1);
    }
    log_panics::init();

    let info = build_info();
    info!("Starting {} {}", info.crate_info.name, info.crate_info.version);

    let mut registry = GameRegistry::new();
    if let Some(name) = &args.name {
        match registry.create(name) {
            Ok(id) => println!("created game {id} {name}"),
            Err(e) => error!("Could not create game '{name}': {e}"),
        }
    }

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                error!("Failed to open script {}: {e}", path.display());
                exit(1);
            }
        },
        None => Box::new(stdin().lock()),
    };

    let mut cli = CommandInterface::new(registry);
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to read command: {e}");
                break;
            }
        };

        match cli.process_command(&line) {
            CommandResult::Output(lines) => {
                for l in lines {
                    println!("{l}");
                }
            }
            CommandResult::Quit => break,
        }
    }

    info!("Exiting with {} games", cli.registry().list().len());
}

fn setup_logger(level: LevelFilter, log_file: &Path, to_stderr: bool) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_millis(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(log_file)?);

    if to_stderr {
        dispatch = dispatch.chain(std::io::stderr());
    }

    dispatch.apply()?;
    Ok(())
}
