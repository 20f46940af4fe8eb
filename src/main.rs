use clap::{App, Arg, ArgAction, ArgMatches, SubCommand};

use chrono::prelude::*;
use log::error;
use simplelog::*;

use std::fs::File;
use std::path::Path;
use std::process;

pub mod commands;
pub mod linode;
pub mod utils;

fn init_logger(matches: &ArgMatches, command: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level = if matches.get_one::<bool>("verbose").copied().unwrap_or(false) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(dir) = matches.get_one::<String>("log-file") {
        let dt = Local::now();
        let path = Path::new(dir).join(format!(
            "ipfence_{}_{}.log",
            command,
            dt.format("%Y_%m_%d_%H_%M_%S")
        ));
        loggers.push(WriteLogger::new(
            LevelFilter::Info,
            Config::default(),
            File::create(path)?,
        ));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn main() {
    let app = App::new("ipfence")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Points a Linode Cloud Firewall inbound rule at this machine's public IPv4 address")
        .arg(
            Arg::with_name("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .global(true)
                .help("Config file to use instead of config.json next to the executable"),
        )
        .arg(
            Arg::with_name("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Find and rewrite the rule but do not persist it"),
        )
        .arg(
            Arg::with_name("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log at debug level"),
        )
        .arg(
            Arg::with_name("log-file")
                .long("log-file")
                .takes_value(true)
                .value_name("DIR")
                .global(true)
                .help("Also write an info log into this directory"),
        )
        .subcommand(
            SubCommand::with_name("update")
                .about("Rewrite the configured rule with the current public IP (default)"),
        )
        .subcommand(SubCommand::with_name("ip").about("Print the current public IP"))
        .subcommand(
            SubCommand::with_name("list").about("List firewalls and their inbound rule labels"),
        )
        .get_matches();

    let (command, cmd) = match app.subcommand() {
        Some((name, cmd)) => (name, cmd),
        None => ("update", &app),
    };

    if let Err(e) = init_logger(cmd, command) {
        eprintln!("Could not initialise logging: {}", e);
        process::exit(1);
    }

    let result = match command {
        "update" => commands::update::main(cmd),
        "ip" => commands::ip::main(),
        "list" => commands::list::main(),
        x => unreachable!("Unknown Command: {}", x),
    };

    if let Err(e) = result {
        error!("{:?} error: {}", e.kind(), e);
        process::exit(1);
    }
}
