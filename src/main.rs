#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "buswire", about = "Message-bus wire format marshaling tools")]
struct Cli {
	/// Raise log verbosity (`-v` debug, `-vv` trace). `BUSWIRE_LOG` overrides.
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Encode a JSON document typed by a signature.
	Encode(cmd::encode::Args),
	/// Describe the complete types of a signature.
	Signature(cmd::signature::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(command: Commands) -> buswire::wire::Result<()> {
	match command {
		Commands::Encode(args) => cmd::encode::run(args),
		Commands::Signature(args) => cmd::signature::run(args),
	}
}

fn init_tracing(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_env("BUSWIRE_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
