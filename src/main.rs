use clap::Parser;
use tracing_subscriber::EnvFilter;

use wlmark::{wayland, Outcome};

#[derive(Parser)]
#[command(name = "wlmark")]
#[command(about = "Drag-select a screen region on Wayland and print its geometry", version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "wlmark=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match wayland::run() {
        // Result goes to stdout as "X,Y WxH"; everything else is stderr.
        Ok(Outcome::Selected(rect)) => println!("{rect}"),
        Ok(Outcome::Cancelled) => {
            eprintln!("selection cancelled");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}
