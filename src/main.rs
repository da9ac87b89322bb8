//! `vet`: manage the doctors and pets of a veterinary clinic from the command
//! line.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
