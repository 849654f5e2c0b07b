use anyhow::Result;
use abtree::search::Variant;
use abtree::uci::UciEngine;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "UCI front-end for the abtree alpha-beta engine", long_about = None)]
struct Args {
    /// Engine variant: plain, self-destructing, storing:N, ordered-self-destructing
    #[arg(long, default_value = "storing:2")]
    variant: Variant,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut engine = UciEngine::with_variant(args.variant);
    engine.run_loop()?;
    Ok(())
}
