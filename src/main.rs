mod cli;
mod core;
mod report;

fn main() -> anyhow::Result<()> {
    cli::run::entry()
}
