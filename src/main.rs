use clap::Parser;

use ril_sim::SimParams;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = SimParams::parse();
    ril_sim::run(&params)
}
