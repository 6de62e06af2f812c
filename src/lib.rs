pub mod breakpoints;
pub mod common;
pub mod crossing;
pub mod error;
pub mod founders;
pub mod meiosis;
pub mod output;
pub mod probability;
pub mod reference;
pub mod simulate;

pub use common::{ChromNumber, Chromosome, DonorLabel, PopulationType, SimParams, BIN_SIZE};
pub use error::Error;

use log::info;

use crate::founders::FounderSet;
use crate::reference::CentromereTable;

/// Load inputs, simulate lines, and write the breakpoint table.
pub fn run(params: &SimParams) -> anyhow::Result<()> {
    info!("ril_sim v{}", env!("CARGO_PKG_VERSION"));
    info!("founders: {}", params.founders.display());
    info!("centromeres: {}", params.centromeres.display());

    let pool = FounderSet::from_path(&params.founders)?;
    let table = CentromereTable::from_path(&params.centromeres)?;
    let config = params.to_config();

    let lines = simulate::simulate_lines(&config, &pool, &table)?;
    output::write_lines(&params.out, &lines)?;
    Ok(())
}
