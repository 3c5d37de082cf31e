//! Run artifact bundle.
//!
//! Each run gets a directory `{label}_{timestamp}/` under the output dir:
//! - `manifest.json`: configs, seed, run id, final wealth
//! - `ledger.csv`: the full trade ledger
//! - `ticks.csv`: per-tick market summary
//! - `suspicion.csv`: detection output, when detection ran

use anyhow::{Context, Result};
use arbsim_core::simulation::{AgentWealth, SimulationResult, TickSummary};
use arbsim_core::SimConfig;
use arbsim_detect::{write_ledger_file, write_suspicion_file, DetectionConfig, SuspicionTable};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub run_id: &'a str,
    pub run_index: u64,
    pub seed: u64,
    pub simulation: &'a SimConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection: Option<&'a DetectionConfig>,
    pub trades: usize,
    pub units_traded: u64,
    pub final_price: f64,
    pub final_wealth: &'a [AgentWealth],
}

pub fn export_ticks_csv(ticks: &[TickSummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for t in ticks {
        wtr.serialize(t)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Create `{label}_{timestamp}` under `output_dir`, adding a numeric suffix
/// if a run in the same second already took the name.
pub fn create_run_dir(output_dir: &Path, label: &str) -> Result<PathBuf> {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let mut run_dir = output_dir.join(format!("{label}_{stamp}"));
    let mut n = 1;
    while run_dir.exists() {
        run_dir = output_dir.join(format!("{label}_{stamp}_{n}"));
        n += 1;
    }
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;
    Ok(run_dir)
}

pub fn save_artifacts(
    run_dir: &Path,
    run_index: u64,
    config: &SimConfig,
    result: &SimulationResult,
    detection: Option<(&DetectionConfig, &SuspicionTable)>,
) -> Result<()> {
    let manifest = Manifest {
        run_id: &result.run_id,
        run_index,
        seed: result.seed,
        simulation: config,
        detection: detection.map(|(c, _)| c),
        trades: result.ledger.len(),
        units_traded: result.total_units(),
        final_price: result.final_price,
        final_wealth: &result.final_wealth,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(run_dir.join("manifest.json"), json)?;

    write_ledger_file(&run_dir.join("ledger.csv"), &result.ledger)?;
    std::fs::write(run_dir.join("ticks.csv"), export_ticks_csv(&result.ticks)?)?;

    if let Some((config, table)) = detection {
        write_suspicion_file(&run_dir.join("suspicion.csv"), table, config.output_decimals)?;
    }
    Ok(())
}
