//! Ledger CSV read/write and suspicion table output.
//!
//! Ledger CSV uses the snake-case column names of [`LedgerField`]. Only the
//! five core columns are required on input; missing enrichment columns
//! read as defaults.

use crate::table::SuspicionTable;
use arbsim_core::{Action, AgentId, LedgerField, TradeRecord};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerIoError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger is missing required column '{0}'")]
    MissingColumn(String),
}

fn format_opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Write the full ledger column set.
pub fn write_ledger<W: Write>(writer: W, trades: &[TradeRecord]) -> Result<(), LedgerIoError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(LedgerField::ALL.iter().map(|f| f.as_str()))?;
    for t in trades {
        wtr.write_record([
            t.tick.to_string(),
            t.agent_id.to_string(),
            t.strategy.clone(),
            t.action.as_str().to_string(),
            t.units.to_string(),
            t.price.to_string(),
            t.notional.to_string(),
            t.best_bid.to_string(),
            t.best_ask.to_string(),
            t.mid.to_string(),
            t.spread.to_string(),
            t.volatility.to_string(),
            format_opt(t.moving_average),
            format_opt(t.ma_deviation),
            t.cash_before.to_string(),
            t.cash_after.to_string(),
            t.holdings_before.to_string(),
            t.holdings_after.to_string(),
            t.cumulative_pnl.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_ledger_file(path: &Path, trades: &[TradeRecord]) -> Result<(), LedgerIoError> {
    write_ledger(std::fs::File::create(path)?, trades)
}

struct Row<'a> {
    record: &'a csv::StringRecord,
    columns: &'a HashMap<LedgerField, usize>,
}

impl Row<'_> {
    fn raw(&self, field: LedgerField) -> Option<&str> {
        let i = *self.columns.get(&field)?;
        self.record.get(i).map(str::trim)
    }

    fn key<T: std::str::FromStr>(&self, field: LedgerField) -> Option<T> {
        self.raw(field)?.parse().ok()
    }

    fn number(&self, field: LedgerField) -> f64 {
        self.raw(field)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|x| x.is_finite())
            .unwrap_or(0.0)
    }

    fn optional(&self, field: LedgerField) -> Option<f64> {
        match self.raw(field) {
            None | Some("") => None,
            Some(_) => Some(self.number(field)),
        }
    }

    /// Whole non-negative count. `5.0` reads as 5; fractions and values
    /// beyond `u64` read as 0.
    fn count(&self, field: LedgerField) -> u64 {
        let Some(s) = self.raw(field) else {
            return 0;
        };
        if let Ok(n) = s.parse::<u64>() {
            return n;
        }
        match s.parse::<f64>() {
            Ok(x) if x >= 0.0 && x.fract() == 0.0 && x < u64::MAX as f64 => x as u64,
            _ => 0,
        }
    }

    /// `None` when an identifying column cannot be parsed.
    fn trade(&self) -> Option<TradeRecord> {
        let tick: u64 = self.key(LedgerField::Tick)?;
        let agent: u32 = self.key(LedgerField::AgentId)?;
        let action: Action = self.key(LedgerField::Action)?;
        let units: u64 = self.key(LedgerField::Units)?;
        if units == 0 {
            return None;
        }
        Some(TradeRecord {
            tick,
            agent_id: AgentId(agent),
            strategy: self.raw(LedgerField::Strategy).unwrap_or("").to_string(),
            action,
            units,
            price: self.number(LedgerField::Price),
            notional: self.number(LedgerField::Notional),
            best_bid: self.number(LedgerField::BestBid),
            best_ask: self.number(LedgerField::BestAsk),
            mid: self.number(LedgerField::Mid),
            spread: self.number(LedgerField::Spread),
            volatility: self.number(LedgerField::Volatility),
            moving_average: self.optional(LedgerField::MovingAverage),
            ma_deviation: self.optional(LedgerField::MaDeviation),
            cash_before: self.number(LedgerField::CashBefore),
            cash_after: self.number(LedgerField::CashAfter),
            holdings_before: self.count(LedgerField::HoldingsBefore),
            holdings_after: self.count(LedgerField::HoldingsAfter),
            cumulative_pnl: self.number(LedgerField::CumulativePnl),
        })
    }
}

/// Read a ledger leniently.
///
/// Fails only if a required column is absent from the header. Rows whose
/// identifying columns do not parse are skipped with a warning; unparseable
/// numeric values become 0.0. Unknown columns are ignored.
pub fn read_ledger<R: Read>(reader: R) -> Result<Vec<TradeRecord>, LedgerIoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut columns = HashMap::new();
    for (i, name) in rdr.headers()?.iter().enumerate() {
        if let Ok(field) = name.parse::<LedgerField>() {
            columns.entry(field).or_insert(i);
        }
    }
    if let Some(missing) = LedgerField::REQUIRED
        .iter()
        .find(|f| !columns.contains_key(*f))
    {
        return Err(LedgerIoError::MissingColumn(missing.as_str().to_string()));
    }

    let mut trades = Vec::new();
    let mut skipped = 0usize;
    for (line, record) in rdr.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::warn!("ledger row {}: {e}; skipped", line + 2);
                skipped += 1;
                continue;
            }
        };
        let row = Row {
            record: &record,
            columns: &columns,
        };
        match row.trade() {
            Some(trade) => trades.push(trade),
            None => {
                log::warn!("ledger row {}: unparseable tick/agent/action/units; skipped", line + 2);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        log::warn!("skipped {skipped} malformed ledger rows");
    }
    log::info!("read {} trades", trades.len());
    Ok(trades)
}

pub fn read_ledger_file(path: &Path) -> Result<Vec<TradeRecord>, LedgerIoError> {
    read_ledger(std::fs::File::open(path)?)
}

/// Header `tick,<agent ids...>`, one row per tick, fixed decimals.
pub fn write_suspicion<W: Write>(
    writer: W,
    table: &SuspicionTable,
    decimals: usize,
) -> Result<(), LedgerIoError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["tick".to_string()];
    header.extend(table.agents().iter().map(|a| a.to_string()));
    wtr.write_record(&header)?;
    for (tick, row) in table.rows() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(tick.to_string());
        record.extend(row.iter().map(|p| format!("{p:.decimals$}")));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_suspicion_file(
    path: &Path,
    table: &SuspicionTable,
    decimals: usize,
) -> Result<(), LedgerIoError> {
    write_suspicion(std::fs::File::create(path)?, table, decimals)
}
