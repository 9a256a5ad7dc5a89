//! CSV export of trade logs and equity curves.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sentiment_trade_core::{EquityPoint, Trade};

fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_trades<W: Write>(writer: W, trades: &[Trade]) -> Result<()> {
    write_rows(writer, trades)
}

/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_equity<W: Write>(writer: W, curve: &[EquityPoint]) -> Result<()> {
    write_rows(writer, curve)
}

/// Writes the trade log to `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn export_trades(path: impl AsRef<Path>, trades: &[Trade]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_trades(file, trades)?;
    tracing::info!(path = %path.display(), rows = trades.len(), "Exported trade log");
    Ok(())
}

/// Writes the equity curve to `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn export_equity(path: impl AsRef<Path>, curve: &[EquityPoint]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_equity(file, curve)?;
    tracing::info!(path = %path.display(), rows = curve.len(), "Exported equity curve");
    Ok(())
}
