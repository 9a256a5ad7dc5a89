//! CSV export of screening results.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use sentiment_trade_core::{attribute_keys, source_ids as ids, CompositeResult, SourceStatus};

/// Per-ticker detail columns written after the source scores
const DETAIL_COLUMNS: [&str; 5] = [
    "analyst_recommendation",
    "target_upside_pct",
    "analyst_count",
    "social_bullish",
    "social_bearish",
];

/// Writes ranked results as CSV.
///
/// One score column per entry in `source_ids`; a source absent from a
/// result is left blank. Analyst consensus and social counts follow, blank
/// when the source did not report them. Unavailable sources are listed
/// `;`-separated.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_screening<W: Write>(
    writer: W,
    results: &[CompositeResult],
    source_ids: &[&str],
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["rank", "ticker", "composite_score", "signal", "total_buzz"];
    header.extend_from_slice(source_ids);
    header.extend_from_slice(&DETAIL_COLUMNS);
    header.push("unavailable_sources");
    csv.write_record(&header)?;

    for (idx, result) in results.iter().enumerate() {
        let mut record = vec![
            (idx + 1).to_string(),
            result.ticker.clone(),
            format!("{:.2}", result.composite_score),
            result.signal.to_string(),
            result.total_buzz.to_string(),
        ];
        record.extend(
            source_ids
                .iter()
                .map(|id| result.source_score(id).map_or_else(String::new, |s| format!("{s:.2}"))),
        );
        record.extend(detail_fields(result));
        record.push(result.unavailable_sources().join(";"));
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

fn detail_fields(result: &CompositeResult) -> [String; 5] {
    let analyst = |key: &str| {
        result
            .attribute(ids::ANALYST, key)
            .map_or_else(String::new, ToString::to_string)
    };
    let (bullish, bearish) = match result.per_source.get(ids::SOCIAL) {
        Some(social) if social.status == SourceStatus::Ok => (
            social.bullish_count.map_or_else(String::new, |c| c.to_string()),
            social.bearish_count.map_or_else(String::new, |c| c.to_string()),
        ),
        _ => (String::new(), String::new()),
    };

    [
        analyst(attribute_keys::RECOMMENDATION),
        analyst(attribute_keys::TARGET_UPSIDE_PCT),
        analyst(attribute_keys::ANALYST_COUNT),
        bullish,
        bearish,
    ]
}

/// Writes ranked results to a CSV file at `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn export_screening(
    path: impl AsRef<Path>,
    results: &[CompositeResult],
    source_ids: &[&str],
) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_screening(file, results, source_ids)?;
    tracing::info!(path = %path.display(), rows = results.len(), "Exported screening results");
    Ok(())
}
