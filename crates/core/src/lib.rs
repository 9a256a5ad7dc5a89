pub mod config;
pub mod config_loader;
pub mod error;
pub mod metrics;
pub mod metrics_formatter;
pub mod position;
pub mod price;
pub mod signal;
pub mod traits;

pub use config::{
    AppConfig, BacktestConfig, NormalizerConfig, ScoringConfig, ScreeningConfig, ThresholdProfile,
    WeightProfile, WEIGHT_SUM_TOLERANCE,
};
pub use config_loader::ConfigLoader;
pub use error::{BacktestError, ConfigError};
pub use metrics::BacktestMetrics;
pub use metrics_formatter::MetricsFormatter;
pub use position::{EquityPoint, ExitReason, Position, PositionState, Trade};
pub use price::{slice_range, PriceBar};
pub use signal::{
    attribute_keys, source_ids, CanonicalSignal, CompositeResult, RawSignal, SourceScale,
    SourceStatus, TradeSignal,
};
pub use traits::{PriceHistoryProvider, SignalSource};
