//! Data feeds behind the signal sources.
//!
//! - Social streams: StockTwits over HTTP, or snapshot files
//! - Headlines and forum posts: snapshot files
//! - Analyst consensus: snapshot files

mod snapshot;
mod stocktwits;
mod types;

pub use snapshot::{SnapshotFeed, TextKind, TickerSnapshot};
pub use stocktwits::StockTwitsClient;
pub use types::{
    AnalystSnapshot, MessageTag, RatingFeed, SocialFeed, SocialMessage, TextFeed,
};
