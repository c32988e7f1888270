// Input boundary: turning provider responses (or the mock source) into the
// ordered OHLCV series the indicator engine consumes.

pub mod mock;
pub mod normalize;

pub use mock::generate_mock_ohlcv;
pub use normalize::{
    from_market_chart, from_ohlc_rows, normalize_timestamp, parse_provider_body, sort_and_dedup,
};
