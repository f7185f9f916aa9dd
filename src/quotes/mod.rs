pub mod api;

pub use api::{decode_transaction, parse_quote, RaydiumApi};
