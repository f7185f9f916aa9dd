pub mod pools;
pub mod tradable;
pub mod trade;
