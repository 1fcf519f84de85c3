//! Provider adapters implementing [`PriceSource`](crate::data_source::PriceSource).

mod yahoo;

pub use yahoo::YahooPriceSource;
