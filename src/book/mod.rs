//! Order container and portfolio-level aggregation.
pub mod kernel;
pub mod order;
pub mod order_book;

pub use order::{ClientOrder, OrderQuote, OrderRequest};
pub use order_book::{OrderBook, OrderId, OrderLine, PriceReport, ShockSurface};
