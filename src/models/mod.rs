mod index_series;
mod movers;

pub use index_series::{IndexSeries, NormalizedPoint};
pub use movers::{MoverRecord, MoversReport};
