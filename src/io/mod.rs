#[cfg(feature = "arrow")]
pub mod arrow;

#[cfg(feature = "csv")]
pub mod csv;

#[cfg(feature = "parquet")]
pub mod parquet;
