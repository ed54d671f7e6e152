//! Conversions from domain types to the DTOs in the `shared` crate.

pub mod saving_mapper;
pub mod summary_mapper;

pub use saving_mapper::SavingMapper;
pub use summary_mapper::SummaryMapper;
