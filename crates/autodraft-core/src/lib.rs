// Library root: re-exports all modules so integration tests and the host
// application can access the crate's public API.

pub mod api;
pub mod availability;
pub mod draft;
pub mod rankings;
pub mod simulation;
pub mod strategy;
pub mod variability;
