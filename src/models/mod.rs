pub mod cell;
pub mod observation;

pub use cell::AggregatedCell;
pub use observation::{DropReason, Observation, RawObservation};
