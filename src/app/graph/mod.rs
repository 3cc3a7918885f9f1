mod build;
mod index;
mod interaction;
mod measure;
mod view;

pub use index::{RelationIndex, ResolvedEdge};
pub use measure::BoxMeasurements;
