mod bounding_box;
mod coordinates;
mod report;
mod tag;

pub use bounding_box::BoundingBox;
pub use coordinates::Coordinates;
pub use report::{RunReport, SegmentReport, SegmentStatus};
pub use tag::Tag;
