pub mod api;
pub mod entities;
pub mod error;
pub mod external;
pub mod pipeline;
pub mod render;
pub mod tags;
