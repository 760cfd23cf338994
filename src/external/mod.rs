pub mod ors;
pub mod overpass;
