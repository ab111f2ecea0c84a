pub mod exif;
pub mod geo;
pub mod mission;
pub mod services;
