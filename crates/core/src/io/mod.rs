//! I/O operations for reading and writing geospatial data

mod esri_ascii;
mod geojson;
mod geotiff;

pub use esri_ascii::{write_ascii_grid, write_ascii_grid_to};
pub use geojson::{read_geojson, read_geojson_str};
pub use geotiff::{read_geotiff, read_geotiff_from_buffer, write_geotiff, write_geotiff_to_buffer};
