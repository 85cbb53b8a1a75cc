//! Esri ASCII grid writing
//!
//! Plain-text raster format understood by most GIS packages. Header rows
//! carry the grid placement; data rows run north to south, matching the
//! in-memory row order of north-up rasters.

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default no-data value written when the raster carries none
const DEFAULT_NODATA: f64 = -9999.0;

/// Write a Raster to an Esri ASCII grid file
pub fn write_ascii_grid<T, P>(raster: &Raster<T>, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    write_ascii_grid_to(raster, BufWriter::new(file))
}

/// Write a Raster as an Esri ASCII grid to any writer
pub fn write_ascii_grid_to<T, W>(raster: &Raster<T>, mut writer: W) -> Result<()>
where
    T: RasterElement,
    W: Write,
{
    let gt = raster.transform();
    let cell = gt.pixel_width;

    if (gt.pixel_height.abs() - cell).abs() > 1e-9 * cell.abs().max(1.0) {
        return Err(Error::invalid_parameter(
            "pixel_height",
            gt.pixel_height,
            "ASCII grids require square cells",
        ));
    }

    let (rows, cols) = raster.shape();
    let nodata = raster
        .nodata()
        .and_then(|v| v.to_f64())
        .unwrap_or(DEFAULT_NODATA);

    // lower-left corner of the covered area
    let xll = gt.origin_x;
    let yll = gt.origin_y + rows as f64 * gt.pixel_height;

    writeln!(writer, "ncols {}", cols)?;
    writeln!(writer, "nrows {}", rows)?;
    writeln!(writer, "xllcorner {}", xll)?;
    writeln!(writer, "yllcorner {}", yll)?;
    writeln!(writer, "cellsize {}", cell)?;
    writeln!(writer, "NODATA_value {}", nodata)?;

    for row in 0..rows {
        let mut line = String::with_capacity(cols * 8);
        for col in 0..cols {
            if col > 0 {
                line.push(' ');
            }
            let value = raster.get(row, col)?.to_f64().unwrap_or(nodata);
            line.push_str(&format!("{}", value));
        }
        writeln!(writer, "{}", line)?;
    }

    writer.flush()?;
    Ok(())
}
