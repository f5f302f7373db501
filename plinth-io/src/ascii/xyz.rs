use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use plinth_core::math::Point;

use super::{for_each_record, format_coordinate, parse_coordinates};

/// Reads a plain text vertex list. Every line that is not empty and does not start with `#` holds one point.
/// Fields are separated by whitespace or commas; the first three fields are x, y and z, the rest is ignored
pub fn read_xyz<R: BufRead>(read: R) -> Result<Vec<Point>> {
    let mut points = vec![];
    for_each_record(read, |record| {
        let fields = record
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty());
        points.push(parse_coordinates(fields)?);
        Ok(())
    })?;
    debug!("Read {} points", points.len());
    Ok(points)
}

/// Like [read_xyz], reading from the file at `path`
pub fn read_xyz_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("Could not open file {}", path.as_ref().display()))?;
    read_xyz(BufReader::new(file))
        .with_context(|| format!("Could not read points from {}", path.as_ref().display()))
}

/// Writes one `x y z` line per point, each coordinate with at most `precision` decimal places
pub fn write_xyz<W: Write>(mut write: W, points: &[Point], precision: usize) -> Result<()> {
    for point in points {
        writeln!(
            write,
            "{} {} {}",
            format_coordinate(point.x, precision),
            format_coordinate(point.y, precision),
            format_coordinate(point.z, precision)
        )?;
    }
    write.flush()?;
    Ok(())
}

/// Like [write_xyz], writing to a newly created file at `path`
pub fn write_xyz_to_path<P: AsRef<Path>>(path: P, points: &[Point], precision: usize) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("Could not open file {} for writing", path.as_ref().display()))?;
    write_xyz(BufWriter::new(file), points, precision)
}
