use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use plinth_core::math::Point;

use super::{for_each_record, format_coordinate, parse_coordinates};

/// Reads the vertex positions of a Wavefront OBJ file. Only `v x y z [w]` records are used, trailing vertex
/// colors are ignored. Faces, normals, texture coordinates and all other records are skipped
pub fn read_obj_vertices<R: BufRead>(read: R) -> Result<Vec<Point>> {
    let mut vertices = vec![];
    let mut skipped_records = 0;
    for_each_record(read, |record| {
        let mut fields = record.split_whitespace();
        if fields.next() == Some("v") {
            vertices.push(parse_coordinates(fields)?);
        } else {
            skipped_records += 1;
        }
        Ok(())
    })?;
    debug!(
        "Read {} vertices, skipped {} other records",
        vertices.len(),
        skipped_records
    );
    Ok(vertices)
}

/// Like [read_obj_vertices], reading from the file at `path`
pub fn read_obj_vertices_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("Could not open file {}", path.as_ref().display()))?;
    read_obj_vertices(BufReader::new(file))
        .with_context(|| format!("Could not read vertices from {}", path.as_ref().display()))
}

/// Writes `points` as an OBJ file that consists only of `v` records
pub fn write_obj_vertices<W: Write>(mut write: W, points: &[Point], precision: usize) -> Result<()> {
    writeln!(write, "# {} vertices", points.len())?;
    for point in points {
        writeln!(
            write,
            "v {} {} {}",
            format_coordinate(point.x, precision),
            format_coordinate(point.y, precision),
            format_coordinate(point.z, precision)
        )?;
    }
    write.flush()?;
    Ok(())
}

/// Like [write_obj_vertices], writing to a newly created file at `path`
pub fn write_obj_vertices_to_path<P: AsRef<Path>>(
    path: P,
    points: &[Point],
    precision: usize,
) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("Could not open file {} for writing", path.as_ref().display()))?;
    write_obj_vertices(BufWriter::new(file), points, precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_CORNER: &str = "# exported mesh
mtllib scan.mtl
o scan
v 0.0 0.0 0.0
v 1.0 0.0 0.0 0.8 0.2 0.2
vt 0.5 0.5
vn 0.0 1.0 0.0
v 0.0 1.0 0.0 1.0
g floor
f 1/1/1 2/1/1 3/1/1
";

    #[test]
    fn test_read_obj_vertices() -> Result<()> {
        let vertices = read_obj_vertices(CUBE_CORNER.as_bytes())?;
        assert_eq!(
            vertices,
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_read_obj_invalid_vertex() {
        let error = read_obj_vertices("v 1 2 3\nvn 0 0 1\nv 1 2\n".as_bytes()).unwrap_err();
        assert!(format!("{:?}", error).contains("ReadError in line 3."));
    }

    #[test]
    fn test_write_obj_vertices() -> Result<()> {
        let points = vec![Point::new(1.0, 2.0, 3.5)];
        let mut buffer = vec![];
        write_obj_vertices(&mut buffer, &points, 3)?;
        let written = String::from_utf8(buffer)?;
        assert_eq!(written, "# 1 vertices\nv 1.0 2.0 3.5\n");
        assert_eq!(read_obj_vertices(written.as_bytes())?, points);
        Ok(())
    }
}
