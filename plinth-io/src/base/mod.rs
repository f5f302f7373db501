use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use plinth_core::math::Point;

use crate::ascii::{
    read_obj_vertices_from_path, read_xyz_from_path, write_obj_vertices_to_path, write_xyz_to_path,
};

/// Number of decimal places written by [write_all]
pub const DEFAULT_PRECISION: usize = 6;

/// The file formats that plinth can read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointFormat {
    /// Plain text, one `x y z` point per line
    Xyz,
    /// The vertex records of a Wavefront OBJ file
    Obj,
}

impl PointFormat {
    /// Determines the format from the file extension of `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .ok_or_else(|| anyhow!("File {} has no extension", path.display()))?;
        let extension_str = extension.to_str().ok_or_else(|| {
            anyhow!(
                "File extension of path {} is no valid Unicode string",
                path.display()
            )
        })?;
        match extension_str.to_lowercase().as_str() {
            "xyz" | "txt" | "pts" | "csv" => Ok(Self::Xyz),
            "obj" => Ok(Self::Obj),
            _ => bail!("Unsupported file format of file {}", path.display()),
        }
    }
}

impl Display for PointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xyz => write!(f, "xyz"),
            Self::Obj => write!(f, "obj"),
        }
    }
}

impl FromStr for PointFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xyz" => Ok(Self::Xyz),
            "obj" => Ok(Self::Obj),
            _ => bail!("Unknown point format '{}', expected 'xyz' or 'obj'", s),
        }
    }
}

/// Reads all points in the file at `path`. If `format` is `None`, it is determined from the file extension
pub fn read_all<P: AsRef<Path>>(path: P, format: Option<PointFormat>) -> Result<Vec<Point>> {
    let format = match format {
        Some(format) => format,
        None => PointFormat::from_path(path.as_ref())?,
    };
    let points = match format {
        PointFormat::Xyz => read_xyz_from_path(path.as_ref())?,
        PointFormat::Obj => read_obj_vertices_from_path(path.as_ref())?,
    };
    info!(
        "Read {} points from {} ({})",
        points.len(),
        path.as_ref().display(),
        format
    );
    Ok(points)
}

/// Writes `points` to the file at `path` with [DEFAULT_PRECISION]. If `format` is `None`, it is determined from
/// the file extension
pub fn write_all<P: AsRef<Path>>(points: &[Point], path: P, format: Option<PointFormat>) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => PointFormat::from_path(path.as_ref())?,
    };
    let written = match format {
        PointFormat::Xyz => write_xyz_to_path(path.as_ref(), points, DEFAULT_PRECISION),
        PointFormat::Obj => write_obj_vertices_to_path(path.as_ref(), points, DEFAULT_PRECISION),
    };
    written.with_context(|| format!("Failed to write points to {}", path.as_ref().display()))?;
    info!(
        "Wrote {} points to {} ({})",
        points.len(),
        path.as_ref().display(),
        format
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopeguard::defer;
    use std::path::PathBuf;

    fn temp_file_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("plinth_io_{}_{}", std::process::id(), name));
        path
    }

    #[test]
    fn test_format_from_path() -> Result<()> {
        assert_eq!(PointFormat::from_path("scan.xyz")?, PointFormat::Xyz);
        assert_eq!(PointFormat::from_path("dir/scan.TXT")?, PointFormat::Xyz);
        assert_eq!(PointFormat::from_path("scan.obj")?, PointFormat::Obj);
        assert!(PointFormat::from_path("scan.las").is_err());
        assert!(PointFormat::from_path("scan").is_err());
        Ok(())
    }

    #[test]
    fn test_format_from_str() -> Result<()> {
        assert_eq!("xyz".parse::<PointFormat>()?, PointFormat::Xyz);
        assert_eq!("OBJ".parse::<PointFormat>()?, PointFormat::Obj);
        assert!("ply".parse::<PointFormat>().is_err());
        assert_eq!(PointFormat::Obj.to_string(), "obj");
        Ok(())
    }

    #[test]
    fn test_write_and_read_files() -> Result<()> {
        let points = vec![Point::new(0.5, 1.0, -2.0), Point::new(3.0, 4.25, 5.0)];
        for name in ["points.xyz", "points.obj"].iter() {
            let path = temp_file_path(name);
            defer! {
                std::fs::remove_file(&path).expect("Removing temporary file failed");
            }
            write_all(&points, &path, None)?;
            assert_eq!(read_all(&path, None)?, points);
        }
        Ok(())
    }

    #[test]
    fn test_explicit_format_overrides_extension() -> Result<()> {
        let path = temp_file_path("vertices.dat");
        defer! {
            std::fs::remove_file(&path).expect("Removing temporary file failed");
        }
        let points = vec![Point::new(1.0, 2.0, 3.0)];
        assert!(write_all(&points, &path, None).is_err());
        write_all(&points, &path, Some(PointFormat::Obj))?;
        assert_eq!(read_all(&path, Some(PointFormat::Obj))?, points);
        Ok(())
    }
}
