use std::io::BufRead;

use anyhow::{anyhow, Context, Result};
use itertools::Itertools;
use plinth_core::math::Point;

/// Calls `parse_record` for every line of `read` that is neither empty nor a `#` comment. Errors are annotated
/// with the (1-based) line number
pub(crate) fn for_each_record<R: BufRead, F: FnMut(&str) -> Result<()>>(
    read: R,
    mut parse_record: F,
) -> Result<()> {
    for (index, line) in read.lines().enumerate() {
        let line = line.with_context(|| format!("ReadError in line {}.", index + 1))?;
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }
        parse_record(record).with_context(|| format!("ReadError in line {}.", index + 1))?;
    }
    Ok(())
}

/// Parses the first three of `fields` as x, y and z. Any further fields are ignored
pub(crate) fn parse_coordinates<'a, I: Iterator<Item = &'a str>>(fields: I) -> Result<Point> {
    let (x, y, z) = fields
        .take(3)
        .collect_tuple()
        .ok_or_else(|| anyhow!("Expected at least three coordinates"))?;
    Ok(Point::new(
        parse_coordinate(x, 'x')?,
        parse_coordinate(y, 'y')?,
        parse_coordinate(z, 'z')?,
    ))
}

fn parse_coordinate(value: &str, literal: char) -> Result<f64> {
    value
        .parse::<f64>()
        .with_context(|| format!("ParseError at parsing '{}' as {} coordinate.", value, literal))
}

/// Formats `value` with at most `precision` decimal places
pub(crate) fn format_coordinate(value: f64, precision: usize) -> String {
    let formatted = format!("{:.1$}", value, precision);
    trim_unnecessary_tailing_zeros(&formatted).to_string()
}

fn trim_unnecessary_tailing_zeros(slice: &str) -> &str {
    if !slice.contains('.') {
        return slice;
    }
    let mut end = slice.len();
    while slice[..end].ends_with('0') && !slice[..end].ends_with(".0") {
        end -= 1;
    }
    &slice[..end]
}
