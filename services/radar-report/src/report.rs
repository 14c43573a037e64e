//! Text report of a radar volume.

use std::io::{self, Write};

use radar_common::{Field, FieldStatistics, RadarVolume};

/// Write the metadata report: available fields, coordinates, fields,
/// global metadata, scan type and site location, in that order.
pub fn write_report<W: Write + ?Sized>(out: &mut W, volume: &RadarVolume) -> io::Result<()> {
    writeln!(out, "Available fields: {}", quoted_list(volume.field_names()))?;
    writeln!(out, "{}", volume.time)?;
    writeln!(out, "{}", volume.range)?;
    writeln!(out, "{}", format_fields(volume))?;
    writeln!(out, "{}", format_map(volume.metadata.iter()))?;
    writeln!(out, "{}", volume.scan_type)?;
    writeln!(out, "{}", volume.latitude)?;
    writeln!(out, "{}", volume.longitude)?;
    writeln!(out, "{}", volume.altitude)?;
    Ok(())
}

pub fn write_statistics<W: Write + ?Sized>(out: &mut W, stats: &FieldStatistics) -> io::Result<()> {
    writeln!(out, "Reflectivity Statistics:")?;
    writeln!(out, "Mean: {}", stats.mean)?;
    writeln!(out, "Max: {}", stats.max)?;
    writeln!(out, "Min: {}", stats.min)?;
    writeln!(out, "Standard Deviation: {}", stats.std_dev)?;
    Ok(())
}

fn quoted_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let items: Vec<String> = items.into_iter().map(|s| format!("'{}'", s)).collect();
    format!("[{}]", items.join(", "))
}

fn format_map<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> String {
    let entries: Vec<String> = entries.map(|(k, v)| format!("'{}': '{}'", k, v)).collect();
    format!("{{{}}}", entries.join(", "))
}

fn format_field(name: &str, field: &Field) -> String {
    let (rays, gates) = field.shape();
    let masked = field.mask.iter().filter(|m| **m).count();
    let mut attrs: Vec<String> = field
        .attributes
        .iter()
        .map(|(k, v)| format!("'{}': '{}'", k, v))
        .collect();
    attrs.push(format!("'data': <{} x {}, {} masked>", rays, gates, masked));
    format!("'{}': {{{}}}", name, attrs.join(", "))
}

fn format_fields(volume: &RadarVolume) -> String {
    let fields: Vec<String> = volume
        .fields
        .iter()
        .map(|(name, field)| format_field(name, field))
        .collect();
    format!("{{{}}}", fields.join(", "))
}
