//! Attribute access helpers for NetCDF variables and files.

use std::collections::BTreeMap;

use netcdf::AttributeValue;

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Numeric attribute as f64, whatever its stored numeric type.
pub fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(v as f64),
        AttributeValue::Int(v) => Some(v as f64),
        AttributeValue::Short(v) => Some(v as f64),
        AttributeValue::Schar(v) => Some(v as f64),
        AttributeValue::Uchar(v) => Some(v as f64),
        AttributeValue::Ushort(v) => Some(v as f64),
        AttributeValue::Uint(v) => Some(v as f64),
        AttributeValue::Longlong(v) => Some(v as f64),
        AttributeValue::Ulonglong(v) => Some(v as f64),
        _ => None,
    }
}

/// Human-readable rendering of any attribute value.
pub fn attribute_to_string(value: AttributeValue) -> String {
    match value {
        AttributeValue::Str(s) => s,
        AttributeValue::Strs(v) => v.join(", "),
        AttributeValue::Double(v) => v.to_string(),
        AttributeValue::Float(v) => v.to_string(),
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Short(v) => v.to_string(),
        AttributeValue::Doubles(v) => join(&v),
        AttributeValue::Floats(v) => join(&v),
        AttributeValue::Ints(v) => join(&v),
        AttributeValue::Shorts(v) => join(&v),
        other => format!("{:?}", other),
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// All attributes of a variable, stringified. Unreadable values are skipped.
pub fn variable_attributes(var: &netcdf::Variable) -> BTreeMap<String, String> {
    var.attributes()
        .filter_map(|attr| {
            let value = attr.value().ok()?;
            Some((attr.name().to_string(), attribute_to_string(value)))
        })
        .collect()
}

/// All global attributes of a file, stringified.
pub fn global_attributes(file: &netcdf::File) -> BTreeMap<String, String> {
    file.attributes()
        .filter_map(|attr| {
            let value = attr.value().ok()?;
            Some((attr.name().to_string(), attribute_to_string(value)))
        })
        .collect()
}
