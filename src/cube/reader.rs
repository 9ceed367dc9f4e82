//! NetCDF cube reader.

use super::handle::{Band, CubeHandle, SpatialAxis, TimeAxis};
use super::time::decode_times;
use crate::error::{CubeviewError, Result};
use crate::geo;
use ndarray::{Array3, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

/// Name of the time dimension and coordinate.
pub const TIME_DIM: &str = "time";

/// Attributes consumed while decoding values; not carried over to exports.
pub const PACKING_ATTRIBUTES: [&str; 4] = ["_FillValue", "missing_value", "scale_factor", "add_offset"];

/// Global or variable attributes that name a coordinate reference system.
const CRS_ATTRIBUTES: [&str; 4] = ["crs", "crs_wkt", "spatial_ref", "epsg"];

/// Something that can turn a file identifier into a parsed cube.
///
/// The reader cache only needs this one operation, which keeps the NetCDF
/// library out of the caching logic and lets tests count opens.
pub trait CubeOpener: Debug {
    /// Open and fully parse the cube named by `file_id`.
    fn open(&self, file_id: &str) -> Result<CubeHandle>;
}

/// Opens cubes from NetCDF files on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetcdfOpener;

impl CubeOpener for NetcdfOpener {
    fn open(&self, file_id: &str) -> Result<CubeHandle> {
        read_cube(Path::new(file_id))
    }
}

/// Read a NetCDF file as a `(time, y, x)` cube.
pub fn read_cube(path: &Path) -> Result<CubeHandle> {
    let file = netcdf::open(path)?;

    let time = read_time_axis(&file)?;

    let mut attributes = BTreeMap::new();
    for attr in file.attributes() {
        attributes.insert(attr.name().to_string(), attr_value_to_string(&attr));
    }

    let mut bands = BTreeMap::new();
    let mut spatial_dims: Option<(String, usize, String, usize)> = None;
    let global_crs = find_crs(&attributes);
    let mut band_crs = Vec::new();

    for var in file.variables() {
        let name = var.name().to_string();
        let dims: Vec<(String, usize)> = var
            .dimensions()
            .iter()
            .map(|d| (d.name().to_string(), d.len()))
            .collect();

        if dims.len() != 3 || dims[0].0 != TIME_DIM {
            continue;
        }

        // Bands must share one grid; the first band decides it.
        let (y_name, y_len) = dims[1].clone();
        let (x_name, x_len) = dims[2].clone();
        match &spatial_dims {
            Some((y, _, x, _)) if *y != y_name || *x != x_name => {
                tracing::warn!("Skipping {}: grid ({}, {}) differs from ({}, {})", name, y_name, x_name, y, x);
                continue;
            },
            None => spatial_dims = Some((y_name.clone(), y_len, x_name.clone(), x_len)),
            _ => {},
        }

        let mut band_attributes = BTreeMap::new();
        for attr in var.attributes() {
            band_attributes.insert(attr.name().to_string(), attr_value_to_string(&attr));
        }
        band_crs.extend(grid_mapping_crs(&file, &band_attributes));

        let shape = [dims[0].1, y_len, x_len];
        let data = read_band_values(&var, &shape, &band_attributes)?;
        let dtype = format!("{:?}", var.vartype())
            .replace("NcVariableType::", "")
            .to_lowercase();

        bands.insert(
            name,
            Band {
                data,
                attributes: band_attributes,
                dtype,
            },
        );
    }

    let Some((y_name, y_len, x_name, x_len)) = spatial_dims else {
        return Err(CubeviewError::NoBands {
            path: path.to_path_buf(),
        });
    };

    let crs = global_crs.or_else(|| pick_band_crs(&band_crs));
    let y = read_spatial_axis(&file, &y_name, y_len)?;
    let x = read_spatial_axis(&file, &x_name, x_len)?;

    tracing::debug!(
        "Parsed {}: {} layers, {} bands, {}x{} grid",
        path.display(),
        time.len(),
        bands.len(),
        y_len,
        x_len
    );

    Ok(CubeHandle {
        path: path.to_path_buf(),
        time,
        y,
        x,
        bands,
        attributes,
        crs,
    })
}

fn read_time_axis(file: &netcdf::File) -> Result<TimeAxis> {
    let var = file
        .variable(TIME_DIM)
        .ok_or_else(|| CubeviewError::time_coordinate("no 'time' variable"))?;
    let len = var.dimensions().iter().map(|d| d.len()).product();
    let raw: Vec<f64> = read_values_f64(&var, &[len])?.iter().copied().collect();

    let units = var
        .attribute("units")
        .map(|attr| attr_value_to_string(&attr))
        .ok_or_else(|| CubeviewError::time_coordinate("'time' has no units attribute"))?;
    let calendar = var
        .attribute("calendar")
        .map(|attr| attr_value_to_string(&attr));

    let instants = decode_times(&raw, &units)?;

    Ok(TimeAxis {
        instants,
        raw,
        units,
        calendar,
    })
}

fn read_spatial_axis(file: &netcdf::File, name: &str, len: usize) -> Result<SpatialAxis> {
    let Some(var) = file.variable(name) else {
        return Ok(SpatialAxis::indices(name, len));
    };
    if var.dimensions().len() != 1 {
        return Ok(SpatialAxis::indices(name, len));
    }

    let values: Vec<f64> = read_values_f64(&var, &[len])?.iter().copied().collect();
    let mut attributes = BTreeMap::new();
    for attr in var.attributes() {
        attributes.insert(attr.name().to_string(), attr_value_to_string(&attr));
    }

    Ok(SpatialAxis {
        name: name.to_string(),
        values,
        attributes,
    })
}

fn find_crs(attributes: &BTreeMap<String, String>) -> Option<String> {
    CRS_ATTRIBUTES
        .iter()
        .find_map(|key| attributes.get(*key))
        .map(|value| normalize_crs(value))
}

fn grid_mapping_crs(file: &netcdf::File, band_attributes: &BTreeMap<String, String>) -> Option<String> {
    let mapping = band_attributes.get("grid_mapping")?;
    let var = file.variable(mapping)?;
    let mut attributes = BTreeMap::new();
    for attr in var.attributes() {
        attributes.insert(attr.name().to_string(), attr_value_to_string(&attr));
    }
    find_crs(&attributes)
}

/// Bands may reference different grid mappings; the majority wins.
fn pick_band_crs(band_crs: &[String]) -> Option<String> {
    if band_crs.is_empty() {
        return None;
    }
    geo::most_common_crs(band_crs)
}

/// Bare EPSG codes become `EPSG:<code>`; everything else is kept verbatim.
fn normalize_crs(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.chars().all(|c| c.is_ascii_digit()) && !trimmed.is_empty() {
        format!("EPSG:{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

fn read_band_values(
    var: &netcdf::Variable<'_>,
    shape: &[usize; 3],
    attributes: &BTreeMap<String, String>,
) -> Result<Array3<f64>> {
    let mut data = read_values_f64(var, shape)?
        .into_dimensionality::<ndarray::Ix3>()
        .map_err(|e| CubeviewError::NetCDF(format!("Invalid band shape: {}", e)))?;

    let parse = |key: &str| attributes.get(key).and_then(|s| s.parse::<f64>().ok());
    let fills: Vec<f64> = ["_FillValue", "missing_value"]
        .into_iter()
        .filter_map(parse)
        .collect();
    if !fills.is_empty() {
        let narrow = matches!(var.vartype(), NcVariableType::Float(FloatType::F32));
        data.mapv_inplace(|v| if is_fill(v, &fills, narrow) { f64::NAN } else { v });
    }

    // CF scale/offset
    let scale_factor = parse("scale_factor").unwrap_or(1.0);
    let add_offset = parse("add_offset").unwrap_or(0.0);
    if scale_factor != 1.0 || add_offset != 0.0 {
        data.mapv_inplace(|v| v * scale_factor + add_offset);
    }

    Ok(data)
}

/// Fill values of f32 variables only match after narrowing to f32.
fn is_fill(value: f64, fills: &[f64], narrow: bool) -> bool {
    fills
        .iter()
        .any(|&fill| value == fill || (narrow && (value as f32) == (fill as f32)))
}

fn read_values_f64(var: &netcdf::Variable<'_>, shape: &[usize]) -> Result<ndarray::ArrayD<f64>> {
    let vartype = var.vartype();

    let from_vec = |v: Vec<f64>| -> Result<ndarray::ArrayD<f64>> {
        ndarray::ArrayD::from_shape_vec(IxDyn(shape), v)
            .map_err(|e| CubeviewError::NetCDF(format!("Invalid shape/data size: {}", e)))
    };

    macro_rules! widen {
        ($t:ty) => {{
            let values: Vec<$t> = var.get_values(..).map_err(|e| {
                CubeviewError::NetCDF(format!(
                    "Failed to read {} data from '{}': {}",
                    stringify!($t),
                    var.name(),
                    e
                ))
            })?;
            from_vec(values.into_iter().map(|x| x as f64).collect())
        }};
    }

    match vartype {
        NcVariableType::Float(FloatType::F64) => widen!(f64),
        NcVariableType::Float(FloatType::F32) => widen!(f32),
        NcVariableType::Int(IntType::I64) => widen!(i64),
        NcVariableType::Int(IntType::I32) => widen!(i32),
        NcVariableType::Int(IntType::I16) => widen!(i16),
        NcVariableType::Int(IntType::I8) => widen!(i8),
        NcVariableType::Int(IntType::U64) => widen!(u64),
        NcVariableType::Int(IntType::U32) => widen!(u32),
        NcVariableType::Int(IntType::U16) => widen!(u16),
        NcVariableType::Int(IntType::U8) => widen!(u8),
        NcVariableType::Char | NcVariableType::String => Err(CubeviewError::NetCDF(format!(
            "Variable '{}' holds character data",
            var.name()
        ))),
        _ => Err(CubeviewError::NetCDF(format!(
            "Unsupported variable type: {:?}",
            vartype
        ))),
    }
}

/// Render an attribute value as text.
pub fn attr_value_to_string(attr: &netcdf::Attribute<'_>) -> String {
    use netcdf::AttributeValue;

    match attr.value() {
        Ok(AttributeValue::Uchar(v)) => format!("{}", v),
        Ok(AttributeValue::Schar(v)) => format!("{}", v),
        Ok(AttributeValue::Ushort(v)) => format!("{}", v),
        Ok(AttributeValue::Short(v)) => format!("{}", v),
        Ok(AttributeValue::Uint(v)) => format!("{}", v),
        Ok(AttributeValue::Int(v)) => format!("{}", v),
        Ok(AttributeValue::Ulonglong(v)) => format!("{}", v),
        Ok(AttributeValue::Longlong(v)) => format!("{}", v),
        Ok(AttributeValue::Float(v)) => format!("{}", v),
        Ok(AttributeValue::Double(v)) => format!("{}", v),
        Ok(AttributeValue::Str(v)) => v,
        Ok(AttributeValue::Uchars(v)) => format!("{:?}", v),
        Ok(AttributeValue::Schars(v)) => format!("{:?}", v),
        Ok(AttributeValue::Ushorts(v)) => format!("{:?}", v),
        Ok(AttributeValue::Shorts(v)) => format!("{:?}", v),
        Ok(AttributeValue::Uints(v)) => format!("{:?}", v),
        Ok(AttributeValue::Ints(v)) => format!("{:?}", v),
        Ok(AttributeValue::Ulonglongs(v)) => format!("{:?}", v),
        Ok(AttributeValue::Longlongs(v)) => format!("{:?}", v),
        Ok(AttributeValue::Floats(v)) => format!("{:?}", v),
        Ok(AttributeValue::Doubles(v)) => format!("{:?}", v),
        Ok(AttributeValue::Strs(v)) => v.join(", "),
        Err(_) => format!("{:?}", attr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_epsg_codes_are_prefixed() {
        assert_eq!(normalize_crs("32755"), "EPSG:32755");
        assert_eq!(normalize_crs(" EPSG:4326 "), "EPSG:4326");
    }

    #[test]
    fn crs_lookup_prefers_first_known_attribute() {
        let mut attrs = BTreeMap::new();
        attrs.insert("spatial_ref".to_string(), "EPSG:3577".to_string());
        attrs.insert("crs".to_string(), "EPSG:4326".to_string());
        assert_eq!(find_crs(&attrs).as_deref(), Some("EPSG:4326"));
    }

    #[test]
    fn band_crs_majority_wins() {
        let crs = ["EPSG:32755", "EPSG:4326", "EPSG:4326"].map(String::from);
        assert_eq!(pick_band_crs(&crs).as_deref(), Some("EPSG:4326"));
        assert_eq!(pick_band_crs(&[]), None);
    }

    #[test]
    fn fill_narrowing_only_applies_to_f32_bands() {
        let fills = [-9999.0];
        let near = -9999.0003;
        assert!(is_fill(-9999.0, &fills, false));
        assert!(!is_fill(near, &fills, false));
        assert!(is_fill(near, &fills, true));
        assert!(!is_fill(0.0, &fills, true));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_cube(Path::new("/definitely/not/here.nc")).unwrap_err();
        assert!(matches!(err, CubeviewError::NetCDF(_)));
    }
}
