//! Single-layer GeoTIFF writer.
//!
//! Writes one time layer of every band as a multi-sample, uncompressed
//! `f32` image in one strip, georeferenced with a pixel scale, a tiepoint
//! at the top-left corner and, when the cube names an EPSG code, a
//! GeoKey directory.

use crate::cube::CubeHandle;
use crate::error::ExportError;
use crate::geo;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;

const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
const GEOTIFF_MODELTIEPOINT: u16 = 33922;
const GEOTIFF_GEOKEYDIRECTORY: u16 = 34735;
const GEOTIFF_GEOASCIIPARAMS: u16 = 34737;

const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;

/// Write layer `index` of every band of `cube` to `target`.
///
/// Bands become samples in sorted name order. Rows are written north-up, so
/// a cube whose row coordinate increases is flipped. Fails when `target`
/// exists and `overwrite` is false.
pub fn write_layer_geotiff(cube: &CubeHandle, index: usize, target: &Path, overwrite: bool) -> Result<(), ExportError> {
    if target.exists() && !overwrite {
        return Err(ExportError::WriteFailure(format!(
            "file exists: {}",
            target.display()
        )));
    }

    let raster = LayerRaster::from_cube(cube, index)?;
    if raster.width == 0 || raster.height == 0 || raster.bands == 0 {
        return Err(ExportError::WriteFailure(
            "Raster has zero dimensions".to_string(),
        ));
    }

    let writer = BufWriter::new(File::create(target)?);
    raster.write_to(writer)?;
    tracing::debug!(
        "GeoTIFF {}x{}x{} written to {}",
        raster.width,
        raster.height,
        raster.bands,
        target.display()
    );
    Ok(())
}

/// One layer, interleaved and oriented for writing.
#[derive(Debug)]
struct LayerRaster {
    width: usize,
    height: usize,
    bands: usize,
    /// Pixel-interleaved samples, top row first.
    pixels: Vec<f32>,
    /// `(x, y)` pixel size, both positive.
    resolution: (f64, f64),
    /// World coordinate of the top-left corner.
    origin: (f64, f64),
    crs: Option<String>,
}

impl LayerRaster {
    fn from_cube(cube: &CubeHandle, index: usize) -> Result<Self, ExportError> {
        let (height, width) = cube.grid_shape();
        let names = cube.band_names();
        let planes = names
            .iter()
            .map(|name| cube.layer(name, index))
            .collect::<crate::Result<Vec<_>>>()?;

        let dx = cube.x.step();
        let dy = cube.y.step();
        let flip_rows = dy > 0.0;
        let flip_cols = dx < 0.0;

        let mut pixels = Vec::with_capacity(width * height * planes.len());
        for row in 0..height {
            let src_row = if flip_rows { height - 1 - row } else { row };
            for col in 0..width {
                let src_col = if flip_cols { width - 1 - col } else { col };
                for plane in &planes {
                    pixels.push(plane[[src_row, src_col]] as f32);
                }
            }
        }

        let (x0, x1) = cube.x.bounds().unwrap_or((0.0, 0.0));
        let (y0, y1) = cube.y.bounds().unwrap_or((0.0, 0.0));
        let resolution = (dx.abs(), dy.abs());
        let origin = (
            x0.min(x1) - resolution.0 / 2.0,
            y0.max(y1) + resolution.1 / 2.0,
        );

        Ok(Self {
            width,
            height,
            bands: planes.len(),
            pixels,
            resolution,
            origin,
            crs: cube.crs.clone(),
        })
    }

    fn write_to<W: Write + Seek>(&self, writer: W) -> Result<(), ExportError> {
        let width = to_u32(self.width)?;
        let height = to_u32(self.height)?;
        let samples = u16::try_from(self.bands)
            .map_err(|_| ExportError::WriteFailure(format!("too many bands: {}", self.bands)))?;

        let mut encoder = TiffEncoder::new(writer)?;
        let mut dir = encoder.image_directory()?;

        dir.write_tag(Tag::ImageWidth, width)?;
        dir.write_tag(Tag::ImageLength, height)?;
        let bits_per_sample: Vec<u16> = vec![32; self.bands];
        dir.write_tag(Tag::BitsPerSample, bits_per_sample.as_slice())?;
        dir.write_tag(Tag::Compression, 1u16)?;
        // BlackIsZero
        dir.write_tag(Tag::PhotometricInterpretation, 1u16)?;
        dir.write_tag(Tag::SamplesPerPixel, samples)?;
        // IEEE floating point
        let sample_format: Vec<u16> = vec![3; self.bands];
        dir.write_tag(Tag::SampleFormat, sample_format.as_slice())?;
        // Chunky
        dir.write_tag(Tag::PlanarConfiguration, 1u16)?;
        dir.write_tag(Tag::RowsPerStrip, height)?;
        if self.bands > 1 {
            let extra_samples: Vec<u16> = vec![0; self.bands - 1];
            dir.write_tag(Tag::ExtraSamples, extra_samples.as_slice())?;
        }

        self.write_geotiff_tags(&mut dir)?;

        let pixel_bytes: Vec<u8> = self.pixels.iter().flat_map(|v| v.to_le_bytes()).collect();
        let strip_offset = dir.write_data(pixel_bytes.as_slice())?;
        let strip_offset = u32::try_from(strip_offset)
            .map_err(|_| ExportError::WriteFailure("strip offset exceeds 4 GiB".to_string()))?;
        dir.write_tag(Tag::StripOffsets, strip_offset)?;
        dir.write_tag(Tag::StripByteCounts, to_u32(pixel_bytes.len())?)?;

        dir.finish()?;
        Ok(())
    }

    fn write_geotiff_tags<W: Write + Seek, K: TiffKind>(
        &self,
        dir: &mut DirectoryEncoder<'_, W, K>,
    ) -> Result<(), ExportError> {
        let pixel_scale = [self.resolution.0, self.resolution.1, 0.0];
        dir.write_tag(Tag::Unknown(GEOTIFF_MODELPIXELSCALE), pixel_scale.as_slice())?;

        let tiepoint = [0.0, 0.0, 0.0, self.origin.0, self.origin.1, 0.0];
        dir.write_tag(Tag::Unknown(GEOTIFF_MODELTIEPOINT), tiepoint.as_slice())?;

        if let Some(crs) = &self.crs {
            if let Some(geokeys) = geokey_directory(crs) {
                dir.write_tag(Tag::Unknown(GEOTIFF_GEOKEYDIRECTORY), geokeys.as_slice())?;
            }
            let ascii_params = format!("{}|", crs);
            dir.write_tag(Tag::Unknown(GEOTIFF_GEOASCIIPARAMS), ascii_params.as_str())?;
        }
        Ok(())
    }
}

/// GeoKey directory for an `EPSG:<code>` CRS.
fn geokey_directory(crs: &str) -> Option<Vec<u16>> {
    let code = geo::epsg_code(crs)?;
    let geographic = geo::is_geographic(crs);

    let mut keys = vec![1, 1, 0, 3];
    keys.extend_from_slice(&[
        GT_MODEL_TYPE_GEO_KEY,
        0,
        1,
        if geographic {
            MODEL_TYPE_GEOGRAPHIC
        } else {
            MODEL_TYPE_PROJECTED
        },
    ]);
    keys.extend_from_slice(&[GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA]);
    if geographic {
        keys.extend_from_slice(&[GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, code]);
    } else {
        keys.extend_from_slice(&[PROJECTED_CS_TYPE_GEO_KEY, 0, 1, code]);
    }
    Some(keys)
}

fn to_u32(value: usize) -> Result<u32, ExportError> {
    u32::try_from(value).map_err(|_| ExportError::WriteFailure(format!("{} does not fit a TIFF field", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::sample_cube;

    #[test]
    fn geokeys_follow_crs_kind() {
        let keys = geokey_directory("EPSG:4326").unwrap();
        assert_eq!(keys[..4], [1, 1, 0, 3]);
        assert_eq!(keys[7], MODEL_TYPE_GEOGRAPHIC);
        assert_eq!(keys[12..], [GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, 4326]);

        let keys = geokey_directory("EPSG:32755").unwrap();
        assert_eq!(keys[7], MODEL_TYPE_PROJECTED);
        assert_eq!(keys[12..], [PROJECTED_CS_TYPE_GEO_KEY, 0, 1, 32755]);

        assert!(geokey_directory("GEOGCS[\"WGS 84\"]").is_none());
    }

    #[test]
    fn layer_is_interleaved_and_north_up() {
        let cube = sample_cube(2);
        let raster = LayerRaster::from_cube(&cube, 1).unwrap();
        assert_eq!((raster.width, raster.height, raster.bands), (3, 2, 2));
        // Index axes increase, so the last row comes first.
        assert_eq!(raster.pixels[..4], [110.0, 110.0, 111.0, 111.0]);
        assert_eq!(raster.resolution, (1.0, 1.0));
        assert_eq!(raster.origin, (-0.5, 1.5));
    }

    #[test]
    fn writes_tiff_and_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("layer.tif");
        let cube = sample_cube(2);

        write_layer_geotiff(&cube, 0, &target, false).unwrap();
        let bytes = std::fs::read(&target).unwrap();
        assert_eq!(&bytes[..4], b"II*\0");
        assert!(bytes.len() > 3 * 2 * 2 * 4);

        let err = write_layer_geotiff(&cube, 1, &target, false).unwrap_err();
        assert!(matches!(err, ExportError::WriteFailure(msg) if msg.starts_with("file exists")));
        write_layer_geotiff(&cube, 1, &target, true).unwrap();
    }

    #[test]
    fn out_of_range_layer_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("layer.tif");
        let err = write_layer_geotiff(&sample_cube(2), 5, &target, false).unwrap_err();
        assert!(matches!(err, ExportError::WriteFailure(_)));
        assert!(!target.exists());
    }
}
