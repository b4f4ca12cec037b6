use byteorder::{BigEndian, ByteOrder, LittleEndian};
use ndarray::Array4;
use num_complex::Complex;

use crate::common::expected_payload_length;
use crate::{
    Endianness, RasterDimensions, Result, StorageType, ViffError, ViffErrorCode, ViffHeader,
};

/// Pixel data shaped `[images, bands, columns, rows]`, one variant per
/// supported storage type.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterBuffer {
    Uint8(Array4<u8>),
    Uint16(Array4<u16>),
    Uint32(Array4<u32>),
    Float32(Array4<f32>),
    Complex32(Array4<Complex<f32>>),
    Float64(Array4<f64>),
    Complex64(Array4<Complex<f64>>),
}

/// Header values implied by a raster's shape and element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterFields {
    pub images: usize,
    pub bands: usize,
    pub columns: usize,
    pub rows: usize,
    pub storage_type: StorageType,
}

impl RasterFields {
    pub fn dimensions(&self) -> Result<RasterDimensions> {
        let to_u32 = |axis: &str, value: usize| {
            u32::try_from(value).map_err(|_| {
                ViffError::new(
                    ViffErrorCode::InvalidDimensions,
                    format!("{axis} count {value} does not fit a 32-bit header field."),
                )
            })
        };
        let dimensions = RasterDimensions {
            images: to_u32("images", self.images)?,
            bands: to_u32("bands", self.bands)?,
            columns: to_u32("columns", self.columns)?,
            rows: to_u32("rows", self.rows)?,
        };
        dimensions.validate()?;
        Ok(dimensions)
    }
}

impl RasterBuffer {
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::Uint8(_) => StorageType::Uint8,
            Self::Uint16(_) => StorageType::Uint16,
            Self::Uint32(_) => StorageType::Uint32,
            Self::Float32(_) => StorageType::Float32,
            Self::Complex32(_) => StorageType::Complex32,
            Self::Float64(_) => StorageType::Float64,
            Self::Complex64(_) => StorageType::Complex64,
        }
    }

    /// Shape in `[images, bands, columns, rows]` order.
    pub fn shape(&self) -> [usize; 4] {
        let dim = match self {
            Self::Uint8(a) => a.dim(),
            Self::Uint16(a) => a.dim(),
            Self::Uint32(a) => a.dim(),
            Self::Float32(a) => a.dim(),
            Self::Complex32(a) => a.dim(),
            Self::Float64(a) => a.dim(),
            Self::Complex64(a) => a.dim(),
        };
        [dim.0, dim.1, dim.2, dim.3]
    }

    /// Flattens the raster in logical (band-sequential) order using the
    /// given payload byte order.
    pub fn to_payload_bytes(&self, endianness: Endianness) -> Vec<u8> {
        match endianness {
            Endianness::Little => self.payload_bytes::<LittleEndian>(),
            Endianness::Big => self.payload_bytes::<BigEndian>(),
        }
    }

    fn payload_bytes<B: ByteOrder>(&self) -> Vec<u8> {
        match self {
            Self::Uint8(a) => a.iter().copied().collect(),
            Self::Uint16(a) => {
                let values: Vec<u16> = a.iter().copied().collect();
                let mut out = vec![0_u8; values.len() * 2];
                B::write_u16_into(&values, &mut out);
                out
            }
            Self::Uint32(a) => {
                let values: Vec<u32> = a.iter().copied().collect();
                let mut out = vec![0_u8; values.len() * 4];
                B::write_u32_into(&values, &mut out);
                out
            }
            Self::Float32(a) => {
                let values: Vec<f32> = a.iter().copied().collect();
                let mut out = vec![0_u8; values.len() * 4];
                B::write_f32_into(&values, &mut out);
                out
            }
            Self::Complex32(a) => {
                let parts: Vec<f32> = a.iter().flat_map(|c| [c.re, c.im]).collect();
                let mut out = vec![0_u8; parts.len() * 4];
                B::write_f32_into(&parts, &mut out);
                out
            }
            Self::Float64(a) => {
                let values: Vec<f64> = a.iter().copied().collect();
                let mut out = vec![0_u8; values.len() * 8];
                B::write_f64_into(&values, &mut out);
                out
            }
            Self::Complex64(a) => {
                let parts: Vec<f64> = a.iter().flat_map(|c| [c.re, c.im]).collect();
                let mut out = vec![0_u8; parts.len() * 8];
                B::write_f64_into(&parts, &mut out);
                out
            }
        }
    }
}

/// Validates the payload length against the header and reshapes it into a
/// raster of the header's storage type, reading samples in the header's
/// declared byte order.
pub fn slice_and_reshape(payload: &[u8], header: &ViffHeader) -> Result<RasterBuffer> {
    let expected = expected_payload_length(header.dimensions, header.storage_type)?;
    if payload.len() != expected {
        return Err(ViffError::payload_length(expected, payload.len()));
    }

    log::trace!(
        "Reshaping {} payload bytes into {:?} {}",
        payload.len(),
        header.dimensions.shape(),
        header.storage_type
    );

    match header.endianness {
        Endianness::Little => reshape_payload::<LittleEndian>(payload, header),
        Endianness::Big => reshape_payload::<BigEndian>(payload, header),
    }
}

fn reshape_payload<B: ByteOrder>(payload: &[u8], header: &ViffHeader) -> Result<RasterBuffer> {
    let shape = header.dimensions.shape();
    let count = payload.len() / header.storage_type.byte_size();

    let raster = match header.storage_type {
        StorageType::Uint8 => RasterBuffer::Uint8(into_array(shape, payload.to_vec())?),
        StorageType::Uint16 => {
            let mut values = vec![0_u16; count];
            B::read_u16_into(payload, &mut values);
            RasterBuffer::Uint16(into_array(shape, values)?)
        }
        StorageType::Uint32 => {
            let mut values = vec![0_u32; count];
            B::read_u32_into(payload, &mut values);
            RasterBuffer::Uint32(into_array(shape, values)?)
        }
        StorageType::Float32 => {
            let mut values = vec![0_f32; count];
            B::read_f32_into(payload, &mut values);
            RasterBuffer::Float32(into_array(shape, values)?)
        }
        StorageType::Complex32 => {
            let mut parts = vec![0_f32; count * 2];
            B::read_f32_into(payload, &mut parts);
            let values = parts
                .chunks_exact(2)
                .map(|pair| Complex::new(pair[0], pair[1]))
                .collect();
            RasterBuffer::Complex32(into_array(shape, values)?)
        }
        StorageType::Float64 => {
            let mut values = vec![0_f64; count];
            B::read_f64_into(payload, &mut values);
            RasterBuffer::Float64(into_array(shape, values)?)
        }
        StorageType::Complex64 => {
            let mut parts = vec![0_f64; count * 2];
            B::read_f64_into(payload, &mut parts);
            let values = parts
                .chunks_exact(2)
                .map(|pair| Complex::new(pair[0], pair[1]))
                .collect();
            RasterBuffer::Complex64(into_array(shape, values)?)
        }
    };

    Ok(raster)
}

fn into_array<T>(shape: [usize; 4], values: Vec<T>) -> Result<Array4<T>> {
    let actual = values.len();
    Array4::from_shape_vec(shape, values).map_err(|err| {
        ViffError::new(
            ViffErrorCode::PayloadLengthMismatch,
            format!("Could not reshape {actual} samples into {shape:?}: {err}"),
        )
    })
}

pub fn derive_header_fields(raster: &RasterBuffer) -> RasterFields {
    let [images, bands, columns, rows] = raster.shape();
    RasterFields {
        images,
        bands,
        columns,
        rows,
        storage_type: raster.storage_type(),
    }
}
