//! Reader and writer for the Khoros VIFF/XV raster format.
//!
//! A VIFF file is a fixed 1024-byte header followed by a raw band-sequential
//! payload. Decoded rasters are exposed as 4-dimensional arrays with axes
//! `[images, bands, columns, rows]`.

use std::fmt;
use std::path::{Path, PathBuf};

mod common;
mod consts;
mod decoder;
mod encoder;
mod file;
mod raster;

pub use consts::{VIFF_COMMENT_LENGTH, VIFF_HEADER_LENGTH, VIFF_RESERVE_LENGTH};
pub use decoder::{decode_header, decode_viff};
pub use encoder::encode_viff;
pub use file::{open_raster, save_raster, save_raster_with};
pub use raster::{derive_header_fields, slice_and_reshape, RasterBuffer, RasterFields};

use consts::{MACHINE_DEP_BIG, MACHINE_DEP_LITTLE};

/// Byte order of the pixel payload, as declared by the `MachineDep` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    pub fn from_machine_dep(value: u8) -> Result<Self> {
        match value {
            MACHINE_DEP_LITTLE => Ok(Self::Little),
            MACHINE_DEP_BIG => Ok(Self::Big),
            _ => Err(ViffError::new(
                ViffErrorCode::InvalidMachineDep,
                format!("Unknown MachineDep byte 0x{value:02x}."),
            )),
        }
    }

    pub fn machine_dep(self) -> u8 {
        match self {
            Self::Little => MACHINE_DEP_LITTLE,
            Self::Big => MACHINE_DEP_BIG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    UnsignedInt,
    Float,
    Complex,
}

/// Pixel element type selected by the `DataStorageType` header field.
///
/// Bit-packed data (code 0) has no variant and is rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    Uint8,
    Uint16,
    Uint32,
    Float32,
    Complex32,
    Float64,
    Complex64,
}

impl StorageType {
    pub fn code(self) -> u32 {
        match self {
            Self::Uint8 => 1,
            Self::Uint16 => 2,
            Self::Uint32 => 4,
            Self::Float32 => 5,
            Self::Complex32 => 6,
            Self::Float64 => 9,
            Self::Complex64 => 10,
        }
    }

    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Err(ViffError::new(
                ViffErrorCode::UnsupportedStorageType,
                "Bit-packed storage (DataStorageType 0) is not supported.",
            )),
            1 => Ok(Self::Uint8),
            2 => Ok(Self::Uint16),
            4 => Ok(Self::Uint32),
            5 => Ok(Self::Float32),
            6 => Ok(Self::Complex32),
            9 => Ok(Self::Float64),
            10 => Ok(Self::Complex64),
            _ => Err(ViffError::new(
                ViffErrorCode::UnsupportedStorageType,
                format!("Unknown DataStorageType code {code}."),
            )),
        }
    }

    pub fn byte_size(self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Uint16 => 2,
            Self::Uint32 | Self::Float32 => 4,
            Self::Complex32 | Self::Float64 => 8,
            Self::Complex64 => 16,
        }
    }

    pub fn kind(self) -> ElementKind {
        match self {
            Self::Uint8 | Self::Uint16 | Self::Uint32 => ElementKind::UnsignedInt,
            Self::Float32 | Self::Float64 => ElementKind::Float,
            Self::Complex32 | Self::Complex64 => ElementKind::Complex,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Float32 => "float32",
            Self::Complex32 => "complex64",
            Self::Float64 => "float64",
            Self::Complex64 => "complex128",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Extents of a raster in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterDimensions {
    pub images: u32,
    pub bands: u32,
    pub columns: u32,
    pub rows: u32,
}

impl RasterDimensions {
    pub(crate) fn validate(self) -> Result<()> {
        if self.images == 0 || self.bands == 0 || self.columns == 0 || self.rows == 0 {
            return Err(ViffError::new(
                ViffErrorCode::InvalidDimensions,
                format!(
                    "images, bands, columns, and rows must be > 0. got images={} bands={} columns={} rows={}",
                    self.images, self.bands, self.columns, self.rows
                ),
            ));
        }
        Ok(())
    }

    pub fn total_samples(self) -> Result<u64> {
        let images = u64::from(self.images);
        let bands = u64::from(self.bands);
        let columns = u64::from(self.columns);
        let rows = u64::from(self.rows);
        images
            .checked_mul(bands)
            .and_then(|v| v.checked_mul(columns))
            .and_then(|v| v.checked_mul(rows))
            .ok_or_else(|| {
                ViffError::new(
                    ViffErrorCode::InvalidDimensions,
                    "Invalid dimensions resulting in overflowed sample count.",
                )
            })
    }

    /// Array shape in `[images, bands, columns, rows]` order.
    pub fn shape(self) -> [usize; 4] {
        [
            self.images as usize,
            self.bands as usize,
            self.columns as usize,
            self.rows as usize,
        ]
    }
}

/// Decoded 1024-byte VIFF header.
///
/// Fields the codec does not interpret are kept as raw bytes so that
/// [`ViffHeader::to_bytes`] reproduces them unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ViffHeader {
    pub version: u8,
    pub endianness: Endianness,
    pub comment: String,
    pub dimensions: RasterDimensions,
    pub length_of_subrow: u32,
    pub x_pixel_size: f32,
    pub y_pixel_size: f32,
    pub location_type: [u8; 4],
    pub location_dim: [u8; 4],
    pub storage_type: StorageType,
    pub map_fields: [u8; 32],
    pub spare_fields: [u8; 16],
    pub reserve: [u8; VIFF_RESERVE_LENGTH],
}

/// Write-side settings for [`encode_viff`] and [`save_raster_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViffEncodeOptions {
    pub endianness: Endianness,
    pub comment: String,
    pub x_pixel_size: f32,
    pub y_pixel_size: f32,
}

impl Default for ViffEncodeOptions {
    fn default() -> Self {
        Self {
            endianness: Endianness::native(),
            comment: String::new(),
            x_pixel_size: 1.0,
            y_pixel_size: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedViff {
    pub bytes: Vec<u8>,
    pub header: ViffHeader,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedViff {
    pub header: ViffHeader,
    pub raster: RasterBuffer,
}

/// Broad error categories, used to tell a foreign file apart from an
/// unsupported variant of a valid one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    UnsupportedFeature,
    Shape,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViffErrorCode {
    TruncatedHeader,
    InvalidMagic,
    InvalidPadding,
    InvalidMachineDep,
    InvalidSentinel,
    InvalidDimensions,
    UnsupportedStorageType,
    UnsupportedEncoding,
    PayloadLengthMismatch,
    StorageTypeMismatch,
    Io,
}

impl ViffErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TruncatedHeader => "TRUNCATED_HEADER",
            Self::InvalidMagic => "INVALID_MAGIC",
            Self::InvalidPadding => "INVALID_PADDING",
            Self::InvalidMachineDep => "INVALID_MACHINE_DEP",
            Self::InvalidSentinel => "INVALID_SENTINEL",
            Self::InvalidDimensions => "INVALID_DIMENSIONS",
            Self::UnsupportedStorageType => "UNSUPPORTED_STORAGE_TYPE",
            Self::UnsupportedEncoding => "UNSUPPORTED_ENCODING",
            Self::PayloadLengthMismatch => "PAYLOAD_LENGTH_MISMATCH",
            Self::StorageTypeMismatch => "STORAGE_TYPE_MISMATCH",
            Self::Io => "IO",
        }
    }

    pub fn kind(self) -> ErrorKind {
        match self {
            Self::TruncatedHeader
            | Self::InvalidMagic
            | Self::InvalidPadding
            | Self::InvalidMachineDep
            | Self::InvalidSentinel
            | Self::InvalidDimensions => ErrorKind::Format,
            Self::UnsupportedStorageType
            | Self::UnsupportedEncoding
            | Self::StorageTypeMismatch => ErrorKind::UnsupportedFeature,
            Self::PayloadLengthMismatch => ErrorKind::Shape,
            Self::Io => ErrorKind::Io,
        }
    }
}

impl fmt::Display for ViffErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ViffError {
    pub code: ViffErrorCode,
    pub message: String,
    pub path: Option<PathBuf>,
    pub length_mismatch: Option<LengthMismatch>,
    #[source]
    pub source: Option<std::io::Error>,
}

impl ViffError {
    pub fn new(code: ViffErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            length_mismatch: None,
            source: None,
        }
    }

    pub(crate) fn payload_length(expected: usize, actual: usize) -> Self {
        Self {
            length_mismatch: Some(LengthMismatch { expected, actual }),
            ..Self::new(
                ViffErrorCode::PayloadLengthMismatch,
                format!("Payload byte length mismatch. expected={expected} got={actual}"),
            )
        }
    }

    pub(crate) fn io(err: std::io::Error, action: &str) -> Self {
        Self {
            source: Some(err),
            ..Self::new(ViffErrorCode::Io, format!("Could not {action}."))
        }
    }

    pub(crate) fn with_path(mut self, path: &Path) -> Self {
        self.message = format!("{}: {}", path.display(), self.message);
        self.path = Some(path.to_path_buf());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

pub type Result<T> = std::result::Result<T, ViffError>;
