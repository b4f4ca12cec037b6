use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::consts::VIFF_HEADER_LENGTH;
use crate::decoder::decode_header;
use crate::encoder::encode_viff;
use crate::raster::slice_and_reshape;
use crate::{
    RasterBuffer, Result, StorageType, ViffEncodeOptions, ViffError, ViffErrorCode, ViffHeader,
};

/// Reads a VIFF/XV file into its header and a raster shaped
/// `[images, bands, columns, rows]`.
pub fn open_raster(path: impl AsRef<Path>) -> Result<(ViffHeader, RasterBuffer)> {
    let path = path.as_ref();
    read_raster(path).map_err(|err| err.with_path(path))
}

fn read_raster(path: &Path) -> Result<(ViffHeader, RasterBuffer)> {
    let mut file = File::open(path).map_err(|err| ViffError::io(err, "open file"))?;

    let mut header_bytes = Vec::with_capacity(VIFF_HEADER_LENGTH);
    (&mut file)
        .take(VIFF_HEADER_LENGTH as u64)
        .read_to_end(&mut header_bytes)
        .map_err(|err| ViffError::io(err, "read header"))?;
    if header_bytes.len() < VIFF_HEADER_LENGTH {
        let err = io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "file ends after {} of {VIFF_HEADER_LENGTH} header bytes",
                header_bytes.len()
            ),
        );
        return Err(ViffError::io(err, "read header"));
    }
    let header = decode_header(&header_bytes)?;

    let mut payload = Vec::new();
    file.read_to_end(&mut payload)
        .map_err(|err| ViffError::io(err, "read payload"))?;
    let raster = slice_and_reshape(&payload, &header)?;

    log::debug!(
        "Opened {}: {:?} {}",
        path.display(),
        raster.shape(),
        header.storage_type
    );
    Ok((header, raster))
}

/// Writes `raster` with default options: native byte order, empty comment,
/// unit pixel sizes.
pub fn save_raster(
    path: impl AsRef<Path>,
    raster: RasterBuffer,
    storage_type: StorageType,
) -> Result<()> {
    save_raster_with(path, raster, storage_type, &ViffEncodeOptions::default())
}

/// Writes `raster` as `storage_type`. The raster must already hold that
/// element type; no conversion is performed.
pub fn save_raster_with(
    path: impl AsRef<Path>,
    raster: RasterBuffer,
    storage_type: StorageType,
    options: &ViffEncodeOptions,
) -> Result<()> {
    let path = path.as_ref();
    write_raster(path, raster, storage_type, options).map_err(|err| err.with_path(path))
}

fn write_raster(
    path: &Path,
    raster: RasterBuffer,
    storage_type: StorageType,
    options: &ViffEncodeOptions,
) -> Result<()> {
    if raster.storage_type() != storage_type {
        return Err(ViffError::new(
            ViffErrorCode::StorageTypeMismatch,
            format!(
                "Raster holds {} samples but {storage_type} was requested.",
                raster.storage_type()
            ),
        ));
    }

    let encoded = encode_viff(&raster, options)?;

    let file = File::create(path).map_err(|err| ViffError::io(err, "create file"))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&encoded.bytes)
        .map_err(|err| ViffError::io(err, "write file"))?;
    writer
        .flush()
        .map_err(|err| ViffError::io(err, "flush file"))?;

    log::debug!(
        "Saved {}: {:?} {} ({} bytes)",
        path.display(),
        raster.shape(),
        storage_type,
        encoded.bytes.len()
    );
    Ok(())
}
