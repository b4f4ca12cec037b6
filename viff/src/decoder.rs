use crate::common::{decode_comment, read_array, read_f32_le, read_u32_le};
use crate::consts::{
    ENCODING_NONE, FILE_ID, FILE_TYPE, MAP_FIELDS_LENGTH, OFFSET_BANDS, OFFSET_COLUMNS,
    OFFSET_COMMENT, OFFSET_ENCODING, OFFSET_FILE_ID, OFFSET_FILE_TYPE, OFFSET_IMAGES,
    OFFSET_LOCATION_DIM, OFFSET_LOCATION_TYPE, OFFSET_MACHINE_DEP, OFFSET_MAP_FIELDS,
    OFFSET_PADDING, OFFSET_RELEASE, OFFSET_RESERVE, OFFSET_ROWS, OFFSET_SPARE_FIELDS,
    OFFSET_START_X, OFFSET_START_Y, OFFSET_STORAGE_TYPE, OFFSET_SUBROW, OFFSET_VERSION,
    OFFSET_X_PIXEL_SIZE, OFFSET_Y_PIXEL_SIZE, PADDING_LENGTH, RELEASE, SPARE_FIELDS_LENGTH,
    START_SENTINEL, VIFF_COMMENT_LENGTH, VIFF_HEADER_LENGTH, VIFF_RESERVE_LENGTH,
};
use crate::raster::slice_and_reshape;
use crate::{
    DecodedViff, Endianness, RasterDimensions, Result, StorageType, ViffError, ViffErrorCode,
    ViffHeader,
};

/// Parses the leading 1024 bytes of `bytes` as a VIFF header.
///
/// Checks run in a fixed order: magic, padding, machine dependency, start
/// sentinels, encoding scheme, storage type. Zero-extent dimensions are
/// accepted; only an overflowing sample count is rejected.
pub fn decode_header(bytes: &[u8]) -> Result<ViffHeader> {
    if bytes.len() < VIFF_HEADER_LENGTH {
        return Err(ViffError::new(
            ViffErrorCode::TruncatedHeader,
            format!(
                "Input shorter than fixed header. expected>={VIFF_HEADER_LENGTH} got={}",
                bytes.len()
            ),
        ));
    }

    let magic = [
        bytes[OFFSET_FILE_ID],
        bytes[OFFSET_FILE_TYPE],
        bytes[OFFSET_RELEASE],
    ];
    if magic != [FILE_ID, FILE_TYPE, RELEASE] {
        return Err(ViffError::new(
            ViffErrorCode::InvalidMagic,
            format!(
                "Not a VIFF/XV file. magic={:02x} {:02x} {:02x}",
                magic[0], magic[1], magic[2]
            ),
        ));
    }

    let padding: [u8; PADDING_LENGTH] = read_array(bytes, OFFSET_PADDING)?;
    if padding.iter().any(|byte| *byte != 0) {
        return Err(ViffError::new(
            ViffErrorCode::InvalidPadding,
            format!("Header padding must be zero, got {padding:02x?}."),
        ));
    }

    let endianness = Endianness::from_machine_dep(bytes[OFFSET_MACHINE_DEP])?;

    let start_x: [u8; 4] = read_array(bytes, OFFSET_START_X)?;
    let start_y: [u8; 4] = read_array(bytes, OFFSET_START_Y)?;
    if start_x != START_SENTINEL || start_y != START_SENTINEL {
        return Err(ViffError::new(
            ViffErrorCode::InvalidSentinel,
            format!(
                "StartX/StartY must be ffffffff, got StartX={start_x:02x?} StartY={start_y:02x?}."
            ),
        ));
    }

    let encoding: [u8; 4] = read_array(bytes, OFFSET_ENCODING)?;
    if encoding != ENCODING_NONE {
        return Err(ViffError::new(
            ViffErrorCode::UnsupportedEncoding,
            format!(
                "Compressed DataEncodingScheme {} is not supported.",
                u32::from_le_bytes(encoding)
            ),
        ));
    }

    let storage_type = StorageType::from_code(read_u32_le(bytes, OFFSET_STORAGE_TYPE)?)?;

    let dimensions = RasterDimensions {
        images: read_u32_le(bytes, OFFSET_IMAGES)?,
        bands: read_u32_le(bytes, OFFSET_BANDS)?,
        columns: read_u32_le(bytes, OFFSET_COLUMNS)?,
        rows: read_u32_le(bytes, OFFSET_ROWS)?,
    };
    dimensions.total_samples()?;

    let comment_raw: [u8; VIFF_COMMENT_LENGTH] = read_array(bytes, OFFSET_COMMENT)?;

    let header = ViffHeader {
        version: bytes[OFFSET_VERSION],
        endianness,
        comment: decode_comment(&comment_raw),
        dimensions,
        length_of_subrow: read_u32_le(bytes, OFFSET_SUBROW)?,
        x_pixel_size: read_f32_le(bytes, OFFSET_X_PIXEL_SIZE)?,
        y_pixel_size: read_f32_le(bytes, OFFSET_Y_PIXEL_SIZE)?,
        location_type: read_array(bytes, OFFSET_LOCATION_TYPE)?,
        location_dim: read_array(bytes, OFFSET_LOCATION_DIM)?,
        storage_type,
        map_fields: read_array::<MAP_FIELDS_LENGTH>(bytes, OFFSET_MAP_FIELDS)?,
        spare_fields: read_array::<SPARE_FIELDS_LENGTH>(bytes, OFFSET_SPARE_FIELDS)?,
        reserve: read_array::<VIFF_RESERVE_LENGTH>(bytes, OFFSET_RESERVE)?,
    };

    log::debug!(
        "Decoded VIFF header: {}x{}x{}x{} (images x bands x columns x rows) {} {:?}-endian",
        dimensions.images,
        dimensions.bands,
        dimensions.columns,
        dimensions.rows,
        storage_type,
        endianness
    );

    Ok(header)
}

/// Decodes a complete VIFF file image: header plus payload.
pub fn decode_viff(bytes: &[u8]) -> Result<DecodedViff> {
    let header = decode_header(bytes)?;
    let raster = slice_and_reshape(&bytes[VIFF_HEADER_LENGTH..], &header)?;
    Ok(DecodedViff { header, raster })
}
