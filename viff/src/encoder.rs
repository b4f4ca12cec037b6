use crate::common::{decode_comment, encode_comment, write_u32_le};
use crate::consts::{
    DEFAULT_LOCATION_TYPE, DEFAULT_MAP_STORAGE_TYPE, DEFAULT_VERSION, ENCODING_NONE, FILE_ID,
    FILE_TYPE, MAP_FIELDS_LENGTH, MAP_STORAGE_TYPE_INDEX, OFFSET_BANDS, OFFSET_COLUMNS,
    OFFSET_COMMENT, OFFSET_ENCODING, OFFSET_FILE_ID, OFFSET_FILE_TYPE, OFFSET_IMAGES,
    OFFSET_LOCATION_DIM, OFFSET_LOCATION_TYPE, OFFSET_MACHINE_DEP, OFFSET_MAP_FIELDS,
    OFFSET_RELEASE, OFFSET_RESERVE, OFFSET_ROWS, OFFSET_SPARE_FIELDS, OFFSET_START_X,
    OFFSET_START_Y, OFFSET_STORAGE_TYPE, OFFSET_SUBROW, OFFSET_VERSION, OFFSET_X_PIXEL_SIZE,
    OFFSET_Y_PIXEL_SIZE, RELEASE, SPARE_FIELDS_LENGTH, START_SENTINEL, VIFF_COMMENT_LENGTH,
    VIFF_HEADER_LENGTH, VIFF_RESERVE_LENGTH,
};
use crate::raster::derive_header_fields;
use crate::{
    EncodedViff, Endianness, RasterBuffer, RasterDimensions, Result, StorageType,
    ViffEncodeOptions, ViffHeader,
};

impl ViffHeader {
    /// Header for a fresh file with the format's fixed default field values.
    pub fn new(dimensions: RasterDimensions, storage_type: StorageType) -> Self {
        let mut map_fields = [0_u8; MAP_FIELDS_LENGTH];
        map_fields[MAP_STORAGE_TYPE_INDEX..MAP_STORAGE_TYPE_INDEX + 4]
            .copy_from_slice(&DEFAULT_MAP_STORAGE_TYPE.to_le_bytes());

        Self {
            version: DEFAULT_VERSION,
            endianness: Endianness::native(),
            comment: String::new(),
            dimensions,
            length_of_subrow: 0,
            x_pixel_size: 1.0,
            y_pixel_size: 1.0,
            location_type: DEFAULT_LOCATION_TYPE,
            location_dim: [0; 4],
            storage_type,
            map_fields,
            spare_fields: [0; SPARE_FIELDS_LENGTH],
            reserve: [0; VIFF_RESERVE_LENGTH],
        }
    }

    pub fn to_bytes(&self) -> [u8; VIFF_HEADER_LENGTH] {
        let mut header = [0_u8; VIFF_HEADER_LENGTH];
        header[OFFSET_FILE_ID] = FILE_ID;
        header[OFFSET_FILE_TYPE] = FILE_TYPE;
        header[OFFSET_RELEASE] = RELEASE;
        header[OFFSET_VERSION] = self.version;
        header[OFFSET_MACHINE_DEP] = self.endianness.machine_dep();
        header[OFFSET_COMMENT..OFFSET_COMMENT + VIFF_COMMENT_LENGTH]
            .copy_from_slice(&encode_comment(&self.comment));
        write_u32_le(&mut header, OFFSET_ROWS, self.dimensions.rows);
        write_u32_le(&mut header, OFFSET_COLUMNS, self.dimensions.columns);
        write_u32_le(&mut header, OFFSET_SUBROW, self.length_of_subrow);
        header[OFFSET_START_X..OFFSET_START_X + 4].copy_from_slice(&START_SENTINEL);
        header[OFFSET_START_Y..OFFSET_START_Y + 4].copy_from_slice(&START_SENTINEL);
        header[OFFSET_X_PIXEL_SIZE..OFFSET_X_PIXEL_SIZE + 4]
            .copy_from_slice(&self.x_pixel_size.to_le_bytes());
        header[OFFSET_Y_PIXEL_SIZE..OFFSET_Y_PIXEL_SIZE + 4]
            .copy_from_slice(&self.y_pixel_size.to_le_bytes());
        header[OFFSET_LOCATION_TYPE..OFFSET_LOCATION_TYPE + 4]
            .copy_from_slice(&self.location_type);
        header[OFFSET_LOCATION_DIM..OFFSET_LOCATION_DIM + 4]
            .copy_from_slice(&self.location_dim);
        write_u32_le(&mut header, OFFSET_IMAGES, self.dimensions.images);
        write_u32_le(&mut header, OFFSET_BANDS, self.dimensions.bands);
        write_u32_le(&mut header, OFFSET_STORAGE_TYPE, self.storage_type.code());
        header[OFFSET_ENCODING..OFFSET_ENCODING + 4].copy_from_slice(&ENCODING_NONE);
        header[OFFSET_MAP_FIELDS..OFFSET_MAP_FIELDS + MAP_FIELDS_LENGTH]
            .copy_from_slice(&self.map_fields);
        header[OFFSET_SPARE_FIELDS..OFFSET_SPARE_FIELDS + SPARE_FIELDS_LENGTH]
            .copy_from_slice(&self.spare_fields);
        header[OFFSET_RESERVE..].copy_from_slice(&self.reserve);
        header
    }
}

/// Serializes `raster` into a complete VIFF file image.
pub fn encode_viff(raster: &RasterBuffer, options: &ViffEncodeOptions) -> Result<EncodedViff> {
    let fields = derive_header_fields(raster);
    let dimensions = fields.dimensions()?;

    let header = ViffHeader {
        endianness: options.endianness,
        comment: options.comment.clone(),
        x_pixel_size: options.x_pixel_size,
        y_pixel_size: options.y_pixel_size,
        ..ViffHeader::new(dimensions, fields.storage_type)
    };

    let payload = raster.to_payload_bytes(options.endianness);
    log::trace!(
        "Encoding VIFF payload: {} bytes of {}",
        payload.len(),
        fields.storage_type
    );

    let mut bytes = Vec::with_capacity(VIFF_HEADER_LENGTH + payload.len());
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&payload);

    // Comment as stored: ASCII only, at most 512 bytes.
    let header = ViffHeader {
        comment: decode_comment(&bytes[OFFSET_COMMENT..OFFSET_COMMENT + VIFF_COMMENT_LENGTH]),
        ..header
    };

    Ok(EncodedViff { bytes, header })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_header, decode_viff, ViffErrorCode};
    use ndarray::Array4;
    use num_complex::Complex;

    fn dims(images: u32, bands: u32, columns: u32, rows: u32) -> RasterDimensions {
        RasterDimensions {
            images,
            bands,
            columns,
            rows,
        }
    }

    #[test]
    fn header_is_always_1024_bytes() {
        let header = ViffHeader {
            comment: "c".repeat(4000),
            ..ViffHeader::new(dims(u32::MAX, 7, 1, 65536), StorageType::Complex64)
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), VIFF_HEADER_LENGTH);
        let bytes = ViffHeader::new(dims(1, 1, 1, 1), StorageType::Uint8).to_bytes();
        assert_eq!(bytes.len(), VIFF_HEADER_LENGTH);
    }

    #[test]
    fn writes_fixed_field_values() {
        let header = ViffHeader {
            endianness: Endianness::Little,
            ..ViffHeader::new(dims(2, 3, 4, 5), StorageType::Float32)
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..8], &[0xab, 0x01, 0x01, 0x00, 0x08, 0, 0, 0]);
        assert_eq!(&bytes[520..524], &5_u32.to_le_bytes());
        assert_eq!(&bytes[524..528], &4_u32.to_le_bytes());
        assert_eq!(&bytes[528..532], &[0, 0, 0, 0]);
        assert_eq!(&bytes[532..540], &[0xff; 8]);
        assert_eq!(&bytes[540..544], &[0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(&bytes[544..548], &[0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(&bytes[548..552], &[1, 0, 0, 0]);
        assert_eq!(&bytes[556..560], &2_u32.to_le_bytes());
        assert_eq!(&bytes[560..564], &3_u32.to_le_bytes());
        assert_eq!(&bytes[564..568], &5_u32.to_le_bytes());
        assert_eq!(&bytes[568..572], &[0, 0, 0, 0]);
        assert_eq!(&bytes[576..580], &1_u32.to_le_bytes());
        assert!(bytes[620..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn big_endian_marker_only_changes_machine_dep() {
        let little = ViffHeader {
            endianness: Endianness::Little,
            ..ViffHeader::new(dims(1, 2, 3, 4), StorageType::Uint16)
        }
        .to_bytes();
        let big = ViffHeader {
            endianness: Endianness::Big,
            ..ViffHeader::new(dims(1, 2, 3, 4), StorageType::Uint16)
        }
        .to_bytes();
        assert_eq!(big[OFFSET_MACHINE_DEP], 0x02);
        assert_eq!(little[..OFFSET_MACHINE_DEP], big[..OFFSET_MACHINE_DEP]);
        assert_eq!(little[OFFSET_MACHINE_DEP + 1..], big[OFFSET_MACHINE_DEP + 1..]);
    }

    #[test]
    fn decoded_header_reencodes_byte_identically() {
        let mut bytes = ViffHeader {
            comment: "survey frame 12".to_string(),
            ..ViffHeader::new(dims(1, 3, 8, 6), StorageType::Float64)
        }
        .to_bytes();
        // Populate fields the codec passes through without interpreting.
        bytes[OFFSET_LOCATION_DIM] = 2;
        bytes[OFFSET_MAP_FIELDS + 28] = 9;
        bytes[OFFSET_SPARE_FIELDS + 5] = 0x42;
        bytes[OFFSET_RESERVE + 100] = 0x17;
        bytes[OFFSET_VERSION] = 3;

        let header = decode_header(&bytes).expect("decode header");
        assert_eq!(header.comment, "survey frame 12");
        assert_eq!(header.to_bytes(), bytes);
    }

    #[test]
    fn encode_viff_roundtrips_uint8_and_float32() {
        let bytes: Vec<u8> = (0..2 * 3 * 4 * 5).map(|v| v as u8).collect();
        let raster = RasterBuffer::Uint8(
            Array4::from_shape_vec((2, 3, 4, 5), bytes).expect("shape"),
        );
        let encoded = encode_viff(&raster, &ViffEncodeOptions::default()).expect("encode");
        assert_eq!(encoded.bytes.len(), VIFF_HEADER_LENGTH + 120);
        let decoded = decode_viff(&encoded.bytes).expect("decode");
        assert_eq!(decoded.header, encoded.header);
        assert_eq!(decoded.header.dimensions, dims(2, 3, 4, 5));
        assert_eq!(decoded.raster, raster);

        let values: Vec<f32> = (0..6).map(|v| v as f32 * 0.5 - 1.0).collect();
        let raster = RasterBuffer::Float32(
            Array4::from_shape_vec((1, 1, 2, 3), values).expect("shape"),
        );
        let encoded = encode_viff(&raster, &ViffEncodeOptions::default()).expect("encode");
        assert_eq!(decode_viff(&encoded.bytes).expect("decode").raster, raster);
    }

    #[test]
    fn encode_viff_roundtrips_big_endian_complex() {
        let values: Vec<Complex<f64>> = (0..8)
            .map(|v| Complex::new(v as f64, -(v as f64) / 4.0))
            .collect();
        let raster = RasterBuffer::Complex64(
            Array4::from_shape_vec((1, 2, 2, 2), values).expect("shape"),
        );
        let options = ViffEncodeOptions {
            endianness: Endianness::Big,
            comment: "interferogram".to_string(),
            ..ViffEncodeOptions::default()
        };
        let encoded = encode_viff(&raster, &options).expect("encode");
        assert_eq!(encoded.bytes[OFFSET_MACHINE_DEP], 0x02);
        // First real component 0.0, first imaginary -0.0 in big-endian.
        assert_eq!(&encoded.bytes[1024 + 8..1024 + 16], &(-0.0_f64).to_be_bytes());

        let decoded = decode_viff(&encoded.bytes).expect("decode");
        assert_eq!(decoded.header.endianness, Endianness::Big);
        assert_eq!(decoded.header.comment, "interferogram");
        assert_eq!(decoded.raster, raster);
    }

    #[test]
    fn encode_viff_rejects_empty_raster() {
        let raster = RasterBuffer::Uint16(Array4::zeros((1, 0, 4, 4)));
        let error = encode_viff(&raster, &ViffEncodeOptions::default()).expect_err("should fail");
        assert_eq!(error.code, ViffErrorCode::InvalidDimensions);
    }
}
