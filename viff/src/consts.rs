pub const VIFF_HEADER_LENGTH: usize = 1024;
pub const VIFF_COMMENT_LENGTH: usize = 512;
pub const VIFF_RESERVE_LENGTH: usize = 404;

pub(crate) const FILE_ID: u8 = 0xab;
pub(crate) const FILE_TYPE: u8 = 0x01;
pub(crate) const RELEASE: u8 = 0x01;
pub(crate) const DEFAULT_VERSION: u8 = 0x00;

pub(crate) const MACHINE_DEP_LITTLE: u8 = 0x08;
pub(crate) const MACHINE_DEP_BIG: u8 = 0x02;

pub(crate) const START_SENTINEL: [u8; 4] = [0xff; 4];
pub(crate) const ENCODING_NONE: [u8; 4] = [0; 4];

pub(crate) const OFFSET_FILE_ID: usize = 0;
pub(crate) const OFFSET_FILE_TYPE: usize = 1;
pub(crate) const OFFSET_RELEASE: usize = 2;
pub(crate) const OFFSET_VERSION: usize = 3;
pub(crate) const OFFSET_MACHINE_DEP: usize = 4;
pub(crate) const OFFSET_PADDING: usize = 5;
pub(crate) const PADDING_LENGTH: usize = 3;
pub(crate) const OFFSET_COMMENT: usize = 8;
pub(crate) const OFFSET_ROWS: usize = 520;
pub(crate) const OFFSET_COLUMNS: usize = 524;
pub(crate) const OFFSET_SUBROW: usize = 528;
pub(crate) const OFFSET_START_X: usize = 532;
pub(crate) const OFFSET_START_Y: usize = 536;
pub(crate) const OFFSET_X_PIXEL_SIZE: usize = 540;
pub(crate) const OFFSET_Y_PIXEL_SIZE: usize = 544;
pub(crate) const OFFSET_LOCATION_TYPE: usize = 548;
pub(crate) const OFFSET_LOCATION_DIM: usize = 552;
pub(crate) const OFFSET_IMAGES: usize = 556;
pub(crate) const OFFSET_BANDS: usize = 560;
pub(crate) const OFFSET_STORAGE_TYPE: usize = 564;
pub(crate) const OFFSET_ENCODING: usize = 568;
// MapScheme, MapStorageType, MapRowSize, MapColumnSize, MapSubrowSize,
// MapEnable, MapsPerCycle, ColorSpaceModel.
pub(crate) const OFFSET_MAP_FIELDS: usize = 572;
pub(crate) const MAP_FIELDS_LENGTH: usize = 32;
// ISpare1, ISpare2, FSpare1, FSpare2.
pub(crate) const OFFSET_SPARE_FIELDS: usize = 604;
pub(crate) const SPARE_FIELDS_LENGTH: usize = 16;
pub(crate) const OFFSET_RESERVE: usize = 620;

pub(crate) const DEFAULT_LOCATION_TYPE: [u8; 4] = 1_u32.to_le_bytes();
pub(crate) const DEFAULT_MAP_STORAGE_TYPE: u32 = 1;
pub(crate) const MAP_STORAGE_TYPE_INDEX: usize = 4;
