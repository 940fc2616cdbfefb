//! Constants and magic numbers for IZL level payloads

/// File magic for the current generation: "IZL3"
pub const FILE_MAGIC: [u8; 4] = [0x49, 0x5A, 0x4C, 0x33]; // "IZL3"

/// First byte of a zlib stream (CMF with deflate, 32 KiB window).
pub const ZLIB_HEADER: u8 = 0x78;

/// Text prefix of a base64 IZL3 body.
pub const TEXT_PREFIX_V3: char = '|';
/// Text prefix of a base64 legacy delimiter body.
pub const TEXT_PREFIX_V2: char = '=';
/// Separator between the JSON part and the screenshot part of the original format.
pub const V1_SCREENSHOT_SEP: char = ';';
/// Base64 prefixes that identify an original-format JSON payload.
///
/// `eyJ` is base64 for `{"`; the others are base64 zlib headers.
pub const V1_BASE64_PREFIXES: [&str; 3] = ["eyJ", "eJ", "eN"];

/// Legacy format: separator between top-level fields.
pub const FIELD_SEP: char = '\u{1E}';
/// Legacy format: separator between a key code and its value.
pub const PAIR_SEP: char = '\u{1F}';
/// Legacy format: separator between placement strings.
pub const PLANT_SEP: char = '\u{1D}';
/// Legacy format: marker opening a placement string.
pub const PLANT_OPEN: char = '\u{02}';
/// Legacy format: marker closing a placement string.
pub const PLANT_CLOSE: char = '\u{03}';
/// Legacy format: separator between pairs inside a placement string.
pub const PLANT_FIELD_SEP: char = '\u{1C}';
/// Legacy format: separator between list items (`lfValue`, `selectedZombies`).
pub const LIST_SEP: char = '\u{1A}';

/// Shortest flag array the packer accepts.
pub const LF_MIN_LEN: usize = 6;
/// Longest flag array the packer accepts.
pub const LF_MAX_LEN: usize = 9;
/// Largest value a single 2-bit flag can hold.
pub const LF_MAX_VALUE: u8 = 3;
/// Bit offset of the packed length field.
pub const LF_LENGTH_SHIFT: usize = 14;

/// `lfValue` index carrying the water-level flag.
pub const WATER_FLAG_INDEX: usize = 3;
/// `lfValue` value marking a water level.
pub const WATER_FLAG_VALUE: u8 = 2;
