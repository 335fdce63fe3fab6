//! Static code-to-name tables
//!
//! The SDK reports everything as bare integers. These tables turn the ones we
//! care about back into the names used in the vendor headers, for logs,
//! error messages and pickers. They are plain literals; lookups are linear,
//! which is fine for tables of this size.

/// An ordered list of `(code, name)` pairs with lookup in both directions
#[derive(Debug, Clone, Copy)]
pub struct CodeTable {
    entries: &'static [(i64, &'static str)],
}

impl CodeTable {
    /// Wrap a literal entry list
    pub const fn new(entries: &'static [(i64, &'static str)]) -> Self {
        Self { entries }
    }

    /// Name registered for `code`, if any (first match wins)
    pub fn name_of(&self, code: i64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(value, _)| *value == code)
            .map(|(_, name)| *name)
    }

    /// Code registered under `name`, if any
    pub fn code_of(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(_, entry)| *entry == name)
            .map(|(value, _)| *value)
    }

    /// All entries in declaration order
    pub fn entries(&self) -> &'static [(i64, &'static str)] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SDK status codes (`EDS_ERR_*`)
pub static STATUS_NAMES: CodeTable = CodeTable::new(&[
    (0x0000_0000, "EDS_ERR_OK"),
    // Miscellaneous
    (0x0000_0001, "EDS_ERR_UNIMPLEMENTED"),
    (0x0000_0002, "EDS_ERR_INTERNAL_ERROR"),
    (0x0000_0003, "EDS_ERR_MEM_ALLOC_FAILED"),
    (0x0000_0004, "EDS_ERR_MEM_FREE_FAILED"),
    (0x0000_0005, "EDS_ERR_OPERATION_CANCELLED"),
    (0x0000_0006, "EDS_ERR_INCOMPATIBLE_VERSION"),
    (0x0000_0007, "EDS_ERR_NOT_SUPPORTED"),
    (0x0000_0008, "EDS_ERR_UNEXPECTED_EXCEPTION"),
    (0x0000_0009, "EDS_ERR_PROTECTION_VIOLATION"),
    (0x0000_000A, "EDS_ERR_MISSING_SUBCOMPONENT"),
    (0x0000_000B, "EDS_ERR_SELECTION_UNAVAILABLE"),
    // File access
    (0x0000_0020, "EDS_ERR_FILE_IO_ERROR"),
    (0x0000_0021, "EDS_ERR_FILE_TOO_MANY_OPEN"),
    (0x0000_0022, "EDS_ERR_FILE_NOT_FOUND"),
    (0x0000_0023, "EDS_ERR_FILE_OPEN_ERROR"),
    (0x0000_0024, "EDS_ERR_FILE_CLOSE_ERROR"),
    (0x0000_0025, "EDS_ERR_FILE_SEEK_ERROR"),
    (0x0000_0026, "EDS_ERR_FILE_TELL_ERROR"),
    (0x0000_0027, "EDS_ERR_FILE_READ_ERROR"),
    (0x0000_0028, "EDS_ERR_FILE_WRITE_ERROR"),
    (0x0000_0029, "EDS_ERR_FILE_PERMISSION_ERROR"),
    (0x0000_002A, "EDS_ERR_FILE_DISK_FULL_ERROR"),
    (0x0000_002B, "EDS_ERR_FILE_ALREADY_EXISTS"),
    (0x0000_002C, "EDS_ERR_FILE_FORMAT_UNRECOGNIZED"),
    (0x0000_002D, "EDS_ERR_FILE_DATA_CORRUPT"),
    (0x0000_002E, "EDS_ERR_FILE_NAMING_NA"),
    // Directory
    (0x0000_0040, "EDS_ERR_DIR_NOT_FOUND"),
    (0x0000_0041, "EDS_ERR_DIR_IO_ERROR"),
    (0x0000_0042, "EDS_ERR_DIR_ENTRY_NOT_FOUND"),
    (0x0000_0043, "EDS_ERR_DIR_ENTRY_EXISTS"),
    (0x0000_0044, "EDS_ERR_DIR_NOT_EMPTY"),
    // Property
    (0x0000_0050, "EDS_ERR_PROPERTIES_UNAVAILABLE"),
    (0x0000_0051, "EDS_ERR_PROPERTIES_MISMATCH"),
    (0x0000_0053, "EDS_ERR_PROPERTIES_NOT_LOADED"),
    // Function parameter
    (0x0000_0060, "EDS_ERR_INVALID_PARAMETER"),
    (0x0000_0061, "EDS_ERR_INVALID_HANDLE"),
    (0x0000_0062, "EDS_ERR_INVALID_POINTER"),
    (0x0000_0063, "EDS_ERR_INVALID_INDEX"),
    (0x0000_0064, "EDS_ERR_INVALID_LENGTH"),
    (0x0000_0065, "EDS_ERR_INVALID_FN_POINTER"),
    (0x0000_0066, "EDS_ERR_INVALID_SORT_FN"),
    // Device
    (0x0000_0080, "EDS_ERR_DEVICE_NOT_FOUND"),
    (0x0000_0081, "EDS_ERR_DEVICE_BUSY"),
    (0x0000_0082, "EDS_ERR_DEVICE_INVALID"),
    (0x0000_0083, "EDS_ERR_DEVICE_EMERGENCY"),
    (0x0000_0084, "EDS_ERR_DEVICE_MEMORY_FULL"),
    (0x0000_0085, "EDS_ERR_DEVICE_INTERNAL_ERROR"),
    (0x0000_0086, "EDS_ERR_DEVICE_INVALID_PARAMETER"),
    (0x0000_0087, "EDS_ERR_DEVICE_NO_DISK"),
    (0x0000_0088, "EDS_ERR_DEVICE_DISK_ERROR"),
    (0x0000_0089, "EDS_ERR_DEVICE_CF_GATE_CHANGED"),
    (0x0000_008A, "EDS_ERR_DEVICE_DIAL_CHANGED"),
    (0x0000_008B, "EDS_ERR_DEVICE_NOT_INSTALLED"),
    (0x0000_008C, "EDS_ERR_DEVICE_STAY_AWAKE"),
    (0x0000_008D, "EDS_ERR_DEVICE_NOT_RELEASED"),
    // Stream
    (0x0000_00A0, "EDS_ERR_STREAM_IO_ERROR"),
    (0x0000_00A1, "EDS_ERR_STREAM_NOT_OPEN"),
    (0x0000_00A2, "EDS_ERR_STREAM_ALREADY_OPEN"),
    (0x0000_00A3, "EDS_ERR_STREAM_OPEN_ERROR"),
    (0x0000_00A4, "EDS_ERR_STREAM_CLOSE_ERROR"),
    (0x0000_00A5, "EDS_ERR_STREAM_SEEK_ERROR"),
    (0x0000_00A6, "EDS_ERR_STREAM_TELL_ERROR"),
    (0x0000_00A7, "EDS_ERR_STREAM_READ_ERROR"),
    (0x0000_00A8, "EDS_ERR_STREAM_WRITE_ERROR"),
    (0x0000_00A9, "EDS_ERR_STREAM_PERMISSION_ERROR"),
    (0x0000_00AA, "EDS_ERR_STREAM_COULDNT_BEGIN_THREAD"),
    (0x0000_00AB, "EDS_ERR_STREAM_BAD_OPTIONS"),
    (0x0000_00AC, "EDS_ERR_STREAM_END_OF_STREAM"),
    // Communications
    (0x0000_00C0, "EDS_ERR_COMM_PORT_IS_IN_USE"),
    (0x0000_00C1, "EDS_ERR_COMM_DISCONNECTED"),
    (0x0000_00C2, "EDS_ERR_COMM_DEVICE_INCOMPATIBLE"),
    (0x0000_00C3, "EDS_ERR_COMM_BUFFER_FULL"),
    (0x0000_00C4, "EDS_ERR_COMM_USB_BUS_ERR"),
    // Lock/unlock
    (0x0000_00D0, "EDS_ERR_USB_DEVICE_LOCK_ERROR"),
    (0x0000_00D1, "EDS_ERR_USB_DEVICE_UNLOCK_ERROR"),
    // STI/WIA
    (0x0000_00E0, "EDS_ERR_STI_UNKNOWN_ERROR"),
    (0x0000_00E1, "EDS_ERR_STI_INTERNAL_ERROR"),
    (0x0000_00E2, "EDS_ERR_STI_DEVICE_CREATE_ERROR"),
    (0x0000_00E3, "EDS_ERR_STI_DEVICE_RELEASE_ERROR"),
    (0x0000_00E4, "EDS_ERR_DEVICE_NOT_LAUNCHED"),
    // PTP
    (0x0000_2003, "EDS_ERR_SESSION_NOT_OPEN"),
    (0x0000_2004, "EDS_ERR_INVALID_TRANSACTIONID"),
    (0x0000_2007, "EDS_ERR_INCOMPLETE_TRANSFER"),
    (0x0000_2008, "EDS_ERR_INVALID_STRAGEID"),
    (0x0000_200A, "EDS_ERR_DEVICEPROP_NOT_SUPPORTED"),
    (0x0000_200B, "EDS_ERR_INVALID_OBJECTFORMATCODE"),
    (0x0000_2011, "EDS_ERR_SELF_TEST_FAILED"),
    (0x0000_2012, "EDS_ERR_PARTIAL_DELETION"),
    (0x0000_2014, "EDS_ERR_SPECIFICATION_BY_FORMAT_UNSUPPORTED"),
    (0x0000_2015, "EDS_ERR_NO_VALID_OBJECTINFO"),
    (0x0000_2016, "EDS_ERR_INVALID_CODE_FORMAT"),
    (0x0000_2017, "EDS_ERR_UNKNOWN_VENDOR_CODE"),
    (0x0000_2018, "EDS_ERR_CAPTURE_ALREADY_TERMINATED"),
    (0x0000_201A, "EDS_ERR_INVALID_PARENTOBJECT"),
    (0x0000_201B, "EDS_ERR_INVALID_DEVICEPROP_FORMAT"),
    (0x0000_201C, "EDS_ERR_INVALID_DEVICEPROP_VALUE"),
    (0x0000_201E, "EDS_ERR_SESSION_ALREADY_OPEN"),
    (0x0000_201F, "EDS_ERR_TRANSACTION_CANCELLED"),
    (0x0000_2020, "EDS_ERR_SPECIFICATION_OF_DESTINATION_UNSUPPORTED"),
    (0x0000_A001, "EDS_ERR_UNKNOWN_COMMAND"),
    (0x0000_A005, "EDS_ERR_OPERATION_REFUSED"),
    (0x0000_A006, "EDS_ERR_LENS_COVER_CLOSE"),
    (0x0000_A101, "EDS_ERR_LOW_BATTERY"),
    (0x0000_A102, "EDS_ERR_OBJECT_NOTREADY"),
    (0x0000_A104, "EDS_ERR_CANNOT_MAKE_OBJECT"),
    (0x0000_A106, "EDS_ERR_MEMORYSTATUS_NOTREADY"),
    // Take picture
    (0x0000_8D01, "EDS_ERR_TAKE_PICTURE_AF_NG"),
    (0x0000_8D02, "EDS_ERR_TAKE_PICTURE_RESERVED"),
    (0x0000_8D03, "EDS_ERR_TAKE_PICTURE_MIRROR_UP_NG"),
    (0x0000_8D04, "EDS_ERR_TAKE_PICTURE_SENSOR_CLEANING_NG"),
    (0x0000_8D05, "EDS_ERR_TAKE_PICTURE_SILENCE_NG"),
    (0x0000_8D06, "EDS_ERR_TAKE_PICTURE_NO_CARD_NG"),
    (0x0000_8D07, "EDS_ERR_TAKE_PICTURE_CARD_NG"),
    (0x0000_8D08, "EDS_ERR_TAKE_PICTURE_CARD_PROTECT_NG"),
]);

/// Property identifiers (`kEdsPropID_*`, prefix dropped)
pub static PROPERTY_NAMES: CodeTable = CodeTable::new(&[
    (0x0000_FFFF, "Unknown"),
    (0x0000_0002, "ProductName"),
    (0x0000_0004, "OwnerName"),
    (0x0000_0005, "MakerName"),
    (0x0000_0006, "DateTime"),
    (0x0000_0007, "FirmwareVersion"),
    (0x0000_0008, "BatteryLevel"),
    (0x0000_000B, "SaveTo"),
    (0x0000_000C, "CurrentStorage"),
    (0x0000_000D, "CurrentFolder"),
    (0x0000_0010, "BatteryQuality"),
    (0x0000_0015, "BodyIDEx"),
    (0x0000_0100, "ImageQuality"),
    (0x0000_0102, "Orientation"),
    (0x0000_0106, "WhiteBalance"),
    (0x0000_0107, "ColorTemperature"),
    (0x0000_010D, "ColorSpace"),
    (0x0000_0114, "PictureStyle"),
    (0x0000_0400, "AEMode"),
    (0x0000_0401, "DriveMode"),
    (0x0000_0402, "ISOSpeed"),
    (0x0000_0403, "MeteringMode"),
    (0x0000_0404, "AFMode"),
    (0x0000_0405, "Av"),
    (0x0000_0406, "Tv"),
    (0x0000_0407, "ExposureCompensation"),
    (0x0000_040A, "AvailableShots"),
    (0x0000_0500, "Evf_OutputDevice"),
    (0x0000_0501, "Evf_Mode"),
    (0x0000_0502, "Evf_WhiteBalance"),
    (0x0000_0503, "Evf_ColorTemperature"),
    (0x0000_0504, "Evf_DepthOfFieldPreview"),
    (0x0000_0507, "Evf_Zoom"),
    (0x0000_0508, "Evf_ZoomPosition"),
    (0x0000_0509, "Evf_FocusAspect"),
    (0x0000_050A, "Evf_Histogram"),
    (0x0000_050B, "Evf_ImagePosition"),
    (0x0000_050C, "Evf_HistogramStatus"),
    (0x0000_050E, "Evf_AFMode"),
]);

/// Image quality codes (`EdsImageQuality_*`, prefix dropped)
///
/// The short names encode size and compression: `L`/`M`/`S` for large,
/// middle and small, `J` for JPEG, `F`/`N` for fine and normal, `R` for RAW
/// and `MR`/`SR` for the reduced RAW variants.
pub static IMAGE_QUALITIES: CodeTable = CodeTable::new(&[
    // Jpeg only
    (0x0010_FF0F, "LJ"),
    (0x0510_FF0F, "M1J"),
    (0x0610_FF0F, "M2J"),
    (0x0210_FF0F, "SJ"),
    (0x0013_FF0F, "LJF"),
    (0x0012_FF0F, "LJN"),
    (0x0113_FF0F, "MJF"),
    (0x0112_FF0F, "MJN"),
    (0x0213_FF0F, "SJF"),
    (0x0212_FF0F, "SJN"),
    (0x0E13_FF0F, "S1JF"),
    (0x0E12_FF0F, "S1JN"),
    (0x0F13_FF0F, "S2JF"),
    (0x1013_FF0F, "S3JF"),
    // RAW + Jpeg
    (0x0064_FF0F, "LR"),
    (0x0064_0013, "LRLJF"),
    (0x0064_0012, "LRLJN"),
    (0x0064_0113, "LRMJF"),
    (0x0064_0112, "LRMJN"),
    (0x0064_0213, "LRSJF"),
    (0x0064_0212, "LRSJN"),
    (0x0064_0E13, "LRS1JF"),
    (0x0064_0E12, "LRS1JN"),
    (0x0064_0F13, "LRS2JF"),
    (0x0064_1013, "LRS3JF"),
    (0x0064_0010, "LRLJ"),
    (0x0064_0510, "LRM1J"),
    (0x0064_0610, "LRM2J"),
    (0x0064_0210, "LRSJ"),
    // MRAW(SRAW1) + Jpeg
    (0x0164_FF0F, "MR"),
    (0x0164_0013, "MRLJF"),
    (0x0164_0012, "MRLJN"),
    (0x0164_0113, "MRMJF"),
    (0x0164_0112, "MRMJN"),
    (0x0164_0213, "MRSJF"),
    (0x0164_0212, "MRSJN"),
    (0x0164_0E13, "MRS1JF"),
    (0x0164_0E12, "MRS1JN"),
    (0x0164_0F13, "MRS2JF"),
    (0x0164_1013, "MRS3JF"),
    (0x0164_0010, "MRLJ"),
    (0x0164_0510, "MRM1J"),
    (0x0164_0610, "MRM2J"),
    (0x0164_0210, "MRSJ"),
    // SRAW(SRAW2) + Jpeg
    (0x0264_FF0F, "SR"),
    (0x0264_0013, "SRLJF"),
    (0x0264_0012, "SRLJN"),
    (0x0264_0113, "SRMJF"),
    (0x0264_0112, "SRMJN"),
    (0x0264_0213, "SRSJF"),
    (0x0264_0212, "SRSJN"),
    (0x0264_0E13, "SRS1JF"),
    (0x0264_0E12, "SRS1JN"),
    (0x0264_0F13, "SRS2JF"),
    (0x0264_1013, "SRS3JF"),
    (0x0264_0010, "SRLJ"),
    (0x0264_0510, "SRM1J"),
    (0x0264_0610, "SRM2J"),
    (0x0264_0210, "SRSJ"),
    (0xFFFF_FFFF, "Unknown"),
]);

/// Long description for an image quality short name
///
/// Returns `"Unknown Image Quality"` for names not in the table.
pub fn quality_description(short: &str) -> &'static str {
    match short {
        // Jpeg only
        "LJ" => "Jpeg Large",
        "M1J" => "Jpeg Middle1",
        "M2J" => "Jpeg Middle2",
        "SJ" => "Jpeg Small",
        "LJF" => "Jpeg Large Fine",
        "LJN" => "Jpeg Large Normal",
        "MJF" => "Jpeg Middle Fine",
        "MJN" => "Jpeg Middle Normal",
        "SJF" => "Jpeg Small Fine",
        "SJN" => "Jpeg Small Normal",
        "S1JF" => "Jpeg Small1 Fine",
        "S1JN" => "Jpeg Small1 Normal",
        "S2JF" => "Jpeg Small2",
        "S3JF" => "Jpeg Small3",

        // RAW + Jpeg
        "LR" => "RAW",
        "LRLJF" => "RAW + Jpeg Large Fine",
        "LRLJN" => "RAW + Jpeg Large Normal",
        "LRMJF" => "RAW + Jpeg Middle Fine",
        "LRMJN" => "RAW + Jpeg Middle Normal",
        "LRSJF" => "RAW + Jpeg Small Fine",
        "LRSJN" => "RAW + Jpeg Small Normal",
        "LRS1JF" => "RAW + Jpeg Small1 Fine",
        "LRS1JN" => "RAW + Jpeg Small1 Normal",
        "LRS2JF" => "RAW + Jpeg Small2",
        "LRS3JF" => "RAW + Jpeg Small3",
        "LRLJ" => "RAW + Jpeg Large",
        "LRM1J" => "RAW + Jpeg Middle1",
        "LRM2J" => "RAW + Jpeg Middle2",
        "LRSJ" => "RAW + Jpeg Small",

        // MRAW(SRAW1) + Jpeg
        "MR" => "MRAW(SRAW1)",
        "MRLJF" => "MRAW(SRAW1) + Jpeg Large Fine",
        "MRLJN" => "MRAW(SRAW1) + Jpeg Large Normal",
        "MRMJF" => "MRAW(SRAW1) + Jpeg Middle Fine",
        "MRMJN" => "MRAW(SRAW1) + Jpeg Middle Normal",
        "MRSJF" => "MRAW(SRAW1) + Jpeg Small Fine",
        "MRSJN" => "MRAW(SRAW1) + Jpeg Small Normal",
        "MRS1JF" => "MRAW(SRAW1) + Jpeg Small1 Fine",
        "MRS1JN" => "MRAW(SRAW1) + Jpeg Small1 Normal",
        "MRS2JF" => "MRAW(SRAW1) + Jpeg Small2",
        "MRS3JF" => "MRAW(SRAW1) + Jpeg Small3",
        "MRLJ" => "MRAW(SRAW1) + Jpeg Large",
        "MRM1J" => "MRAW(SRAW1) + Jpeg Middle1",
        "MRM2J" => "MRAW(SRAW1) + Jpeg Middle2",
        "MRSJ" => "MRAW(SRAW1) + Jpeg Small",

        // SRAW(SRAW2) + Jpeg
        "SR" => "SRAW(SRAW2)",
        "SRLJF" => "SRAW(SRAW2) + Jpeg Large Fine",
        "SRLJN" => "SRAW(SRAW2) + Jpeg Large Normal",
        "SRMJF" => "SRAW(SRAW2) + Jpeg Middle Fine",
        "SRMJN" => "SRAW(SRAW2) + Jpeg Middle Normal",
        "SRSJF" => "SRAW(SRAW2) + Jpeg Small Fine",
        "SRSJN" => "SRAW(SRAW2) + Jpeg Small Normal",
        "SRS1JF" => "SRAW(SRAW2) + Jpeg Small1 Fine",
        "SRS1JN" => "SRAW(SRAW2) + Jpeg Small1 Normal",
        "SRS2JF" => "SRAW(SRAW2) + Jpeg Small2",
        "SRS3JF" => "SRAW(SRAW2) + Jpeg Small3",
        "SRLJ" => "SRAW(SRAW2) + Jpeg Large",
        "SRM1J" => "SRAW(SRAW2) + Jpeg Middle1",
        "SRM2J" => "SRAW(SRAW2) + Jpeg Middle2",
        "SRSJ" => "SRAW(SRAW2) + Jpeg Small",

        _ => "Unknown Image Quality",
    }
}
