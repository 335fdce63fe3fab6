//! Value types shared by the SDK binding and the helpers built on it
//!
//! Everything here mirrors a native EDSDK type, but in a form that can be
//! passed around safely: handles are plain integers, fixed-size native
//! structs are owned Rust structs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque native object reference (`EdsBaseRef`)
///
/// The value is the pointer the SDK handed out, stored as an integer so the
/// type stays `Send`. Zero is the null reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawRef(pub usize);

impl RawRef {
    /// The null reference
    pub const NULL: RawRef = RawRef(0);

    /// Check whether this is the null reference
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RawRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A connected camera session (`EdsCameraRef`)
///
/// Owned by whoever opened the session. Operations in this crate only borrow
/// it and never release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(RawRef);

impl DeviceHandle {
    /// Wrap a camera reference obtained from the session owner
    pub fn from_raw(raw: RawRef) -> Self {
        Self(raw)
    }

    /// The underlying reference, for passing to the SDK
    pub fn raw(&self) -> RawRef {
        self.0
    }
}

/// Numeric property identifier (`EdsPropertyID`)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PropertyId(pub u32);

impl PropertyId {
    pub const UNKNOWN: PropertyId = PropertyId(0x0000_ffff);
    pub const PRODUCT_NAME: PropertyId = PropertyId(0x0000_0002);
    pub const OWNER_NAME: PropertyId = PropertyId(0x0000_0004);
    pub const MAKER_NAME: PropertyId = PropertyId(0x0000_0005);
    pub const DATE_TIME: PropertyId = PropertyId(0x0000_0006);
    pub const FIRMWARE_VERSION: PropertyId = PropertyId(0x0000_0007);
    pub const BATTERY_LEVEL: PropertyId = PropertyId(0x0000_0008);
    pub const SAVE_TO: PropertyId = PropertyId(0x0000_000b);
    pub const CURRENT_STORAGE: PropertyId = PropertyId(0x0000_000c);
    pub const CURRENT_FOLDER: PropertyId = PropertyId(0x0000_000d);
    pub const BATTERY_QUALITY: PropertyId = PropertyId(0x0000_0010);
    pub const BODY_ID_EX: PropertyId = PropertyId(0x0000_0015);
    pub const IMAGE_QUALITY: PropertyId = PropertyId(0x0000_0100);
    pub const ORIENTATION: PropertyId = PropertyId(0x0000_0102);
    pub const WHITE_BALANCE: PropertyId = PropertyId(0x0000_0106);
    pub const COLOR_TEMPERATURE: PropertyId = PropertyId(0x0000_0107);
    pub const COLOR_SPACE: PropertyId = PropertyId(0x0000_010d);
    pub const PICTURE_STYLE: PropertyId = PropertyId(0x0000_0114);
    pub const AE_MODE: PropertyId = PropertyId(0x0000_0400);
    pub const DRIVE_MODE: PropertyId = PropertyId(0x0000_0401);
    pub const ISO_SPEED: PropertyId = PropertyId(0x0000_0402);
    pub const METERING_MODE: PropertyId = PropertyId(0x0000_0403);
    pub const AF_MODE: PropertyId = PropertyId(0x0000_0404);
    pub const AV: PropertyId = PropertyId(0x0000_0405);
    pub const TV: PropertyId = PropertyId(0x0000_0406);
    pub const EXPOSURE_COMPENSATION: PropertyId = PropertyId(0x0000_0407);
    pub const AVAILABLE_SHOTS: PropertyId = PropertyId(0x0000_040a);
    pub const EVF_OUTPUT_DEVICE: PropertyId = PropertyId(0x0000_0500);
    pub const EVF_MODE: PropertyId = PropertyId(0x0000_0501);
    pub const EVF_WHITE_BALANCE: PropertyId = PropertyId(0x0000_0502);
    pub const EVF_COLOR_TEMPERATURE: PropertyId = PropertyId(0x0000_0503);
    pub const EVF_DEPTH_OF_FIELD_PREVIEW: PropertyId = PropertyId(0x0000_0504);
    pub const EVF_ZOOM: PropertyId = PropertyId(0x0000_0507);
    pub const EVF_ZOOM_POSITION: PropertyId = PropertyId(0x0000_0508);
    pub const EVF_FOCUS_ASPECT: PropertyId = PropertyId(0x0000_0509);
    pub const EVF_HISTOGRAM: PropertyId = PropertyId(0x0000_050a);
    pub const EVF_IMAGE_POSITION: PropertyId = PropertyId(0x0000_050b);
    pub const EVF_HISTOGRAM_STATUS: PropertyId = PropertyId(0x0000_050c);
    pub const EVF_AF_MODE: PropertyId = PropertyId(0x0000_050e);
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match super::tables::PROPERTY_NAMES.name_of(self.0 as i64) {
            Some(name) => write!(f, "{} ({:#06x})", name, self.0),
            None => write!(f, "{:#06x}", self.0),
        }
    }
}

/// Values of the live view output device property (a bit mask)
pub mod evf_output_device {
    /// The camera's own rear screen
    pub const TFT: u32 = 1;
    /// The controlling computer
    pub const PC: u32 = 2;
}

/// Native data type tag reported by `EdsGetPropertySize` (`EdsDataType`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Unknown,
    Bool,
    String,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    ByteBlock,
    Rational,
    Point,
    Rect,
    Time,
    Int32Array,
    UInt32Array,
    /// A tag this crate does not name
    Other(u32),
}

impl DataType {
    /// Map the native tag to a variant
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => DataType::Unknown,
            1 => DataType::Bool,
            2 => DataType::String,
            3 => DataType::Int8,
            6 => DataType::UInt8,
            4 => DataType::Int16,
            7 => DataType::UInt16,
            8 => DataType::Int32,
            9 => DataType::UInt32,
            10 => DataType::Int64,
            11 => DataType::UInt64,
            12 => DataType::Float,
            13 => DataType::Double,
            14 => DataType::ByteBlock,
            20 => DataType::Rational,
            21 => DataType::Point,
            22 => DataType::Rect,
            23 => DataType::Time,
            33 => DataType::Int32Array,
            36 => DataType::UInt32Array,
            other => DataType::Other(other),
        }
    }
}

/// How a file stream is created (`EdsFileCreateDisposition`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FileCreateDisposition {
    CreateNew = 0,
    CreateAlways = 1,
    OpenExisting = 2,
    OpenAlways = 3,
    TruncateExisting = 4,
}

/// File stream access mode (`EdsAccess`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Access {
    Read = 0,
    Write = 1,
    ReadWrite = 2,
}

/// Width of the native filename buffer in `EdsDirectoryItemInfo`
pub const MAX_NAME: usize = 256;

/// Capacity of the code array in `EdsPropertyDesc`
pub const MAX_DESC_ELEMENTS: usize = 128;

/// Metadata describing a file on the camera before it is downloaded
#[derive(Clone, PartialEq, Eq)]
pub struct DirectoryItemInfo {
    /// Size in bytes
    pub size: u64,
    /// Whether the item is a folder
    pub is_folder: bool,
    /// Group the item belongs to (RAW+JPEG pairs share one)
    pub group_id: u32,
    /// Vendor option flags
    pub option: u32,
    /// Raw NUL-terminated filename buffer
    pub file_name: [u8; MAX_NAME],
    /// File format tag
    pub format: u32,
    /// Capture time as reported by the camera
    pub date_time: u32,
}

impl DirectoryItemInfo {
    /// Build an info block for a file called `name`
    ///
    /// Names longer than the native buffer are cut so a terminating NUL
    /// always fits.
    pub fn new(name: &str, size: u64) -> Self {
        let mut file_name = [0u8; MAX_NAME];
        let bytes = name.as_bytes();
        let len = bytes.len().min(MAX_NAME - 1);
        file_name[..len].copy_from_slice(&bytes[..len]);

        Self {
            size,
            is_folder: false,
            group_id: 0,
            option: 0,
            file_name,
            format: 0,
            date_time: 0,
        }
    }

    /// Filename as reported by the camera, cut at the first NUL
    pub fn file_name(&self) -> String {
        c_buffer_to_string(&self.file_name)
    }
}

impl Default for DirectoryItemInfo {
    fn default() -> Self {
        Self::new("", 0)
    }
}

impl fmt::Debug for DirectoryItemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryItemInfo")
            .field("size", &self.size)
            .field("is_folder", &self.is_folder)
            .field("group_id", &self.group_id)
            .field("option", &self.option)
            .field("file_name", &self.file_name())
            .field("format", &self.format)
            .field("date_time", &self.date_time)
            .finish()
    }
}

/// Legal values for a property in the camera's current state (`EdsPropertyDesc`)
#[derive(Clone, PartialEq, Eq)]
pub struct PropertyDesc {
    pub form: i32,
    pub access: i32,
    /// Number of valid entries in `prop_desc`, as reported by the camera
    pub num_elements: i32,
    pub prop_desc: [i32; MAX_DESC_ELEMENTS],
}

impl PropertyDesc {
    /// Build a descriptor holding `codes`, truncated to the native capacity
    pub fn from_codes(codes: &[i32]) -> Self {
        let mut prop_desc = [0i32; MAX_DESC_ELEMENTS];
        let len = codes.len().min(MAX_DESC_ELEMENTS);
        prop_desc[..len].copy_from_slice(&codes[..len]);

        Self {
            form: 0,
            access: 0,
            num_elements: len as i32,
            prop_desc,
        }
    }

    /// The valid codes, bounded by both the element count and the capacity
    pub fn codes(&self) -> &[i32] {
        let count = self.num_elements.clamp(0, MAX_DESC_ELEMENTS as i32) as usize;
        &self.prop_desc[..count]
    }
}

impl Default for PropertyDesc {
    fn default() -> Self {
        Self::from_codes(&[])
    }
}

impl fmt::Debug for PropertyDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDesc")
            .field("form", &self.form)
            .field("access", &self.access)
            .field("num_elements", &self.num_elements)
            .field("codes", &self.codes())
            .finish()
    }
}

/// Convert a C character buffer to a string
///
/// Buffers coming from the SDK are much longer than their content and carry a
/// NUL somewhere in the middle; everything from that NUL on is garbage. A
/// buffer without any NUL is taken whole.
pub fn c_buffer_to_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_buffer_truncates_at_first_nul() {
        let mut buffer = [0u8; 32];
        buffer[..12].copy_from_slice(b"IMG_0001.JPG");
        buffer[13..16].copy_from_slice(b"XYZ");

        assert_eq!(c_buffer_to_string(&buffer), "IMG_0001.JPG");
    }

    #[test]
    fn test_c_buffer_without_nul_is_taken_whole() {
        assert_eq!(c_buffer_to_string(b"ABC"), "ABC");
        assert_eq!(c_buffer_to_string(b""), "");
    }

    #[test]
    fn test_directory_item_info_name_is_cut_to_buffer() {
        let long_name = "A".repeat(400);
        let info = DirectoryItemInfo::new(&long_name, 10);

        assert_eq!(info.file_name().len(), MAX_NAME - 1);
        assert_eq!(info.file_name[MAX_NAME - 1], 0);
    }

    #[test]
    fn test_property_desc_codes_are_bounded() {
        let mut desc = PropertyDesc::from_codes(&[1, 2, 3]);
        assert_eq!(desc.codes(), &[1, 2, 3]);

        desc.num_elements = 500;
        assert_eq!(desc.codes().len(), MAX_DESC_ELEMENTS);

        desc.num_elements = -4;
        assert!(desc.codes().is_empty());
    }

    #[test]
    fn test_raw_ref_null() {
        assert!(RawRef::NULL.is_null());
        assert!(!RawRef(0x10).is_null());
        assert_eq!(RawRef(0x10).to_string(), "0x10");
    }

    #[test]
    fn test_property_id_display_uses_name_table() {
        assert_eq!(PropertyId::EVF_MODE.to_string(), "Evf_Mode (0x0501)");
        assert_eq!(PropertyId(0x7777).to_string(), "0x7777");
    }
}
