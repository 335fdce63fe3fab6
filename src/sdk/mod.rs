//! Native SDK binding layer
//!
//! This module is the only place that knows the shape of the vendor SDK.
//!
//! # Submodules
//!
//! - `traits` - The `EdsSdk` trait every backend implements
//! - `types` - Handles, property ids and owned mirrors of native structs
//! - `status` - Status codes returned by every call
//! - `tables` - Static code-to-name tables
//! - `native` - Runtime-loaded binding to the vendor shared library
//!
//! # Architecture
//!
//! The helpers in `crate::eds` take `&dyn EdsSdk`, so the same protocol code
//! runs against the real library (`NativeSdk`) and against the simulated
//! camera in `crate::testdb`.

pub mod native;
pub mod status;
pub mod tables;
pub mod traits;
pub mod types;

pub use native::NativeSdk;
pub use status::Status;
pub use tables::{quality_description, CodeTable, IMAGE_QUALITIES, PROPERTY_NAMES, STATUS_NAMES};
pub use traits::{EdsSdk, SdkResult};
pub use types::{
    c_buffer_to_string, evf_output_device, Access, DataType, DeviceHandle, DirectoryItemInfo,
    FileCreateDisposition, PropertyDesc, PropertyId, RawRef, MAX_DESC_ELEMENTS, MAX_NAME,
};
