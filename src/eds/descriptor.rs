//! Legal value sets of properties
//!
//! The camera reports which values a property accepts in its current state as
//! a list of bare codes. These are turned into `(name, code)` pairs using one
//! of the static tables in `crate::sdk::tables`.

use crate::core::error::{EdsError, Result};
use crate::sdk::{CodeTable, DeviceHandle, EdsSdk, PropertyId, RawRef, IMAGE_QUALITIES};
use log::debug;

pub use crate::sdk::quality_description;

/// Name for `code`, or `Unknown:<code>` when the table has none
///
/// Codes are compared as unsigned 32-bit patterns, which is how the vendor
/// headers write them.
pub fn resolve_code(table: &CodeTable, code: i32) -> String {
    match table.name_of(code as u32 as i64) {
        Some(name) => name.to_string(),
        None => format!("Unknown:{}", code),
    }
}

/// Legal values of a property, named through `table`
///
/// Entries keep the camera's order and duplicates. An element count beyond
/// the descriptor's capacity is clamped to the capacity.
pub fn describe_property(
    sdk: &dyn EdsSdk,
    object: RawRef,
    id: PropertyId,
    table: &CodeTable,
) -> Result<Vec<(String, i32)>> {
    let desc = sdk
        .get_property_desc(object, id)
        .map_err(|status| EdsError::device("EdsGetPropertyDesc", status))?;

    let values: Vec<(String, i32)> = desc
        .codes()
        .iter()
        .map(|&code| (resolve_code(table, code), code))
        .collect();

    debug!(
        "{}: {} legal values (camera reported {})",
        id,
        values.len(),
        desc.num_elements
    );
    Ok(values)
}

/// Image qualities the camera accepts right now, by short name (`LJF`, `LR`, ...)
pub fn list_image_qualities(sdk: &dyn EdsSdk, camera: DeviceHandle) -> Result<Vec<(String, i32)>> {
    describe_property(
        sdk,
        camera.raw(),
        PropertyId::IMAGE_QUALITY,
        &IMAGE_QUALITIES,
    )
}
