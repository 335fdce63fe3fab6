//! Property access
//!
//! Properties are raw byte buffers whose size is fixed by the property id.
//! The helpers here pass buffers through untouched: the size handed to the
//! SDK is always the buffer's length, and a size the camera does not accept
//! comes back as the camera's own status.

use crate::core::error::{check, EdsError, Result};
use crate::sdk::{c_buffer_to_string, DataType, EdsSdk, PropertyId, RawRef};
use log::debug;

/// Read a property that holds one native 32-bit integer
pub fn get_property(sdk: &dyn EdsSdk, object: RawRef, id: PropertyId, param: i32) -> Result<u32> {
    let mut buffer = [0u8; 4];
    check(
        "EdsGetPropertyData",
        sdk.get_property_data(object, id, param, &mut buffer),
    )?;

    let value = u32::from_ne_bytes(buffer);
    debug!("{} [{}] = {}", id, param, value);
    Ok(value)
}

/// Write a property from a caller-sized buffer
pub fn set_property(
    sdk: &dyn EdsSdk,
    object: RawRef,
    id: PropertyId,
    param: i32,
    buffer: &[u8],
) -> Result<()> {
    let status = sdk.set_property_data(object, id, param, buffer);
    debug!(
        "Set {} [{}] ({} bytes): {}",
        id,
        param,
        buffer.len(),
        status
    );
    check("EdsSetPropertyData", status)
}

/// Write a property that holds one native 32-bit integer
pub fn set_property_u32(
    sdk: &dyn EdsSdk,
    object: RawRef,
    id: PropertyId,
    value: u32,
) -> Result<()> {
    set_property(sdk, object, id, 0, &value.to_ne_bytes())
}

/// Native type and size of a property
pub fn property_size(
    sdk: &dyn EdsSdk,
    object: RawRef,
    id: PropertyId,
    param: i32,
) -> Result<(DataType, usize)> {
    sdk.get_property_size(object, id, param)
        .map_err(|status| EdsError::device("EdsGetPropertySize", status))
}

/// Read a property of any width, sized by asking the camera first
pub fn get_property_data(
    sdk: &dyn EdsSdk,
    object: RawRef,
    id: PropertyId,
    param: i32,
) -> Result<Vec<u8>> {
    let (_, size) = property_size(sdk, object, id, param)?;
    let mut buffer = vec![0u8; size];
    check(
        "EdsGetPropertyData",
        sdk.get_property_data(object, id, param, &mut buffer),
    )?;
    Ok(buffer)
}

/// Read a string property, cut at the first NUL
pub fn get_property_string(sdk: &dyn EdsSdk, object: RawRef, id: PropertyId) -> Result<String> {
    get_property_data(sdk, object, id, 0).map(|bytes| c_buffer_to_string(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::Status;
    use crate::testdb::{MockCamera, MockOp, MockProperty};

    #[test]
    fn test_set_then_get_round_trip() {
        let mock = MockCamera::new();
        let camera = mock.camera().raw();

        set_property(&mock, camera, PropertyId::EVF_MODE, 0, &1u32.to_ne_bytes()).unwrap();
        assert_eq!(
            get_property(&mock, camera, PropertyId::EVF_MODE, 0).unwrap(),
            1
        );

        set_property_u32(&mock, camera, PropertyId::EVF_MODE, 0).unwrap();
        assert_eq!(
            get_property(&mock, camera, PropertyId::EVF_MODE, 0).unwrap(),
            0
        );
    }

    #[test]
    fn test_param_selects_sub_index() {
        let mock = MockCamera::new();
        let camera = mock.camera().raw();
        mock.set_property_param(camera, PropertyId::AV, 1, MockProperty::u32(0x30));

        set_property(&mock, camera, PropertyId::AV, 1, &0x38u32.to_ne_bytes()).unwrap();
        assert_eq!(
            get_property(&mock, camera, PropertyId::AV, 1).unwrap(),
            0x38
        );
        assert!(get_property(&mock, camera, PropertyId::AV, 0).is_err());
    }

    #[test]
    fn test_wrong_size_is_reported_by_the_camera() {
        let mock = MockCamera::new();
        let camera = mock.camera().raw();

        let err = set_property(&mock, camera, PropertyId::EVF_MODE, 0, &[1]).unwrap_err();
        assert_eq!(err.status(), Some(Status::INVALID_LENGTH));
        assert!(matches!(err, EdsError::Device { .. }));

        // Nothing was written
        assert_eq!(
            get_property(&mock, camera, PropertyId::EVF_MODE, 0).unwrap(),
            0
        );
    }

    #[test]
    fn test_status_is_forwarded_unchanged() {
        let mock = MockCamera::new();
        let camera = mock.camera().raw();
        mock.fail_next(MockOp::GetPropertyData, Status::COMM_DISCONNECTED);

        let err = get_property(&mock, camera, PropertyId::BATTERY_LEVEL, 0).unwrap_err();
        assert_eq!(err.status(), Some(Status::COMM_DISCONNECTED));
    }

    #[test]
    fn test_busy_camera_is_transient() {
        let mock = MockCamera::new();
        let camera = mock.camera().raw();
        mock.fail_next(MockOp::SetPropertyData, Status::DEVICE_BUSY);

        let err = set_property_u32(&mock, camera, PropertyId::EVF_MODE, 1).unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_variable_width_property() {
        let mock = MockCamera::new();
        let camera = mock.camera().raw();

        let (data_type, size) = property_size(&mock, camera, PropertyId::PRODUCT_NAME, 0).unwrap();
        assert_eq!(data_type, DataType::String);
        assert_eq!(size, 32);

        let bytes = get_property_data(&mock, camera, PropertyId::PRODUCT_NAME, 0).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(
            get_property_string(&mock, camera, PropertyId::PRODUCT_NAME).unwrap(),
            "Canon EOS Mock"
        );
    }

    #[test]
    fn test_unknown_property() {
        let mock = MockCamera::new();
        let err = property_size(&mock, mock.camera().raw(), PropertyId::UNKNOWN, 0).unwrap_err();
        assert_eq!(err.status(), Some(Status::PROPERTIES_UNAVAILABLE));
    }
}
