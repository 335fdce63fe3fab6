//! Live view control and frame acquisition
//!
//! [`LiveView`] switches the camera's electronic viewfinder to the computer
//! and pulls single frames from it. The on/off state is tracked locally: a
//! frame is only requested after a successful [`LiveView::enable`], and
//! dropping an enabled controller hands the viewfinder back to the camera's
//! screen.
//!
//! Each frame goes through a fresh memory stream and image object, both
//! released before the frame is returned. Right after enabling, the camera
//! answers "not ready" for a while; that surfaces as a transient error from
//! [`LiveView::get_frame`] and as `Ok(None)` from [`LiveView::poll_frame`].

use crate::core::error::{check, EdsError, Result};
use crate::eds::handle::ObjectGuard;
use crate::eds::property::{get_property, set_property_u32};
use crate::sdk::{evf_output_device, DeviceHandle, EdsSdk, PropertyId, Status};
use image::{DynamicImage, ImageFormat};
use log::{debug, info, warn};

/// Live view controller for one camera
pub struct LiveView<'a> {
    sdk: &'a dyn EdsSdk,
    camera: DeviceHandle,
    enabled: bool,
}

impl<'a> LiveView<'a> {
    /// Create a controller in the disabled state
    pub fn new(sdk: &'a dyn EdsSdk, camera: DeviceHandle) -> Self {
        Self {
            sdk,
            camera,
            enabled: false,
        }
    }

    /// Turn live view on and route it to the computer
    ///
    /// Sets the mode flag, then the output device. If either write fails the
    /// controller stays disabled and the first error is returned.
    pub fn enable(&mut self) -> Result<()> {
        let camera = self.camera.raw();
        set_property_u32(self.sdk, camera, PropertyId::EVF_MODE, 1)?;
        set_property_u32(
            self.sdk,
            camera,
            PropertyId::EVF_OUTPUT_DEVICE,
            evf_output_device::PC,
        )?;

        self.enabled = true;
        info!("Live view enabled");
        Ok(())
    }

    /// Turn live view off and give the viewfinder back to the camera
    ///
    /// Both writes are attempted; failures are logged and otherwise ignored.
    pub fn disable(&mut self) {
        let camera = self.camera.raw();
        if let Err(e) = set_property_u32(self.sdk, camera, PropertyId::EVF_MODE, 0) {
            warn!("Could not clear live view mode: {}", e);
        }
        if let Err(e) = set_property_u32(
            self.sdk,
            camera,
            PropertyId::EVF_OUTPUT_DEVICE,
            evf_output_device::TFT,
        ) {
            warn!("Could not return live view to the camera screen: {}", e);
        }

        if self.enabled {
            info!("Live view disabled");
        }
        self.enabled = false;
    }

    /// Ask the camera whether its live view mode flag is set
    pub fn is_enabled(&self) -> Result<bool> {
        Ok(get_property(self.sdk, self.camera.raw(), PropertyId::EVF_MODE, 0)? == 1)
    }

    /// Whether this controller enabled live view and has not disabled it since
    pub fn is_active(&self) -> bool {
        self.enabled
    }

    /// Fetch the current frame as compressed JPEG bytes
    pub fn get_frame_bytes(&self) -> Result<Vec<u8>> {
        if !self.enabled {
            return Err(EdsError::LiveViewDisabled);
        }

        let sdk = self.sdk;
        let stream = sdk
            .create_memory_stream(0)
            .map_err(|status| EdsError::device("EdsCreateMemoryStream", status))?;
        let stream = ObjectGuard::new(sdk, stream);

        let image = sdk
            .create_evf_image_ref(stream.raw())
            .map_err(|status| EdsError::device("EdsCreateEvfImageRef", status))?;
        let image = ObjectGuard::new(sdk, image);

        check(
            "EdsDownloadEvfImage",
            sdk.download_evf_image(self.camera.raw(), image.raw()),
        )?;

        let length = sdk
            .get_length(stream.raw())
            .map_err(|status| EdsError::device("EdsGetLength", status))?;
        let len = usize::try_from(length).map_err(|_| EdsError::InvalidView {
            requested: length,
            available: usize::MAX as u64,
        })?;

        let mut bytes = Vec::with_capacity(len);
        let status = sdk.with_stream_memory(stream.raw(), len, &mut |view: &[u8]| {
            bytes.extend_from_slice(view)
        });
        if status == Status::INVALID_LENGTH {
            let available = sdk.get_length(stream.raw()).unwrap_or(0);
            return Err(EdsError::InvalidView {
                requested: length,
                available,
            });
        }
        check("EdsGetPointer", status)?;

        debug!("Live view frame: {} bytes", bytes.len());
        Ok(bytes)
    }

    /// Fetch and decode the current frame
    pub fn get_frame(&self) -> Result<DynamicImage> {
        let bytes = self.get_frame_bytes()?;
        Ok(image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)?)
    }

    /// Like [`get_frame`](Self::get_frame), but "not ready yet" is `Ok(None)`
    pub fn poll_frame(&self) -> Result<Option<DynamicImage>> {
        match self.get_frame() {
            Ok(frame) => Ok(Some(frame)),
            Err(e) if e.is_transient() => {
                debug!("Live view frame not ready: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl Drop for LiveView<'_> {
    fn drop(&mut self) {
        if self.enabled {
            self.disable();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdb::{MockCamera, MockCameraConfig, MockDataGenerator, MockOp};

    fn camera_with_frames(count: usize) -> MockCamera {
        let mock = MockCamera::new();
        mock.push_frames(MockDataGenerator::generate_frames(count).unwrap());
        mock
    }

    fn evf_mode(mock: &MockCamera) -> Vec<u8> {
        mock.property_bytes(mock.camera().raw(), PropertyId::EVF_MODE)
            .unwrap()
    }

    fn output_device(mock: &MockCamera) -> Vec<u8> {
        mock.property_bytes(mock.camera().raw(), PropertyId::EVF_OUTPUT_DEVICE)
            .unwrap()
    }

    #[test]
    fn test_enable_sets_mode_then_output_device() {
        let mock = MockCamera::new();
        let mut live_view = LiveView::new(&mock, mock.camera());

        live_view.enable().unwrap();
        assert!(live_view.is_active());
        assert!(live_view.is_enabled().unwrap());
        assert_eq!(evf_mode(&mock), 1u32.to_ne_bytes());
        assert_eq!(output_device(&mock), evf_output_device::PC.to_ne_bytes());
        assert_eq!(
            mock.calls(),
            vec![MockOp::SetPropertyData, MockOp::SetPropertyData, MockOp::GetPropertyData]
        );
    }

    #[test]
    fn test_disable_restores_camera_screen() {
        let mock = MockCamera::new();
        let mut live_view = LiveView::new(&mock, mock.camera());
        live_view.enable().unwrap();

        live_view.disable();
        assert!(!live_view.is_active());
        assert!(!live_view.is_enabled().unwrap());
        assert_eq!(output_device(&mock), evf_output_device::TFT.to_ne_bytes());
    }

    #[test]
    fn test_failed_enable_stays_disabled() {
        let mock = camera_with_frames(1);
        mock.fail_next(MockOp::SetPropertyData, Status::DEVICE_BUSY);
        let mut live_view = LiveView::new(&mock, mock.camera());

        let err = live_view.enable().unwrap_err();
        assert!(err.is_transient());
        assert!(!live_view.is_active());
        assert!(matches!(
            live_view.get_frame(),
            Err(EdsError::LiveViewDisabled)
        ));
    }

    #[test]
    fn test_output_device_failure_fails_enable() {
        let mock = MockCamera::new();
        let mut live_view = LiveView::new(&mock, mock.camera());
        // First write (mode) succeeds, second (output device) is refused
        mock.set_property(
            mock.camera().raw(),
            PropertyId::EVF_OUTPUT_DEVICE,
            crate::testdb::MockProperty::bytes(vec![0; 2]),
        );

        let err = live_view.enable().unwrap_err();
        assert_eq!(err.status(), Some(Status::INVALID_LENGTH));
        assert!(!live_view.is_active());
    }

    #[test]
    fn test_disable_failures_are_suppressed() {
        let mock = MockCamera::new();
        let mut live_view = LiveView::new(&mock, mock.camera());
        live_view.enable().unwrap();

        mock.fail_next(MockOp::SetPropertyData, Status::COMM_DISCONNECTED);
        live_view.disable();

        assert!(!live_view.is_active());
        // Second write still attempted
        assert_eq!(output_device(&mock), evf_output_device::TFT.to_ne_bytes());
    }

    #[test]
    fn test_frame_while_disabled_acquires_nothing() {
        let mock = camera_with_frames(1);
        let live_view = LiveView::new(&mock, mock.camera());

        assert!(matches!(
            live_view.get_frame(),
            Err(EdsError::LiveViewDisabled)
        ));
        assert!(matches!(
            live_view.poll_frame(),
            Err(EdsError::LiveViewDisabled)
        ));
        assert_eq!(mock.created_count(), 0);
    }

    #[test]
    fn test_get_frame_decodes_and_releases() {
        let mock = camera_with_frames(2);
        let mut live_view = LiveView::new(&mock, mock.camera());
        live_view.enable().unwrap();

        let frame = live_view.get_frame().unwrap();
        assert_eq!(frame.width(), crate::testdb::generator::FRAME_WIDTH);
        assert_eq!(frame.height(), crate::testdb::generator::FRAME_HEIGHT);
        assert_eq!(mock.created_count(), 2);
        assert_eq!(mock.released_count(), 2);
        assert_eq!(mock.live_handles(), 0);
        assert_eq!(mock.double_releases(), 0);
    }

    #[test]
    fn test_not_ready_is_transient() {
        let mock = MockCamera::with_config(MockCameraConfig {
            frames_not_ready: 2,
            ..Default::default()
        });
        mock.push_frames(MockDataGenerator::generate_frames(1).unwrap());
        let mut live_view = LiveView::new(&mock, mock.camera());
        live_view.enable().unwrap();

        let err = live_view.get_frame().unwrap_err();
        assert!(matches!(err, EdsError::Unavailable { .. }));
        assert!(live_view.poll_frame().unwrap().is_none());
        assert!(live_view.poll_frame().unwrap().is_some());
        assert_eq!(mock.live_handles(), 0);
        assert_eq!(mock.created_count(), 6);
    }

    #[test]
    fn test_zero_length_frame_is_decode_error() {
        let mock = MockCamera::new();
        mock.push_frame(Vec::new());
        let mut live_view = LiveView::new(&mock, mock.camera());
        live_view.enable().unwrap();

        let err = live_view.get_frame().unwrap_err();
        assert!(matches!(err, EdsError::Decode(_)));
        assert_eq!(mock.created_count(), 2);
        assert_eq!(mock.released_count(), 2);
        assert_eq!(mock.live_handles(), 0);
    }

    #[test]
    fn test_corrupt_frame_is_decode_error() {
        let mock = MockCamera::new();
        mock.push_frame(MockDataGenerator::generate_corrupt_frame());
        let mut live_view = LiveView::new(&mock, mock.camera());
        live_view.enable().unwrap();

        assert!(matches!(live_view.poll_frame(), Err(EdsError::Decode(_))));
        assert_eq!(mock.live_handles(), 0);
    }

    #[test]
    fn test_handles_released_on_every_failure() {
        for op in [
            MockOp::CreateMemoryStream,
            MockOp::CreateEvfImageRef,
            MockOp::DownloadEvfImage,
            MockOp::GetLength,
            MockOp::StreamMemory,
        ] {
            let mock = camera_with_frames(1);
            let mut live_view = LiveView::new(&mock, mock.camera());
            live_view.enable().unwrap();
            mock.fail_next(op, Status::INTERNAL_ERROR);

            let err = live_view.get_frame().unwrap_err();
            assert_eq!(err.status(), Some(Status::INTERNAL_ERROR), "{:?}", op);
            assert_eq!(mock.live_handles(), 0, "{:?}", op);
            assert_eq!(mock.created_count(), mock.released_count(), "{:?}", op);
            assert_eq!(mock.double_releases(), 0, "{:?}", op);
            assert_eq!(mock.invalid_releases(), 0, "{:?}", op);
        }
    }

    #[test]
    fn test_oversized_view_is_refused() {
        let mock = camera_with_frames(1);
        let mut live_view = LiveView::new(&mock, mock.camera());
        live_view.enable().unwrap();
        mock.fail_next(MockOp::StreamMemory, Status::INVALID_LENGTH);

        assert!(matches!(
            live_view.get_frame(),
            Err(EdsError::InvalidView { .. })
        ));
        assert_eq!(mock.live_handles(), 0);
    }

    #[test]
    fn test_drop_disables_live_view() {
        let mock = camera_with_frames(1);
        {
            let mut live_view = LiveView::new(&mock, mock.camera());
            live_view.enable().unwrap();
        }
        assert_eq!(evf_mode(&mock), 0u32.to_ne_bytes());
        assert_eq!(output_device(&mock), evf_output_device::TFT.to_ne_bytes());
    }

    #[test]
    fn test_drop_of_disabled_controller_touches_nothing() {
        let mock = MockCamera::new();
        drop(LiveView::new(&mock, mock.camera()));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_raw_frame_bytes_are_jpeg() {
        let mock = camera_with_frames(1);
        let mut live_view = LiveView::new(&mock, mock.camera());
        live_view.enable().unwrap();

        let bytes = live_view.get_frame_bytes().unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }
}
