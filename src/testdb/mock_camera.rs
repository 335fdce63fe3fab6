//! Simulated camera implementing the SDK trait
//!
//! `MockCamera` behaves like a connected EOS body as far as the helpers can
//! tell: properties have a fixed native size and refuse mismatched buffers,
//! files on the card can be downloaded into real files, and live view renders
//! JPEG frames into memory streams once the mode and output device are set.
//!
//! Every object the camera hands out through a `create_*` call is tracked, so
//! tests can assert that an operation released exactly what it acquired.
//! Failures are injected per call with [`MockCamera::fail_next`].

use crate::sdk::{
    evf_output_device, Access, DataType, DeviceHandle, DirectoryItemInfo, EdsSdk,
    FileCreateDisposition, PropertyDesc, PropertyId, RawRef, SdkResult, Status, IMAGE_QUALITIES,
};
use crate::testdb::generator::{MockDataGenerator, TEST_FILE_SIZE};
use log::trace;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Value returned by `release` for a reference the camera does not own
const RELEASE_ERROR: u32 = 0xFFFF_FFFF;

/// Reference of the simulated camera itself
const CAMERA_REF: RawRef = RawRef(0x1000);

/// SDK entry points, for failure injection and call logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    GetPropertySize,
    GetPropertyData,
    SetPropertyData,
    GetPropertyDesc,
    GetDirectoryItemInfo,
    CreateFileStream,
    CreateMemoryStream,
    Download,
    DownloadComplete,
    DeleteDirectoryItem,
    CreateEvfImageRef,
    DownloadEvfImage,
    GetLength,
    StreamMemory,
    Release,
}

/// Configuration for mock camera behavior
#[derive(Debug, Clone)]
pub struct MockCameraConfig {
    /// Frame requests answered "not ready" each time live view is switched on
    pub frames_not_ready: usize,
    /// Random "not ready" answers to frame requests (percentage 0-100)
    pub random_not_ready_rate: u8,
    /// Simulate slow transfers (milliseconds delay per KB)
    pub transfer_delay_ms_per_kb: u64,
    /// Value of the ProductName property
    pub product_name: String,
}

impl Default for MockCameraConfig {
    fn default() -> Self {
        Self {
            frames_not_ready: 0,
            random_not_ready_rate: 0,
            transfer_delay_ms_per_kb: 0,
            product_name: "Canon EOS Mock".to_string(),
        }
    }
}

/// A property value with its native type; the native size is `data.len()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProperty {
    pub data_type: DataType,
    pub data: Vec<u8>,
}

impl MockProperty {
    /// A native 32-bit unsigned integer
    pub fn u32(value: u32) -> Self {
        Self {
            data_type: DataType::UInt32,
            data: value.to_ne_bytes().to_vec(),
        }
    }

    /// A NUL-padded string in a buffer of `width` bytes
    pub fn string(value: &str, width: usize) -> Self {
        let mut data = vec![0u8; width];
        let len = value.len().min(width.saturating_sub(1));
        data[..len].copy_from_slice(&value.as_bytes()[..len]);
        Self {
            data_type: DataType::String,
            data,
        }
    }

    /// An opaque block of bytes
    pub fn bytes(data: Vec<u8>) -> Self {
        Self {
            data_type: DataType::ByteBlock,
            data,
        }
    }
}

#[derive(Debug, Clone)]
struct MockItem {
    info: DirectoryItemInfo,
    content: Vec<u8>,
    deleted: bool,
    completed: bool,
}

#[derive(Debug)]
enum MockObject {
    FileStream { path: PathBuf },
    MemoryStream { data: Vec<u8> },
    EvfImage { stream: RawRef },
}

#[derive(Debug, Default)]
struct MockState {
    next_handle: usize,
    properties: HashMap<(RawRef, PropertyId, i32), MockProperty>,
    descriptors: HashMap<(RawRef, PropertyId), PropertyDesc>,
    items: HashMap<RawRef, MockItem>,
    objects: HashMap<RawRef, MockObject>,
    released: HashSet<RawRef>,
    created_count: usize,
    released_count: usize,
    double_releases: usize,
    invalid_releases: usize,
    failures: HashMap<MockOp, Status>,
    calls: Vec<MockOp>,
    frames: VecDeque<Vec<u8>>,
    current_frame: Option<Vec<u8>>,
    not_ready_remaining: usize,
}

impl MockState {
    /// Log the call and take any failure queued for it
    fn enter(&mut self, op: MockOp) -> Status {
        self.calls.push(op);
        self.failures.remove(&op).unwrap_or(Status::OK)
    }

    fn allocate(&mut self) -> RawRef {
        self.next_handle += 0x10;
        RawRef(0x2000 + self.next_handle)
    }

    fn create_object(&mut self, object: MockObject) -> RawRef {
        let handle = self.allocate();
        trace!("mock: created {:?} as {}", object, handle);
        self.objects.insert(handle, object);
        self.created_count += 1;
        handle
    }

    fn read_u32(&self, object: RawRef, property: PropertyId) -> Option<u32> {
        self.properties
            .get(&(object, property, 0))
            .and_then(|p| p.data.get(..4))
            .and_then(|bytes| bytes.try_into().ok())
            .map(u32::from_ne_bytes)
    }

    fn live_view_on(&self) -> bool {
        self.read_u32(CAMERA_REF, PropertyId::EVF_MODE) == Some(1)
            && self
                .read_u32(CAMERA_REF, PropertyId::EVF_OUTPUT_DEVICE)
                .is_some_and(|device| device & evf_output_device::PC != 0)
    }

    fn live_item(&self, item: RawRef) -> SdkResult<&MockItem> {
        match self.items.get(&item) {
            Some(entry) if entry.deleted => Err(Status::DIR_ENTRY_NOT_FOUND),
            Some(entry) => Ok(entry),
            None => Err(Status::INVALID_HANDLE),
        }
    }
}

/// Look up an image quality code by its short name
fn quality_code(name: &str) -> i32 {
    IMAGE_QUALITIES.code_of(name).unwrap_or(0xffff_ffff) as u32 as i32
}

/// Simulated camera
pub struct MockCamera {
    config: MockCameraConfig,
    state: Mutex<MockState>,
}

impl MockCamera {
    /// Create a camera with the default property set and an empty card
    pub fn new() -> Self {
        Self::with_config(MockCameraConfig::default())
    }

    /// Create with specific configuration
    pub fn with_config(config: MockCameraConfig) -> Self {
        let camera = Self {
            state: Mutex::new(MockState::default()),
            config,
        };

        camera.set_property(
            CAMERA_REF,
            PropertyId::PRODUCT_NAME,
            MockProperty::string(&camera.config.product_name, 32),
        );
        camera.set_property(CAMERA_REF, PropertyId::EVF_MODE, MockProperty::u32(0));
        camera.set_property(
            CAMERA_REF,
            PropertyId::EVF_OUTPUT_DEVICE,
            MockProperty::u32(evf_output_device::TFT),
        );
        camera.set_property(
            CAMERA_REF,
            PropertyId::IMAGE_QUALITY,
            MockProperty::u32(quality_code("LJF") as u32),
        );
        camera.set_property(
            CAMERA_REF,
            PropertyId::BATTERY_LEVEL,
            MockProperty::u32(100),
        );
        camera.set_descriptor(
            CAMERA_REF,
            PropertyId::IMAGE_QUALITY,
            PropertyDesc::from_codes(
                &["LJF", "LJN", "MJF", "SJF", "LR", "LRLJF"].map(quality_code),
            ),
        );

        camera
    }

    /// A camera with a few files on the card and a stream of live view frames
    pub fn with_sample_content() -> image::ImageResult<Self> {
        let camera = Self::new();

        for (seed, (name, size)) in [
            ("IMG_0001.JPG", TEST_FILE_SIZE),
            ("IMG_0002.CR2", TEST_FILE_SIZE * 2),
            ("IMG_0003.JPG", TEST_FILE_SIZE),
        ]
        .into_iter()
        .enumerate()
        {
            camera.add_item(
                name,
                MockDataGenerator::generate_for_name(name, size, seed as u64),
            );
        }

        camera.push_frames(MockDataGenerator::generate_frames(24)?);
        Ok(camera)
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The camera session handle
    pub fn camera(&self) -> DeviceHandle {
        DeviceHandle::from_raw(CAMERA_REF)
    }

    /// Define or replace a property (param 0)
    pub fn set_property(&self, object: RawRef, property: PropertyId, value: MockProperty) {
        self.set_property_param(object, property, 0, value);
    }

    /// Define or replace a property at a sub-index
    pub fn set_property_param(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
        value: MockProperty,
    ) {
        self.state()
            .properties
            .insert((object, property, param), value);
    }

    /// Current raw bytes of a property (param 0)
    pub fn property_bytes(&self, object: RawRef, property: PropertyId) -> Option<Vec<u8>> {
        self.state()
            .properties
            .get(&(object, property, 0))
            .map(|p| p.data.clone())
    }

    /// Define the legal value set of a property
    pub fn set_descriptor(&self, object: RawRef, property: PropertyId, desc: PropertyDesc) {
        self.state().descriptors.insert((object, property), desc);
    }

    /// Put a file on the card
    pub fn add_item(&self, name: &str, content: Vec<u8>) -> RawRef {
        let info = DirectoryItemInfo::new(name, content.len() as u64);
        self.add_item_with_info(info, content)
    }

    /// Put a file on the card with explicit metadata
    pub fn add_item_with_info(&self, info: DirectoryItemInfo, content: Vec<u8>) -> RawRef {
        let mut state = self.state();
        let handle = state.allocate();
        state.items.insert(
            handle,
            MockItem {
                info,
                content,
                deleted: false,
                completed: false,
            },
        );
        handle
    }

    /// Files still on the card, in the order they were added
    pub fn items(&self) -> Vec<(RawRef, DirectoryItemInfo)> {
        let state = self.state();
        let mut items: Vec<_> = state
            .items
            .iter()
            .filter(|(_, item)| !item.deleted)
            .map(|(handle, item)| (*handle, item.info.clone()))
            .collect();
        items.sort_by_key(|(handle, _)| handle.0);
        items
    }

    /// Whether the file was deleted from the card
    pub fn is_item_deleted(&self, item: RawRef) -> bool {
        self.state().items.get(&item).is_some_and(|i| i.deleted)
    }

    /// Whether the download-complete handshake was received for the file
    pub fn is_download_completed(&self, item: RawRef) -> bool {
        self.state().items.get(&item).is_some_and(|i| i.completed)
    }

    /// Queue a live view frame
    ///
    /// Frames are served in order; the last one keeps being served once the
    /// queue runs dry.
    pub fn push_frame(&self, frame: Vec<u8>) {
        self.state().frames.push_back(frame);
    }

    /// Queue several live view frames
    pub fn push_frames(&self, frames: impl IntoIterator<Item = Vec<u8>>) {
        self.state().frames.extend(frames);
    }

    /// Make the next call of `op` fail with `status`
    pub fn fail_next(&self, op: MockOp, status: Status) {
        self.state().failures.insert(op, status);
    }

    /// Every SDK call received so far, in order
    pub fn calls(&self) -> Vec<MockOp> {
        self.state().calls.clone()
    }

    /// Number of times `op` was called
    pub fn call_count(&self, op: MockOp) -> usize {
        self.state().calls.iter().filter(|c| **c == op).count()
    }

    /// Objects handed out by `create_*` calls
    pub fn created_count(&self) -> usize {
        self.state().created_count
    }

    /// Objects released exactly once
    pub fn released_count(&self) -> usize {
        self.state().released_count
    }

    /// Objects created and not yet released
    pub fn live_handles(&self) -> usize {
        self.state().objects.len()
    }

    /// Releases of an object that was already released
    pub fn double_releases(&self) -> usize {
        self.state().double_releases
    }

    /// Releases of references the caller never owned (null, camera, card files)
    pub fn invalid_releases(&self) -> usize {
        self.state().invalid_releases
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl EdsSdk for MockCamera {
    fn get_property_size(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
    ) -> SdkResult<(DataType, usize)> {
        let mut state = self.state();
        state.enter(MockOp::GetPropertySize).ok()?;

        state
            .properties
            .get(&(object, property, param))
            .map(|p| (p.data_type, p.data.len()))
            .ok_or(Status::PROPERTIES_UNAVAILABLE)
    }

    fn get_property_data(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
        out: &mut [u8],
    ) -> Status {
        let mut state = self.state();
        let injected = state.enter(MockOp::GetPropertyData);
        if !injected.is_ok() {
            return injected;
        }

        let Some(value) = state.properties.get(&(object, property, param)) else {
            return Status::PROPERTIES_UNAVAILABLE;
        };
        if value.data.len() != out.len() {
            return Status::INVALID_LENGTH;
        }
        out.copy_from_slice(&value.data);
        Status::OK
    }

    fn set_property_data(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
        data: &[u8],
    ) -> Status {
        let mut state = self.state();
        let injected = state.enter(MockOp::SetPropertyData);
        if !injected.is_ok() {
            return injected;
        }

        let was_on = state.live_view_on();
        let Some(value) = state.properties.get_mut(&(object, property, param)) else {
            return Status::PROPERTIES_UNAVAILABLE;
        };
        if value.data.len() != data.len() {
            return Status::INVALID_LENGTH;
        }
        value.data.copy_from_slice(data);

        if !was_on && state.live_view_on() {
            state.not_ready_remaining = self.config.frames_not_ready;
        }
        Status::OK
    }

    fn get_property_desc(&self, object: RawRef, property: PropertyId) -> SdkResult<PropertyDesc> {
        let mut state = self.state();
        state.enter(MockOp::GetPropertyDesc).ok()?;

        state
            .descriptors
            .get(&(object, property))
            .cloned()
            .ok_or(Status::NOT_SUPPORTED)
    }

    fn get_directory_item_info(&self, item: RawRef) -> SdkResult<DirectoryItemInfo> {
        let mut state = self.state();
        state.enter(MockOp::GetDirectoryItemInfo).ok()?;

        state.live_item(item).map(|entry| entry.info.clone())
    }

    fn create_file_stream(
        &self,
        path: &std::path::Path,
        disposition: FileCreateDisposition,
        access: Access,
    ) -> SdkResult<RawRef> {
        let mut state = self.state();
        state.enter(MockOp::CreateFileStream).ok()?;

        let mut options = fs::OpenOptions::new();
        options
            .read(matches!(access, Access::Read | Access::ReadWrite))
            .write(matches!(access, Access::Write | Access::ReadWrite));
        match disposition {
            FileCreateDisposition::CreateNew => {
                options.create_new(true);
            }
            FileCreateDisposition::CreateAlways => {
                options.create(true).truncate(true);
            }
            FileCreateDisposition::OpenExisting => {}
            FileCreateDisposition::OpenAlways => {
                options.create(true);
            }
            FileCreateDisposition::TruncateExisting => {
                options.truncate(true);
            }
        }
        options.open(path).map_err(|_| Status::FILE_OPEN_ERROR)?;

        Ok(state.create_object(MockObject::FileStream {
            path: path.to_path_buf(),
        }))
    }

    fn create_memory_stream(&self, _initial_size: u64) -> SdkResult<RawRef> {
        let mut state = self.state();
        state.enter(MockOp::CreateMemoryStream).ok()?;

        Ok(state.create_object(MockObject::MemoryStream { data: Vec::new() }))
    }

    fn download(&self, item: RawRef, size: u64, stream: RawRef) -> Status {
        let mut state = self.state();
        let injected = state.enter(MockOp::Download);
        if !injected.is_ok() {
            return injected;
        }

        let content = match state.live_item(item) {
            Ok(entry) => entry.content.clone(),
            Err(status) => return status,
        };
        let Ok(size) = usize::try_from(size) else {
            return Status::INVALID_LENGTH;
        };
        if size > content.len() {
            return Status::INVALID_LENGTH;
        }
        let bytes = &content[..size];

        if self.config.transfer_delay_ms_per_kb > 0 {
            let delay_ms = (size as u64 / 1024) * self.config.transfer_delay_ms_per_kb;
            std::thread::sleep(Duration::from_millis(delay_ms));
        }

        match state.objects.get_mut(&stream) {
            Some(MockObject::FileStream { path }) => match fs::write(path, bytes) {
                Ok(()) => Status::OK,
                Err(_) => Status::STREAM_WRITE_ERROR,
            },
            Some(MockObject::MemoryStream { data }) => {
                data.extend_from_slice(bytes);
                Status::OK
            }
            _ => Status::INVALID_HANDLE,
        }
    }

    fn download_complete(&self, item: RawRef) -> Status {
        let mut state = self.state();
        let injected = state.enter(MockOp::DownloadComplete);
        if !injected.is_ok() {
            return injected;
        }

        match state.items.get_mut(&item) {
            Some(entry) if !entry.deleted => {
                entry.completed = true;
                Status::OK
            }
            Some(_) => Status::DIR_ENTRY_NOT_FOUND,
            None => Status::INVALID_HANDLE,
        }
    }

    fn delete_directory_item(&self, item: RawRef) -> Status {
        let mut state = self.state();
        let injected = state.enter(MockOp::DeleteDirectoryItem);
        if !injected.is_ok() {
            return injected;
        }

        match state.items.get_mut(&item) {
            Some(entry) if !entry.deleted => {
                entry.deleted = true;
                Status::OK
            }
            Some(_) => Status::DIR_ENTRY_NOT_FOUND,
            None => Status::INVALID_HANDLE,
        }
    }

    fn create_evf_image_ref(&self, stream: RawRef) -> SdkResult<RawRef> {
        let mut state = self.state();
        state.enter(MockOp::CreateEvfImageRef).ok()?;

        match state.objects.get(&stream) {
            Some(MockObject::MemoryStream { .. }) => {
                Ok(state.create_object(MockObject::EvfImage { stream }))
            }
            _ => Err(Status::INVALID_HANDLE),
        }
    }

    fn download_evf_image(&self, camera: RawRef, image: RawRef) -> Status {
        let mut state = self.state();
        let injected = state.enter(MockOp::DownloadEvfImage);
        if !injected.is_ok() {
            return injected;
        }

        if camera != CAMERA_REF {
            return Status::INVALID_HANDLE;
        }
        let stream = match state.objects.get(&image) {
            Some(MockObject::EvfImage { stream }) => *stream,
            _ => return Status::INVALID_HANDLE,
        };

        if !state.live_view_on() {
            return Status::OBJECT_NOTREADY;
        }
        if state.not_ready_remaining > 0 {
            state.not_ready_remaining -= 1;
            return Status::OBJECT_NOTREADY;
        }
        if self.config.random_not_ready_rate > 0 {
            let roll = rand::random::<u8>() % 100;
            if roll < self.config.random_not_ready_rate {
                return Status::OBJECT_NOTREADY;
            }
        }

        if let Some(next) = state.frames.pop_front() {
            state.current_frame = Some(next);
        }
        let Some(frame) = state.current_frame.clone() else {
            return Status::OBJECT_NOTREADY;
        };

        match state.objects.get_mut(&stream) {
            Some(MockObject::MemoryStream { data }) => {
                *data = frame;
                Status::OK
            }
            _ => Status::INVALID_HANDLE,
        }
    }

    fn get_length(&self, stream: RawRef) -> SdkResult<u64> {
        let mut state = self.state();
        state.enter(MockOp::GetLength).ok()?;

        match state.objects.get(&stream) {
            Some(MockObject::MemoryStream { data }) => Ok(data.len() as u64),
            Some(MockObject::FileStream { path }) => {
                Ok(fs::metadata(path).map(|m| m.len()).unwrap_or(0))
            }
            _ => Err(Status::INVALID_HANDLE),
        }
    }

    fn with_stream_memory(
        &self,
        stream: RawRef,
        len: usize,
        read: &mut dyn FnMut(&[u8]),
    ) -> Status {
        let view = {
            let mut state = self.state();
            let injected = state.enter(MockOp::StreamMemory);
            if !injected.is_ok() {
                return injected;
            }

            match state.objects.get(&stream) {
                Some(MockObject::MemoryStream { data }) if len <= data.len() => {
                    data[..len].to_vec()
                }
                Some(MockObject::MemoryStream { .. }) => return Status::INVALID_LENGTH,
                _ => return Status::INVALID_HANDLE,
            }
        };

        read(&view);
        Status::OK
    }

    fn release(&self, object: RawRef) -> u32 {
        let mut state = self.state();
        state.calls.push(MockOp::Release);

        if state.objects.remove(&object).is_some() {
            trace!("mock: released {}", object);
            state.released.insert(object);
            state.released_count += 1;
            0
        } else if state.released.contains(&object) {
            state.double_releases += 1;
            RELEASE_ERROR
        } else {
            state.invalid_releases += 1;
            RELEASE_ERROR
        }
    }
}
