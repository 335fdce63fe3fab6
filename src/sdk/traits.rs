//! SDK abstraction trait
//!
//! `EdsSdk` has one method per native entry point the helpers need. The real
//! binding (`NativeSdk`) and the simulated camera (`MockCamera`) both
//! implement it, so every protocol in `crate::eds` can be exercised without a
//! camera attached.
//!
//! Methods mirror the C calls closely: they take raw references, return a
//! `Status` (or a value with the status as the error) and never interpret
//! a failure. Ownership rules are the SDK's: any `RawRef` returned from a
//! `create_*` method must eventually be passed to [`EdsSdk::release`] exactly
//! once.
//!
//! # Concurrency
//!
//! The SDK is not reentrant. Implementations are `Send + Sync` so they can be
//! moved into whatever context serializes access to the camera, but callers
//! must never issue two calls against the same camera at the same time.

use super::status::Status;
use super::types::{
    Access, DataType, DirectoryItemInfo, FileCreateDisposition, PropertyDesc, PropertyId, RawRef,
};
use std::path::Path;

/// Result of an SDK call that produces a value
pub type SdkResult<T> = std::result::Result<T, Status>;

/// Trait over the native camera SDK
pub trait EdsSdk: Send + Sync {
    /// Query the native type and byte size of a property
    fn get_property_size(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
    ) -> SdkResult<(DataType, usize)>;

    /// Read a property into `out`
    ///
    /// The size handed to the SDK is `out.len()`; a mismatch with the
    /// property's native size is reported by the camera, not checked here.
    fn get_property_data(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
        out: &mut [u8],
    ) -> Status;

    /// Write a property from `data`
    ///
    /// The size handed to the SDK is `data.len()`.
    fn set_property_data(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
        data: &[u8],
    ) -> Status;

    /// Query the legal values of a property in the camera's current state
    fn get_property_desc(&self, object: RawRef, property: PropertyId) -> SdkResult<PropertyDesc>;

    /// Query metadata for a file on the camera
    fn get_directory_item_info(&self, item: RawRef) -> SdkResult<DirectoryItemInfo>;

    /// Open a stream backed by a local file
    ///
    /// The returned reference is owned by the caller.
    fn create_file_stream(
        &self,
        path: &Path,
        disposition: FileCreateDisposition,
        access: Access,
    ) -> SdkResult<RawRef>;

    /// Create a growable in-memory stream
    ///
    /// `initial_size` of zero lets the SDK grow the buffer as data arrives.
    /// The returned reference is owned by the caller.
    fn create_memory_stream(&self, initial_size: u64) -> SdkResult<RawRef>;

    /// Transfer `size` bytes of a directory item into a stream
    ///
    /// Blocks for the whole transfer.
    fn download(&self, item: RawRef, size: u64, stream: RawRef) -> Status;

    /// Tell the camera a transfer finished so it unlocks the item
    fn download_complete(&self, item: RawRef) -> Status;

    /// Delete a file from the camera's storage
    fn delete_directory_item(&self, item: RawRef) -> Status;

    /// Create a live view image object that renders into `stream`
    ///
    /// The returned reference is owned by the caller.
    fn create_evf_image_ref(&self, stream: RawRef) -> SdkResult<RawRef>;

    /// Ask the camera to render its current live view frame into `image`
    ///
    /// Fails with `Status::OBJECT_NOTREADY` while no frame is available.
    fn download_evf_image(&self, camera: RawRef, image: RawRef) -> Status;

    /// Number of bytes currently held by a stream
    fn get_length(&self, stream: RawRef) -> SdkResult<u64>;

    /// Lend the first `len` bytes of a memory stream to `read`
    ///
    /// The binding is responsible for bounds: a `len` larger than the stream
    /// is refused with `Status::INVALID_LENGTH` and `read` is not called. The
    /// slice is only valid for the duration of the callback.
    fn with_stream_memory(&self, stream: RawRef, len: usize, read: &mut dyn FnMut(&[u8]))
        -> Status;

    /// Drop one reference to a native object
    ///
    /// Returns the remaining reference count. Releasing a reference that was
    /// already released is undefined in the native SDK.
    fn release(&self, object: RawRef) -> u32;
}
