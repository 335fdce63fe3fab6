//! Binding to the vendor EDSDK shared library
//!
//! The library is not linked at build time. [`NativeSdk::load`] opens it with
//! `libloading`, resolves every entry point up front, and initializes the SDK;
//! dropping the `NativeSdk` terminates it again. A missing library or symbol
//! is reported as `EdsError::Library` instead of failing the build.
//!
//! All pointer handling for the SDK lives in this file. In particular the
//! memory-stream view is bounds-checked against the stream length before a
//! slice is ever formed.

use super::status::Status;
use super::traits::{EdsSdk, SdkResult};
use super::types::{
    Access, DataType, DirectoryItemInfo, FileCreateDisposition, PropertyDesc, PropertyId, RawRef,
    MAX_DESC_ELEMENTS, MAX_NAME,
};
use crate::core::error::{EdsError, Result};
use libloading::Library;
use log::{debug, info, warn};
use std::ffi::{c_char, c_void, CString};
use std::path::Path;
use std::ptr::null_mut;

type EdsErr = u32;
type EdsBaseRef = *mut c_void;

/// `EdsDirectoryItemInfo` as laid out by EDSDK 13 (64-bit size field)
#[repr(C)]
struct NativeDirectoryItemInfo {
    size: u64,
    is_folder: i32,
    group_id: u32,
    option: u32,
    file_name: [c_char; MAX_NAME],
    format: u32,
    date_time: u32,
}

/// `EdsPropertyDesc`
#[repr(C)]
struct NativePropertyDesc {
    form: i32,
    access: i32,
    num_elements: i32,
    prop_desc: [i32; MAX_DESC_ELEMENTS],
}

/// Resolved entry points
///
/// Copies of the function pointers; only valid while the owning `Library`
/// stays loaded.
struct Api {
    initialize: unsafe extern "system" fn() -> EdsErr,
    terminate: unsafe extern "system" fn() -> EdsErr,
    get_property_size:
        unsafe extern "system" fn(EdsBaseRef, u32, i32, *mut u32, *mut u32) -> EdsErr,
    get_property_data:
        unsafe extern "system" fn(EdsBaseRef, u32, i32, u32, *mut c_void) -> EdsErr,
    set_property_data:
        unsafe extern "system" fn(EdsBaseRef, u32, i32, u32, *const c_void) -> EdsErr,
    get_property_desc:
        unsafe extern "system" fn(EdsBaseRef, u32, *mut NativePropertyDesc) -> EdsErr,
    get_directory_item_info:
        unsafe extern "system" fn(EdsBaseRef, *mut NativeDirectoryItemInfo) -> EdsErr,
    create_file_stream:
        unsafe extern "system" fn(*const c_char, u32, u32, *mut EdsBaseRef) -> EdsErr,
    create_memory_stream: unsafe extern "system" fn(u64, *mut EdsBaseRef) -> EdsErr,
    download: unsafe extern "system" fn(EdsBaseRef, u64, EdsBaseRef) -> EdsErr,
    download_complete: unsafe extern "system" fn(EdsBaseRef) -> EdsErr,
    delete_directory_item: unsafe extern "system" fn(EdsBaseRef) -> EdsErr,
    create_evf_image_ref: unsafe extern "system" fn(EdsBaseRef, *mut EdsBaseRef) -> EdsErr,
    download_evf_image: unsafe extern "system" fn(EdsBaseRef, EdsBaseRef) -> EdsErr,
    get_length: unsafe extern "system" fn(EdsBaseRef, *mut u64) -> EdsErr,
    get_pointer: unsafe extern "system" fn(EdsBaseRef, *mut *mut c_void) -> EdsErr,
    release: unsafe extern "system" fn(EdsBaseRef) -> u32,
}

/// Resolve one symbol and copy the function pointer out of it
///
/// # Safety
/// `T` must match the native signature of `name`.
unsafe fn resolve<T: Copy>(library: &Library, name: &str) -> Result<T> {
    let mut symbol_name = name.as_bytes().to_vec();
    symbol_name.push(0);

    library
        .get::<T>(&symbol_name)
        .map(|symbol| *symbol)
        .map_err(|e| EdsError::Library(format!("missing symbol {}: {}", name, e)))
}

impl Api {
    /// # Safety
    /// `library` must be the EDSDK library.
    unsafe fn resolve_all(library: &Library) -> Result<Self> {
        Ok(Self {
            initialize: resolve(library, "EdsInitializeSDK")?,
            terminate: resolve(library, "EdsTerminateSDK")?,
            get_property_size: resolve(library, "EdsGetPropertySize")?,
            get_property_data: resolve(library, "EdsGetPropertyData")?,
            set_property_data: resolve(library, "EdsSetPropertyData")?,
            get_property_desc: resolve(library, "EdsGetPropertyDesc")?,
            get_directory_item_info: resolve(library, "EdsGetDirectoryItemInfo")?,
            create_file_stream: resolve(library, "EdsCreateFileStream")?,
            create_memory_stream: resolve(library, "EdsCreateMemoryStream")?,
            download: resolve(library, "EdsDownload")?,
            download_complete: resolve(library, "EdsDownloadComplete")?,
            delete_directory_item: resolve(library, "EdsDeleteDirectoryItem")?,
            create_evf_image_ref: resolve(library, "EdsCreateEvfImageRef")?,
            download_evf_image: resolve(library, "EdsDownloadEvfImage")?,
            get_length: resolve(library, "EdsGetLength")?,
            get_pointer: resolve(library, "EdsGetPointer")?,
            release: resolve(library, "EdsRelease")?,
        })
    }
}

fn as_ptr(raw: RawRef) -> EdsBaseRef {
    raw.0 as EdsBaseRef
}

fn from_ptr(ptr: EdsBaseRef) -> RawRef {
    RawRef(ptr as usize)
}

/// Platform file name of the SDK library (`EDSDK.dll`, `libEDSDK.so`, ...)
pub fn default_library_name() -> std::ffi::OsString {
    libloading::library_filename("EDSDK")
}

/// The vendor SDK, loaded and initialized
pub struct NativeSdk {
    api: Api,
    // Must outlive every call through `api`.
    _library: Library,
}

impl NativeSdk {
    /// Load the SDK from `path` and initialize it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading EDSDK from {}", path.display());

        let library = unsafe {
            Library::new(path).map_err(|e| {
                EdsError::Library(format!("failed to load {}: {}", path.display(), e))
            })?
        };

        let api = unsafe { Api::resolve_all(&library)? };

        let status = Status(unsafe { (api.initialize)() });
        if !status.is_ok() {
            return Err(EdsError::device("EdsInitializeSDK", status));
        }

        info!("EDSDK initialized from {}", path.display());
        Ok(Self {
            api,
            _library: library,
        })
    }

    /// Load the SDK from the platform's default library name
    pub fn load_default() -> Result<Self> {
        Self::load(default_library_name())
    }
}

impl Drop for NativeSdk {
    fn drop(&mut self) {
        let status = Status(unsafe { (self.api.terminate)() });
        if !status.is_ok() {
            warn!("EdsTerminateSDK failed: {}", status);
        }
    }
}

impl EdsSdk for NativeSdk {
    fn get_property_size(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
    ) -> SdkResult<(DataType, usize)> {
        let mut data_type: u32 = 0;
        let mut size: u32 = 0;
        let status = Status(unsafe {
            (self.api.get_property_size)(
                as_ptr(object),
                property.0,
                param,
                &mut data_type,
                &mut size,
            )
        });
        status.ok()?;
        Ok((DataType::from_raw(data_type), size as usize))
    }

    fn get_property_data(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
        out: &mut [u8],
    ) -> Status {
        let Ok(size) = u32::try_from(out.len()) else {
            return Status::INVALID_LENGTH;
        };
        Status(unsafe {
            (self.api.get_property_data)(
                as_ptr(object),
                property.0,
                param,
                size,
                out.as_mut_ptr() as *mut c_void,
            )
        })
    }

    fn set_property_data(
        &self,
        object: RawRef,
        property: PropertyId,
        param: i32,
        data: &[u8],
    ) -> Status {
        let Ok(size) = u32::try_from(data.len()) else {
            return Status::INVALID_LENGTH;
        };
        Status(unsafe {
            (self.api.set_property_data)(
                as_ptr(object),
                property.0,
                param,
                size,
                data.as_ptr() as *const c_void,
            )
        })
    }

    fn get_property_desc(&self, object: RawRef, property: PropertyId) -> SdkResult<PropertyDesc> {
        let mut native = NativePropertyDesc {
            form: 0,
            access: 0,
            num_elements: 0,
            prop_desc: [0; MAX_DESC_ELEMENTS],
        };
        let status = Status(unsafe {
            (self.api.get_property_desc)(as_ptr(object), property.0, &mut native)
        });
        status.ok()?;

        Ok(PropertyDesc {
            form: native.form,
            access: native.access,
            num_elements: native.num_elements,
            prop_desc: native.prop_desc,
        })
    }

    fn get_directory_item_info(&self, item: RawRef) -> SdkResult<DirectoryItemInfo> {
        let mut native = NativeDirectoryItemInfo {
            size: 0,
            is_folder: 0,
            group_id: 0,
            option: 0,
            file_name: [0; MAX_NAME],
            format: 0,
            date_time: 0,
        };
        let status =
            Status(unsafe { (self.api.get_directory_item_info)(as_ptr(item), &mut native) });
        status.ok()?;

        let mut file_name = [0u8; MAX_NAME];
        for (dst, src) in file_name.iter_mut().zip(native.file_name.iter()) {
            *dst = *src as u8;
        }

        Ok(DirectoryItemInfo {
            size: native.size,
            is_folder: native.is_folder != 0,
            group_id: native.group_id,
            option: native.option,
            file_name,
            format: native.format,
            date_time: native.date_time,
        })
    }

    fn create_file_stream(
        &self,
        path: &Path,
        disposition: FileCreateDisposition,
        access: Access,
    ) -> SdkResult<RawRef> {
        let c_path = CString::new(path.to_string_lossy().as_bytes())
            .map_err(|_| Status::INVALID_PARAMETER)?;
        let mut stream: EdsBaseRef = null_mut();
        let status = Status(unsafe {
            (self.api.create_file_stream)(
                c_path.as_ptr(),
                disposition as u32,
                access as u32,
                &mut stream,
            )
        });
        status.ok()?;
        Ok(from_ptr(stream))
    }

    fn create_memory_stream(&self, initial_size: u64) -> SdkResult<RawRef> {
        let mut stream: EdsBaseRef = null_mut();
        let status = Status(unsafe { (self.api.create_memory_stream)(initial_size, &mut stream) });
        status.ok()?;
        Ok(from_ptr(stream))
    }

    fn download(&self, item: RawRef, size: u64, stream: RawRef) -> Status {
        Status(unsafe { (self.api.download)(as_ptr(item), size, as_ptr(stream)) })
    }

    fn download_complete(&self, item: RawRef) -> Status {
        Status(unsafe { (self.api.download_complete)(as_ptr(item)) })
    }

    fn delete_directory_item(&self, item: RawRef) -> Status {
        Status(unsafe { (self.api.delete_directory_item)(as_ptr(item)) })
    }

    fn create_evf_image_ref(&self, stream: RawRef) -> SdkResult<RawRef> {
        let mut image: EdsBaseRef = null_mut();
        let status =
            Status(unsafe { (self.api.create_evf_image_ref)(as_ptr(stream), &mut image) });
        status.ok()?;
        Ok(from_ptr(image))
    }

    fn download_evf_image(&self, camera: RawRef, image: RawRef) -> Status {
        Status(unsafe { (self.api.download_evf_image)(as_ptr(camera), as_ptr(image)) })
    }

    fn get_length(&self, stream: RawRef) -> SdkResult<u64> {
        let mut length: u64 = 0;
        let status = Status(unsafe { (self.api.get_length)(as_ptr(stream), &mut length) });
        status.ok()?;
        Ok(length)
    }

    fn with_stream_memory(
        &self,
        stream: RawRef,
        len: usize,
        read: &mut dyn FnMut(&[u8]),
    ) -> Status {
        let available = match self.get_length(stream) {
            Ok(length) => length,
            Err(status) => return status,
        };
        if len as u64 > available {
            return Status::INVALID_LENGTH;
        }
        if len == 0 {
            read(&[]);
            return Status::OK;
        }

        let mut pointer: *mut c_void = null_mut();
        let status = Status(unsafe { (self.api.get_pointer)(as_ptr(stream), &mut pointer) });
        if !status.is_ok() {
            return status;
        }
        if pointer.is_null() {
            return Status::INVALID_POINTER;
        }

        // SAFETY: the SDK owns `len` readable bytes at `pointer` for as long as
        // the stream is alive, and the stream outlives this call.
        let bytes = unsafe { std::slice::from_raw_parts(pointer as *const u8, len) };
        read(bytes);
        Status::OK
    }

    fn release(&self, object: RawRef) -> u32 {
        unsafe { (self.api.release)(as_ptr(object)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_library_is_an_error() {
        let result = NativeSdk::load("/nonexistent/path/libEDSDK-missing.so");
        assert!(matches!(result, Err(EdsError::Library(_))));
    }

    #[test]
    fn test_default_library_name_mentions_edsdk() {
        let name = default_library_name();
        assert!(name.to_string_lossy().contains("EDSDK"));
    }

    #[test]
    fn test_native_struct_layouts() {
        assert_eq!(
            std::mem::size_of::<NativePropertyDesc>(),
            4 * (3 + MAX_DESC_ELEMENTS)
        );
        assert_eq!(
            std::mem::size_of::<NativeDirectoryItemInfo>(),
            8 + 4 * 3 + MAX_NAME + 4 * 2 + 4
        );
    }
}
