//! Helpers on top of the native SDK
//!
//! Each helper takes the SDK as `&dyn EdsSdk` and the camera or object it
//! works on explicitly; nothing here keeps global state or caches native
//! references between calls.
//!
//! # Submodules
//!
//! - `handle` - Releasing native references exactly once
//! - `property` - Reading and writing property buffers
//! - `descriptor` - Legal value sets of properties, resolved to names
//! - `download` - Transferring files from the card to disk
//! - `live_view` - Live view on/off and frame acquisition
//!
//! # Concurrency
//!
//! The SDK is not reentrant. Callers must make sure no two helpers run
//! against the same camera at the same time.

pub mod descriptor;
pub mod download;
pub mod handle;
pub mod live_view;
pub mod property;

pub use descriptor::{describe_property, list_image_qualities, quality_description, resolve_code};
pub use download::{directory_item_info, download, download_with, DownloadOptions};
pub use handle::{release_all, ObjectGuard};
pub use live_view::LiveView;
pub use property::{
    get_property, get_property_data, get_property_string, property_size, set_property,
    set_property_u32,
};
