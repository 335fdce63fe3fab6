//! EDS Bridge Library
//!
//! Safe helpers over the Canon EDSDK camera SDK: typed property access,
//! legal-value descriptors resolved to names, downloads of files from the
//! card, and live view frames decoded into images.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`sdk`] - The `EdsSdk` trait, native types, status codes, name tables
//!   and the runtime-loaded vendor binding
//! - [`eds`] - Property, descriptor, download and live view helpers built on
//!   `EdsSdk`
//! - [`core`] - Configuration and error handling
//! - [`cli`] - Command-line interface (only used by the binary)
//! - [`testdb`] - A simulated camera for testing without hardware
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use eds_bridge::eds::{self, LiveView};
//! use eds_bridge::sdk::{DeviceHandle, NativeSdk, RawRef};
//!
//! fn main() -> eds_bridge::core::error::Result<()> {
//!     let sdk = NativeSdk::load_default()?;
//!
//!     // Camera discovery and session handling are up to the caller
//!     let camera = DeviceHandle::from_raw(RawRef(0x1234));
//!
//!     for (name, code) in eds::list_image_qualities(&sdk, camera)? {
//!         println!("{:<8} {:#x}", name, code as u32);
//!     }
//!
//!     let mut live_view = LiveView::new(&sdk, camera);
//!     live_view.enable()?;
//!     if let Some(frame) = live_view.poll_frame()? {
//!         println!("{}x{}", frame.width(), frame.height());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Testing Without a Camera
//!
//! ```rust,no_run
//! use eds_bridge::eds;
//! use eds_bridge::testdb::MockCamera;
//!
//! let mock = MockCamera::with_sample_content().unwrap();
//! for (item, info) in mock.items() {
//!     let path = eds::download(&mock, item, None, false).unwrap();
//!     println!("{} -> {}", info.file_name(), path.display());
//! }
//! ```
//!
//! # Concurrency
//!
//! The SDK is not reentrant. Nothing in this crate serializes access for you:
//! issue calls against one camera from one thread at a time.

pub mod cli;
pub mod core;
pub mod eds;
pub mod sdk;
pub mod testdb;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
