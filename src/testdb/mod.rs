//! Test Database Module
//!
//! A simulated camera so every helper can be exercised without a body
//! attached or the vendor library installed.
//!
//! # Features
//!
//! - **Mock Camera**: an in-memory `EdsSdk` with properties, descriptors,
//!   files on the card and live view
//! - **Handle Accounting**: counts of created, released and double-released
//!   objects
//! - **Failure Injection**: make the next call of any entry point fail with a
//!   chosen status
//! - **Data Generators**: real JPEG frames and believable card files
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use eds_bridge::eds::live_view::LiveView;
//! use eds_bridge::testdb::MockCamera;
//!
//! let mock = MockCamera::with_sample_content().unwrap();
//! let mut live_view = LiveView::new(&mock, mock.camera());
//! live_view.enable().unwrap();
//! let frame = live_view.get_frame().unwrap();
//! println!("{}x{}", frame.width(), frame.height());
//! assert_eq!(mock.live_handles(), 0);
//! ```

pub mod generator;
pub mod mock_camera;

pub use generator::MockDataGenerator;
pub use mock_camera::{MockCamera, MockCameraConfig, MockOp, MockProperty};
