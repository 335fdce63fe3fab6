//! Native status codes
//!
//! Every SDK entry point returns an `EdsError` integer; zero means success.

use super::tables::STATUS_NAMES;
use std::fmt;

/// Raw status returned by an SDK call
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub u32);

impl Status {
    pub const OK: Status = Status(0x0000_0000);
    pub const INTERNAL_ERROR: Status = Status(0x0000_0002);
    pub const NOT_SUPPORTED: Status = Status(0x0000_0007);
    pub const FILE_OPEN_ERROR: Status = Status(0x0000_0023);
    pub const FILE_WRITE_ERROR: Status = Status(0x0000_0028);
    pub const DIR_ENTRY_NOT_FOUND: Status = Status(0x0000_0042);
    pub const PROPERTIES_UNAVAILABLE: Status = Status(0x0000_0050);
    pub const INVALID_PARAMETER: Status = Status(0x0000_0060);
    pub const INVALID_HANDLE: Status = Status(0x0000_0061);
    pub const INVALID_POINTER: Status = Status(0x0000_0062);
    pub const INVALID_LENGTH: Status = Status(0x0000_0064);
    pub const DEVICE_BUSY: Status = Status(0x0000_0081);
    pub const DEVICE_NOT_RELEASED: Status = Status(0x0000_008D);
    pub const STREAM_WRITE_ERROR: Status = Status(0x0000_00A8);
    pub const COMM_DISCONNECTED: Status = Status(0x0000_00C1);
    pub const INCOMPLETE_TRANSFER: Status = Status(0x0000_2007);
    pub const OBJECT_NOTREADY: Status = Status(0x0000_A102);

    /// Check whether the call succeeded
    pub fn is_ok(self) -> bool {
        self == Status::OK
    }

    /// Check whether the failure means "not possible yet, try again"
    ///
    /// The live view frame not being ready and the camera being busy with
    /// another request both clear up on their own.
    pub fn is_transient(self) -> bool {
        matches!(self, Status::OBJECT_NOTREADY | Status::DEVICE_BUSY)
    }

    /// Symbolic name from the status table
    pub fn name(self) -> Option<&'static str> {
        STATUS_NAMES.name_of(self.0 as i64)
    }

    /// Convert into a `Result`, keeping the status as the error
    pub fn ok(self) -> Result<(), Status> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<u32> for Status {
    fn from(raw: u32) -> Self {
        Status(raw)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:#010x})",
            self.name().unwrap_or("unknown error code"),
            self.0
        )
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status({})", self)
    }
}
