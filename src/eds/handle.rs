//! Native object lifetime
//!
//! Every stream, image and item reference an operation creates must be
//! released exactly once before the operation returns. [`ObjectGuard`] ties
//! that to scope; [`release_all`] covers the cases where the caller holds a
//! set of raw references.

use crate::sdk::{EdsSdk, RawRef};
use log::trace;

/// Release every non-null reference in `handles` and null it out
///
/// Null entries are skipped, so calling this twice on the same slice releases
/// nothing the second time. Returns the number of references released.
pub fn release_all(sdk: &dyn EdsSdk, handles: &mut [RawRef]) -> usize {
    let mut released = 0;
    for handle in handles.iter_mut().filter(|h| !h.is_null()) {
        let remaining = sdk.release(*handle);
        trace!("Released {} (refcount {})", handle, remaining);
        *handle = RawRef::NULL;
        released += 1;
    }
    released
}

/// Owns one native reference and releases it when dropped
pub struct ObjectGuard<'a> {
    sdk: &'a dyn EdsSdk,
    raw: RawRef,
}

impl<'a> ObjectGuard<'a> {
    /// Take ownership of a freshly created reference
    pub fn new(sdk: &'a dyn EdsSdk, raw: RawRef) -> Self {
        trace!("Acquired {}", raw);
        Self { sdk, raw }
    }

    /// The reference, for passing to SDK calls; ownership stays with the guard
    pub fn raw(&self) -> RawRef {
        self.raw
    }

    /// Release now instead of at end of scope
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        release_all(self.sdk, std::slice::from_mut(&mut self.raw));
    }
}

impl Drop for ObjectGuard<'_> {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for ObjectGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObjectGuard").field(&self.raw).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdb::MockCamera;

    #[test]
    fn test_release_all_skips_nulls() {
        let mock = MockCamera::new();
        let a = mock.create_memory_stream(0).unwrap();
        let b = mock.create_memory_stream(0).unwrap();

        let mut handles = [a, RawRef::NULL, b];
        assert_eq!(release_all(&mock, &mut handles), 2);
        assert!(handles.iter().all(|h| h.is_null()));
        assert_eq!(mock.released_count(), 2);
        assert_eq!(mock.invalid_releases(), 0);
    }

    #[test]
    fn test_release_all_twice_releases_once() {
        let mock = MockCamera::new();
        let mut handles = [mock.create_memory_stream(0).unwrap()];

        assert_eq!(release_all(&mock, &mut handles), 1);
        assert_eq!(release_all(&mock, &mut handles), 0);
        assert_eq!(mock.double_releases(), 0);
    }

    #[test]
    fn test_release_all_empty() {
        let mock = MockCamera::new();
        assert_eq!(release_all(&mock, &mut []), 0);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let mock = MockCamera::new();
        {
            let guard = ObjectGuard::new(&mock, mock.create_memory_stream(0).unwrap());
            assert!(!guard.raw().is_null());
            assert_eq!(mock.live_handles(), 1);
        }
        assert_eq!(mock.live_handles(), 0);
        assert_eq!(mock.released_count(), 1);
    }

    #[test]
    fn test_explicit_release_is_not_repeated_on_drop() {
        let mock = MockCamera::new();
        let guard = ObjectGuard::new(&mock, mock.create_memory_stream(0).unwrap());
        guard.release();

        assert_eq!(mock.released_count(), 1);
        assert_eq!(mock.double_releases(), 0);
    }

    #[test]
    fn test_guard_around_null_releases_nothing() {
        let mock = MockCamera::new();
        drop(ObjectGuard::new(&mock, RawRef::NULL));
        assert_eq!(mock.invalid_releases(), 0);
    }
}
