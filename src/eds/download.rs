//! Downloading files from the camera's card
//!
//! A download is one blocking transfer of the whole item into a file stream,
//! followed by the completion handshake that unlocks the item on the camera.
//! Deleting the source is only attempted after both succeeded.
//!
//! A failed transfer may leave a partial file at the destination; it is not
//! removed.

use crate::core::config::DownloadConfig;
use crate::core::error::{check, EdsError, Result};
use crate::eds::handle::ObjectGuard;
use crate::sdk::{Access, DirectoryItemInfo, EdsSdk, FileCreateDisposition, RawRef};
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Options applied to every download
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Directory used when no destination is given (None = system temp dir)
    pub default_directory: Option<PathBuf>,
    /// Delete the source from the card after a confirmed transfer
    pub delete_after_download: bool,
}

impl From<&DownloadConfig> for DownloadOptions {
    fn from(config: &DownloadConfig) -> Self {
        Self {
            default_directory: config.default_directory.clone(),
            delete_after_download: config.delete_after_download,
        }
    }
}

/// Metadata of a file on the card
pub fn directory_item_info(sdk: &dyn EdsSdk, item: RawRef) -> Result<DirectoryItemInfo> {
    sdk.get_directory_item_info(item)
        .map_err(|status| EdsError::device("EdsGetDirectoryItemInfo", status))
}

/// Where a download lands
///
/// No destination means `default_dir`; an existing directory gets the file's
/// own name appended; anything else is used as the file path. Only the last
/// component of the camera's name is used, so it can never leave the
/// directory.
pub fn resolve_destination(
    destination: Option<&Path>,
    default_dir: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    match destination {
        None => Ok(default_dir.join(safe_file_name(file_name)?)),
        Some(path) if path.is_dir() => Ok(path.join(safe_file_name(file_name)?)),
        Some(path) => Ok(path.to_path_buf()),
    }
}

fn safe_file_name(file_name: &str) -> Result<&OsStr> {
    Path::new(file_name)
        .file_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| EdsError::InvalidFileName(file_name.to_string()))
}

/// Download `item`, returning the path it was written to
///
/// Without a destination the file goes to the system temp directory under
/// the name the camera reports.
pub fn download(
    sdk: &dyn EdsSdk,
    item: RawRef,
    destination: Option<&Path>,
    delete_after_download: bool,
) -> Result<PathBuf> {
    let options = DownloadOptions {
        default_directory: None,
        delete_after_download,
    };
    download_with(sdk, item, destination, &options)
}

/// Download `item` using `options` for the defaults
pub fn download_with(
    sdk: &dyn EdsSdk,
    item: RawRef,
    destination: Option<&Path>,
    options: &DownloadOptions,
) -> Result<PathBuf> {
    let started = Instant::now();
    let info = directory_item_info(sdk, item)?;
    let file_name = info.file_name();

    let default_dir = options
        .default_directory
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let target = resolve_destination(destination, &default_dir, &file_name)?;

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EdsError::filesystem(parent, e))?;
    }

    info!("Downloading {} to {}", file_name, target.display());

    let stream = sdk
        .create_file_stream(
            &target,
            FileCreateDisposition::CreateAlways,
            Access::ReadWrite,
        )
        .map_err(|status| EdsError::device("EdsCreateFileStream", status))?;
    let stream = ObjectGuard::new(sdk, stream);

    check("EdsDownload", sdk.download(item, info.size, stream.raw()))?;
    check("EdsDownloadComplete", sdk.download_complete(item))?;
    stream.release();

    info!(
        "Downloaded {} ({} bytes) in {:.2?}",
        file_name,
        info.size,
        started.elapsed()
    );

    if options.delete_after_download {
        match check("EdsDeleteDirectoryItem", sdk.delete_directory_item(item)) {
            Ok(()) => debug!("Deleted {} from the camera", file_name),
            Err(e) => warn!("Downloaded {} but could not delete it: {}", file_name, e),
        }
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::Status;
    use crate::testdb::{MockCamera, MockDataGenerator, MockOp};
    use tempfile::TempDir;

    fn camera_with_file(name: &str, size: usize) -> (MockCamera, RawRef, Vec<u8>) {
        let mock = MockCamera::new();
        let content = MockDataGenerator::generate_for_name(name, size, 1);
        let item = mock.add_item(name, content.clone());
        (mock, item, content)
    }

    #[test]
    fn test_download_to_directory_uses_camera_name() {
        let dir = TempDir::new().unwrap();
        let (mock, item, content) = camera_with_file("IMG_0001.JPG", 2048);

        let path = download(&mock, item, Some(dir.path()), false).unwrap();
        assert_eq!(path, dir.path().join("IMG_0001.JPG"));
        assert_eq!(fs::read(&path).unwrap(), content);
        assert!(mock.is_download_completed(item));
        assert!(!mock.is_item_deleted(item));
        assert_eq!(mock.live_handles(), 0);
        assert_eq!(mock.released_count(), 1);
    }

    #[test]
    fn test_download_without_destination_goes_to_temp_dir() {
        let name = format!("EDS_TMP_{}.JPG", std::process::id());
        let (mock, item, _) = camera_with_file(&name, 256);

        let path = download(&mock, item, None, false).unwrap();
        assert_eq!(path, std::env::temp_dir().join(&name));
        assert!(path.exists());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_name_is_cut_at_first_nul() {
        let dir = TempDir::new().unwrap();
        let mock = MockCamera::new();
        let mut info = DirectoryItemInfo::new("IMG_0042.JPG", 16);
        info.file_name[13..20].copy_from_slice(b"garbage");
        let item = mock.add_item_with_info(info, vec![1; 16]);

        let path = download(&mock, item, Some(dir.path()), false).unwrap();
        assert_eq!(path.file_name().unwrap(), "IMG_0042.JPG");
    }

    #[test]
    fn test_literal_destination_and_missing_parents() {
        let dir = TempDir::new().unwrap();
        let (mock, item, content) = camera_with_file("IMG_0002.CR2", 512);
        let target = dir.path().join("a").join("b").join("renamed.cr2");

        let path = download(&mock, item, Some(&target), false).unwrap();
        assert_eq!(path, target);
        assert_eq!(fs::read(&target).unwrap(), content);
    }

    #[test]
    fn test_default_directory_from_options() {
        let dir = TempDir::new().unwrap();
        let (mock, item, _) = camera_with_file("IMG_0003.JPG", 128);
        let options = DownloadOptions::from(&DownloadConfig {
            default_directory: Some(dir.path().join("card")),
            delete_after_download: false,
        });

        let path = download_with(&mock, item, None, &options).unwrap();
        assert_eq!(path, dir.path().join("card").join("IMG_0003.JPG"));
    }

    #[test]
    fn test_delete_after_successful_download() {
        let dir = TempDir::new().unwrap();
        let (mock, item, _) = camera_with_file("IMG_0004.JPG", 128);

        download(&mock, item, Some(dir.path()), true).unwrap();
        assert!(mock.is_item_deleted(item));

        let calls = mock.calls();
        let complete = calls
            .iter()
            .position(|c| *c == MockOp::DownloadComplete)
            .unwrap();
        let delete = calls
            .iter()
            .position(|c| *c == MockOp::DeleteDirectoryItem)
            .unwrap();
        assert!(complete < delete);
    }

    #[test]
    fn test_failed_transfer_keeps_source() {
        let dir = TempDir::new().unwrap();
        let (mock, item, _) = camera_with_file("IMG_0005.JPG", 128);
        mock.fail_next(MockOp::Download, Status::COMM_DISCONNECTED);

        let err = download(&mock, item, Some(dir.path()), true).unwrap_err();
        assert_eq!(err.status(), Some(Status::COMM_DISCONNECTED));
        assert!(!mock.is_item_deleted(item));
        assert_eq!(mock.call_count(MockOp::DownloadComplete), 0);
        assert_eq!(mock.call_count(MockOp::DeleteDirectoryItem), 0);
        assert_eq!(mock.live_handles(), 0);
    }

    #[test]
    fn test_failed_handshake_keeps_source() {
        let dir = TempDir::new().unwrap();
        let (mock, item, _) = camera_with_file("IMG_0006.JPG", 128);
        mock.fail_next(MockOp::DownloadComplete, Status::INTERNAL_ERROR);

        assert!(download(&mock, item, Some(dir.path()), true).is_err());
        assert!(!mock.is_item_deleted(item));
        assert_eq!(mock.call_count(MockOp::DeleteDirectoryItem), 0);
        assert_eq!(mock.created_count(), mock.released_count());
    }

    #[test]
    fn test_info_failure_acquires_nothing() {
        let (mock, item, _) = camera_with_file("IMG_0007.JPG", 128);
        mock.fail_next(MockOp::GetDirectoryItemInfo, Status::INVALID_HANDLE);

        assert!(download(&mock, item, None, false).is_err());
        assert_eq!(mock.created_count(), 0);
        assert_eq!(mock.call_count(MockOp::CreateFileStream), 0);
    }

    #[test]
    fn test_stream_creation_failure() {
        let dir = TempDir::new().unwrap();
        let (mock, item, _) = camera_with_file("IMG_0008.JPG", 128);
        mock.fail_next(MockOp::CreateFileStream, Status::FILE_OPEN_ERROR);

        let err = download(&mock, item, Some(dir.path()), false).unwrap_err();
        assert_eq!(err.status(), Some(Status::FILE_OPEN_ERROR));
        assert_eq!(mock.call_count(MockOp::Download), 0);
        assert_eq!(mock.live_handles(), 0);
        assert_eq!(mock.invalid_releases(), 0);
    }

    #[test]
    fn test_directory_item_info() {
        let (mock, item, content) = camera_with_file("IMG_0009.JPG", 300);
        let info = directory_item_info(&mock, item).unwrap();
        assert_eq!(info.file_name(), "IMG_0009.JPG");
        assert_eq!(info.size, content.len() as u64);
    }

    #[test]
    fn test_resolve_destination() {
        let dir = TempDir::new().unwrap();
        let default = Path::new("/default");

        assert_eq!(
            resolve_destination(None, default, "A.JPG").unwrap(),
            PathBuf::from("/default/A.JPG")
        );
        assert_eq!(
            resolve_destination(Some(dir.path()), default, "A.JPG").unwrap(),
            dir.path().join("A.JPG")
        );
        assert_eq!(
            resolve_destination(Some(&dir.path().join("x.jpg")), default, "A.JPG").unwrap(),
            dir.path().join("x.jpg")
        );
    }

    #[test]
    fn test_resolve_destination_keeps_last_component() {
        let dir = TempDir::new().unwrap();
        let default = Path::new("/default");

        assert_eq!(
            resolve_destination(Some(dir.path()), default, "../escaped.JPG").unwrap(),
            dir.path().join("escaped.JPG")
        );
        assert_eq!(
            resolve_destination(None, default, "/etc/IMG_0001.JPG").unwrap(),
            PathBuf::from("/default/IMG_0001.JPG")
        );
        assert!(matches!(
            resolve_destination(Some(dir.path()), default, ".."),
            Err(EdsError::InvalidFileName(_))
        ));
        assert!(matches!(
            resolve_destination(None, default, ""),
            Err(EdsError::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_traversing_name_stays_in_destination() {
        let root = TempDir::new().unwrap();
        let inner = root.path().join("inner");
        fs::create_dir(&inner).unwrap();
        let (mock, item, content) = camera_with_file("../escaped.JPG", 64);

        let path = download(&mock, item, Some(&inner), false).unwrap();
        assert_eq!(path, inner.join("escaped.JPG"));
        assert_eq!(fs::read(&path).unwrap(), content);
        assert!(!root.path().join("escaped.JPG").exists());
    }

    #[test]
    fn test_unusable_name_acquires_nothing() {
        let dir = TempDir::new().unwrap();
        let (mock, item, _) = camera_with_file("..", 64);

        let err = download(&mock, item, Some(dir.path()), false).unwrap_err();
        assert!(matches!(err, EdsError::InvalidFileName(_)));
        assert_eq!(mock.created_count(), 0);
    }

    #[test]
    fn test_failed_delete_still_returns_path() {
        let dir = TempDir::new().unwrap();
        let (mock, item, content) = camera_with_file("IMG_0100.JPG", 128);
        mock.fail_next(MockOp::DeleteDirectoryItem, Status::DEVICE_BUSY);

        let path = download(&mock, item, Some(dir.path()), true).unwrap();
        assert_eq!(path, dir.path().join("IMG_0100.JPG"));
        assert_eq!(fs::read(&path).unwrap(), content);
        assert!(mock.is_download_completed(item));
        assert!(!mock.is_item_deleted(item));
        assert_eq!(mock.live_handles(), 0);
    }
}
