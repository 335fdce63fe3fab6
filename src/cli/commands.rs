//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::cli::progress::{
    format_bytes, print_error, print_header, print_info, print_success, print_warning, spinner,
    DownloadProgress, LiveViewProgress,
};
use crate::cli::{Args, Commands};
use crate::core::config::{
    get_config_path, init_config, open_config_in_editor, Config, FrameFormat,
};
use crate::eds::{
    self, describe_property, get_property, quality_description, resolve_code, DownloadOptions,
    LiveView,
};
use crate::sdk::{
    CodeTable, DeviceHandle, EdsSdk, NativeSdk, PropertyId, IMAGE_QUALITIES, PROPERTY_NAMES,
    STATUS_NAMES,
};
use crate::testdb::{MockCamera, MockCameraConfig, MockDataGenerator};
use anyhow::{anyhow, bail, Context, Result};
use image::{DynamicImage, ImageFormat};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Table for properties whose values have no names
static UNNAMED: CodeTable = CodeTable::new(&[]);

/// Frames the simulated camera holds back right after live view is switched on
const WARMUP_FRAMES: usize = 2;

/// One legal value of a property, as printed by `describe`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DescribedValue {
    pub name: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Outcome of a `download` run
#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub downloaded: Vec<PathBuf>,
    pub failed: Vec<String>,
    pub missing: Vec<String>,
    pub bytes: u64,
}

/// Run the appropriate command based on arguments
pub fn run_command(args: &Args, config: &Config, shutdown_flag: Arc<AtomicBool>) -> Result<()> {
    match &args.command {
        Commands::Describe { property, json } => describe(property, *json),
        Commands::Download {
            names,
            output,
            delete,
        } => download(config, names, output.clone(), *delete, shutdown_flag),
        Commands::LiveView {
            frames,
            output,
            interval,
            format,
            not_ready_rate,
        } => {
            let settings = LiveViewSettings::resolve(
                config,
                *frames,
                output.clone(),
                *interval,
                format.as_deref(),
            );
            live_view(&settings, *not_ready_rate, shutdown_flag)
        }
        Commands::CheckSdk { path } => check_sdk(config, path.clone()),
        Commands::StatusName { code } => status_name(code),
        Commands::PropertyName { property } => property_name(property),
        Commands::Quality { names } => quality(names),
        Commands::ShowConfig => {
            show_config(config);
            Ok(())
        }
        Commands::GenerateConfig { output } => generate_config_file(output.clone()),
        Commands::Config { path, reset } => handle_config_command(*path, *reset),
    }
}

/// Parse a code given as decimal or `0x`-prefixed hex
pub fn parse_code(text: &str) -> Result<i64> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(&hex.replace('_', ""), 16),
        None => text.parse::<i64>(),
    };
    parsed.map_err(|e| anyhow!("Invalid code '{}': {}", text, e))
}

/// Property id from a name (`ImageQuality`) or a numeric id (`0x100`)
pub fn resolve_property(text: &str) -> Result<PropertyId> {
    if let Some(code) = PROPERTY_NAMES.code_of(text) {
        return Ok(PropertyId(code as u32));
    }
    let code = parse_code(text).map_err(|_| anyhow!("Unknown property '{}'", text))?;
    u32::try_from(code)
        .map(PropertyId)
        .map_err(|_| anyhow!("Property id out of range: {}", code))
}

// ============================================================================
// describe
// ============================================================================

/// Name table for the values of `id`
fn names_for(id: PropertyId) -> &'static CodeTable {
    if id == PropertyId::IMAGE_QUALITY {
        &IMAGE_QUALITIES
    } else {
        &UNNAMED
    }
}

/// Legal values of `id` with names and, for image qualities, descriptions
pub fn described_values(
    sdk: &dyn EdsSdk,
    camera: DeviceHandle,
    id: PropertyId,
) -> Result<Vec<DescribedValue>> {
    let is_quality = id == PropertyId::IMAGE_QUALITY;
    let values = describe_property(sdk, camera.raw(), id, names_for(id))?
        .into_iter()
        .map(|(name, code)| DescribedValue {
            description: is_quality.then(|| quality_description(&name).to_string()),
            name,
            code,
        })
        .collect();
    Ok(values)
}

fn describe(property: &str, json: bool) -> Result<()> {
    let id = resolve_property(property)?;
    let camera = MockCamera::new();
    let values = described_values(&camera, camera.camera(), id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    print_header(&format!("{}", id));
    match get_property(&camera, camera.camera().raw(), id, 0) {
        Ok(current) => {
            let name = resolve_code(names_for(id), current as i32);
            print_info(&format!("Current value: {}", name));
        }
        Err(e) => warn!("Could not read current value of {}: {}", id, e),
    }
    println!();

    if values.is_empty() {
        print_warning("The camera reports no legal values");
        return Ok(());
    }

    for value in &values {
        match &value.description {
            Some(description) => println!(
                "  {:<10} {:#010x}  {}",
                value.name, value.code as u32, description
            ),
            None => println!("  {:<10} {:#010x}", value.name, value.code as u32),
        }
    }
    println!();
    print_info(&format!("{} values", values.len()));

    Ok(())
}

// ============================================================================
// download
// ============================================================================

/// Download the named files (all files if `names` is empty) into `output_dir`
///
/// A failed transfer is recorded and the run moves on to the next file.
/// Stops early once `shutdown_flag` is set.
pub fn download_items(
    camera: &MockCamera,
    names: &[String],
    output_dir: &Path,
    options: &DownloadOptions,
    shutdown_flag: &AtomicBool,
) -> Result<DownloadSummary> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let items = camera.items();
    let mut summary = DownloadSummary::default();

    let selected: Vec<_> = if names.is_empty() {
        items
    } else {
        for name in names {
            if !items.iter().any(|(_, info)| info.file_name() == *name) {
                summary.missing.push(name.clone());
            }
        }
        items
            .into_iter()
            .filter(|(_, info)| names.contains(&info.file_name()))
            .collect()
    };

    let mut progress = DownloadProgress::new(selected.len() as u64);
    for (item, info) in selected {
        if shutdown_flag.load(Ordering::SeqCst) {
            progress.log_warning("Shutdown requested, stopping downloads");
            break;
        }

        let name = info.file_name();
        match eds::download_with(camera, item, Some(output_dir), options) {
            Ok(path) => {
                progress.file_completed(&name, info.size);
                summary.bytes += info.size;
                summary.downloaded.push(path);
            }
            Err(e) => {
                progress.file_failed(&name, &e.to_string());
                summary.failed.push(name);
            }
        }
    }
    progress.finish();

    Ok(summary)
}

fn download(
    config: &Config,
    names: &[String],
    output: Option<PathBuf>,
    delete: bool,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    let mut options = DownloadOptions::from(&config.download);
    options.delete_after_download |= delete;
    let output_dir = output.unwrap_or_else(|| config.download.effective_directory());

    let camera = MockCamera::with_sample_content()?;
    info!("Downloading to {}", output_dir.display());

    let summary = download_items(&camera, names, &output_dir, &options, &shutdown_flag)?;

    println!();
    for name in &summary.missing {
        print_warning(&format!("Not on the card: {}", name));
    }
    for name in &summary.failed {
        print_error(&format!("Failed: {}", name));
    }
    print_success(&format!(
        "{} files downloaded ({})",
        summary.downloaded.len(),
        format_bytes(summary.bytes)
    ));

    if !summary.failed.is_empty() {
        bail!("{} downloads failed", summary.failed.len());
    }
    Ok(())
}

// ============================================================================
// live-view
// ============================================================================

/// Effective live view settings after applying CLI overrides to the config
#[derive(Debug, Clone)]
pub struct LiveViewSettings {
    pub max_frames: u32,
    pub output_directory: PathBuf,
    pub interval: Duration,
    pub format: FrameFormat,
}

impl LiveViewSettings {
    pub fn resolve(
        config: &Config,
        frames: Option<u32>,
        output: Option<PathBuf>,
        interval_ms: Option<u64>,
        format: Option<&str>,
    ) -> Self {
        let format = match format {
            Some("png") => FrameFormat::Png,
            Some(_) => FrameFormat::Jpeg,
            None => config.live_view.output_format,
        };

        Self {
            max_frames: frames.unwrap_or(config.live_view.max_frames),
            output_directory: output.unwrap_or_else(|| config.live_view.output_directory.clone()),
            interval: Duration::from_millis(
                interval_ms.unwrap_or(config.live_view.poll_interval_ms),
            ),
            format,
        }
    }
}

/// File name of the `index`-th saved frame
pub fn frame_file_name(index: u32, format: FrameFormat) -> String {
    format!("frame_{:06}.{}", index, format.extension())
}

/// Decode a live view frame
pub fn decode_frame(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .context("Frame is not a valid JPEG")
}

/// Write a decoded frame to `path`
///
/// JPEG frames are written as received; PNG frames are re-encoded.
pub fn write_frame(
    bytes: &[u8],
    frame: &DynamicImage,
    format: FrameFormat,
    path: &Path,
) -> Result<()> {
    match format {
        FrameFormat::Jpeg => fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display())),
        FrameFormat::Png => frame
            .save_with_format(path, format.image_format())
            .with_context(|| format!("Failed to write {}", path.display())),
    }
}

/// Decode and write a frame, returning its dimensions
pub fn save_frame(bytes: &[u8], format: FrameFormat, path: &Path) -> Result<(u32, u32)> {
    let frame = decode_frame(bytes)?;
    write_frame(bytes, &frame, format, path)?;
    Ok((frame.width(), frame.height()))
}

/// Stream frames from `sdk` to disk until the frame budget is used up or
/// shutdown is requested. Returns the number of frames saved.
pub fn stream_frames(
    sdk: &dyn EdsSdk,
    camera: DeviceHandle,
    settings: &LiveViewSettings,
    shutdown_flag: &AtomicBool,
) -> Result<u32> {
    fs::create_dir_all(&settings.output_directory)
        .with_context(|| format!("Failed to create {}", settings.output_directory.display()))?;

    let mut live_view = LiveView::new(sdk, camera);
    live_view.enable()?;

    let mut progress = LiveViewProgress::new();
    let mut saved = 0u32;

    while !shutdown_flag.load(Ordering::SeqCst)
        && (settings.max_frames == 0 || saved < settings.max_frames)
    {
        match live_view.get_frame_bytes() {
            Ok(bytes) => {
                let path = settings
                    .output_directory
                    .join(frame_file_name(saved, settings.format));
                let frame = match decode_frame(&bytes) {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!("Skipping frame: {:#}", e);
                        thread::sleep(settings.interval);
                        continue;
                    }
                };
                if let Err(e) = write_frame(&bytes, &frame, settings.format, &path) {
                    progress.finish_with_error(&e.to_string());
                    return Err(e);
                }
                saved += 1;
                progress.frame_saved(frame.width(), frame.height());
                debug!("Saved {}", path.display());
            }
            Err(e) if e.is_transient() => progress.frame_not_ready(),
            Err(e) => {
                progress.finish_with_error(&e.to_string());
                return Err(e.into());
            }
        }

        if settings.max_frames == 0 || saved < settings.max_frames {
            thread::sleep(settings.interval);
        }
    }

    live_view.disable();
    progress.finish();
    Ok(saved)
}

fn live_view(
    settings: &LiveViewSettings,
    not_ready_rate: u8,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    let camera = MockCamera::with_config(MockCameraConfig {
        frames_not_ready: WARMUP_FRAMES,
        random_not_ready_rate: not_ready_rate,
        ..MockCameraConfig::default()
    });
    camera.push_frames(MockDataGenerator::generate_frames(24)?);

    if settings.max_frames == 0 {
        info!("Streaming live view until Ctrl+C...");
    } else {
        info!("Streaming {} live view frames...", settings.max_frames);
    }

    let saved = stream_frames(&camera, camera.camera(), settings, &shutdown_flag)?;
    print_success(&format!(
        "{} frames saved to {}",
        saved,
        settings.output_directory.display()
    ));
    Ok(())
}

// ============================================================================
// check-sdk
// ============================================================================

fn check_sdk(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| config.sdk.effective_library_path());
    let spinner = spinner(&format!("Loading {}...", path.display()));

    match NativeSdk::load(&path) {
        Ok(sdk) => {
            spinner.finish_and_clear();
            drop(sdk);
            print_success(&format!("{} loaded, initialized and terminated", path.display()));
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            print_error(&format!("{}", e));
            Err(e.into())
        }
    }
}

// ============================================================================
// Lookups
// ============================================================================

/// Status code from decimal or hex text; values beyond 32 bits are rejected
pub fn parse_status_code(text: &str) -> Result<u32> {
    let code = parse_code(text)?;
    u32::try_from(code).map_err(|_| anyhow!("Status code out of range: {}", text.trim()))
}

fn status_name(code: &str) -> Result<()> {
    let code = parse_status_code(code)?;
    match STATUS_NAMES.name_of(code as i64) {
        Some(name) => println!("{:#010x}  {}", code, name),
        None => bail!("Unknown status code {:#010x}", code),
    }
    Ok(())
}

fn property_name(property: &str) -> Result<()> {
    if let Some(code) = PROPERTY_NAMES.code_of(property) {
        println!("{:#06x}  {}", code, property);
        return Ok(());
    }

    let code = parse_code(property).map_err(|_| anyhow!("Unknown property '{}'", property))?;
    match PROPERTY_NAMES.name_of(code) {
        Some(name) => println!("{:#06x}  {}", code, name),
        None => bail!("Unknown property id {:#06x}", code),
    }
    Ok(())
}

fn quality(names: &[String]) -> Result<()> {
    if names.is_empty() {
        for (code, name) in IMAGE_QUALITIES.entries() {
            if *name == "Unknown" {
                continue;
            }
            println!(
                "  {:<8} {:#010x}  {}",
                name,
                code,
                quality_description(name)
            );
        }
        return Ok(());
    }

    for name in names {
        match IMAGE_QUALITIES.code_of(name) {
            Some(code) => println!(
                "  {:<8} {:#010x}  {}",
                name,
                code,
                quality_description(name)
            ),
            None => println!("  {:<8} {:>10}  {}", name, "-", quality_description(name)),
        }
    }
    Ok(())
}

// ============================================================================
// Configuration
// ============================================================================

/// Handle the `config` command - open, show path, or reset the config file
pub fn handle_config_command(show_path: bool, reset: bool) -> Result<()> {
    if reset {
        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                fs::remove_file(&config_path)?;
                info!("Removed existing config file");
            }
        }
        let path = init_config()?;
        info!("Created fresh config file at: {}", path.display());
        return Ok(());
    }

    if show_path {
        let path = Config::get_active_config_path();
        println!("{}", path.display());
        if path.exists() {
            info!("Config file exists at: {}", path.display());
        } else {
            info!("Config file would be created at: {}", path.display());
        }
        return Ok(());
    }

    info!("Opening configuration file in default editor...");
    match open_config_in_editor() {
        Ok(path) => {
            info!("Config file: {}", path.display());
            info!("Save the file after editing to apply changes.");
            info!("Run 'eds-bridge show-config' to verify your settings.");
        }
        Err(e) => {
            error!("Failed to open config file: {}", e);
            if let Some(path) = get_config_path() {
                info!("You can manually edit the config at: {}", path.display());
            }
        }
    }

    Ok(())
}

/// Generate a configuration file at the specified or default location
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let output_path = match output {
        Some(path) => {
            fs::write(&path, Config::generate_default_config())?;
            path
        }
        None => init_config()?,
    };

    info!("Configuration file: {}", output_path.display());
    info!("Edit this file to point at the EDSDK library and set download defaults.");

    Ok(())
}

/// Show the current configuration settings
pub fn show_config(config: &Config) {
    let config_path = Config::get_active_config_path();
    info!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        info!("(Using default settings - no config file found)");
    }
    info!("");
    info!("Current Configuration:");
    info!("----------------------");
    info!("[sdk]");
    info!(
        "  library_path = \"{}\"",
        config.sdk.effective_library_path().display()
    );
    info!("");
    info!("[download]");
    info!(
        "  default_directory = \"{}\"",
        config.download.effective_directory().display()
    );
    info!(
        "  delete_after_download = {}",
        config.download.delete_after_download
    );
    info!("");
    info!("[live_view]");
    info!("  poll_interval_ms = {}", config.live_view.poll_interval_ms);
    info!("  max_frames = {}", config.live_view.max_frames);
    info!(
        "  output_directory = \"{}\"",
        config.live_view.output_directory.display()
    );
    info!("  output_format = {:?}", config.live_view.output_format);
    info!("");
    info!("[logging]");
    info!("  level = \"{}\"", config.logging.level);
    info!("  log_to_file = {}", config.logging.log_to_file);
    info!("  log_file = \"{}\"", config.logging.log_file.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{PropertyDesc, Status};
    use crate::testdb::MockOp;
    use tempfile::TempDir;

    fn settings(dir: &Path, frames: u32, format: FrameFormat) -> LiveViewSettings {
        LiveViewSettings {
            max_frames: frames,
            output_directory: dir.to_path_buf(),
            interval: Duration::ZERO,
            format,
        }
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("42").unwrap(), 42);
        assert_eq!(parse_code("0xA102").unwrap(), 0xA102);
        assert_eq!(parse_code("0X0000_0100").unwrap(), 0x100);
        assert_eq!(parse_code("-1").unwrap(), -1);
        assert!(parse_code("0xZZ").is_err());
        assert!(parse_code("quality").is_err());
    }

    #[test]
    fn test_parse_status_code() {
        assert_eq!(parse_status_code("0xA102").unwrap(), 0xA102);
        assert_eq!(parse_status_code("4294967295").unwrap(), u32::MAX);
        assert!(parse_status_code("0x1_0000_0000").is_err());
        assert!(parse_status_code("-1").is_err());
    }

    #[test]
    fn test_resolve_property() {
        assert_eq!(
            resolve_property("ImageQuality").unwrap(),
            PropertyId::IMAGE_QUALITY
        );
        assert_eq!(resolve_property("0x501").unwrap(), PropertyId::EVF_MODE);
        assert!(resolve_property("NoSuchProperty").is_err());
        assert!(resolve_property("-5").is_err());
    }

    #[test]
    fn test_described_values_for_image_quality() {
        let camera = MockCamera::new();
        let values = described_values(&camera, camera.camera(), PropertyId::IMAGE_QUALITY).unwrap();

        let names: Vec<_> = values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["LJF", "LJN", "MJF", "SJF", "LR", "LRLJF"]);
        assert_eq!(values[0].description.as_deref(), Some("Jpeg Large Fine"));
    }

    #[test]
    fn test_described_values_without_names() {
        let camera = MockCamera::new();
        camera.set_descriptor(
            camera.camera().raw(),
            PropertyId::ISO_SPEED,
            PropertyDesc::from_codes(&[0x48, 0x50]),
        );

        let values = described_values(&camera, camera.camera(), PropertyId::ISO_SPEED).unwrap();
        assert_eq!(values[0].name, "Unknown:72");
        assert_eq!(values[1].code, 0x50);
        assert!(values.iter().all(|v| v.description.is_none()));

        let json = serde_json::to_string(&values[0]).unwrap();
        assert_eq!(json, r#"{"name":"Unknown:72","code":72}"#);
    }

    #[test]
    fn test_download_items_selects_by_name() {
        let dir = TempDir::new().unwrap();
        let camera = MockCamera::with_sample_content().unwrap();
        let shutdown = AtomicBool::new(false);
        let names = vec!["IMG_0002.CR2".to_string(), "IMG_9999.JPG".to_string()];

        let summary = download_items(
            &camera,
            &names,
            dir.path(),
            &DownloadOptions::default(),
            &shutdown,
        )
        .unwrap();

        assert_eq!(summary.downloaded, vec![dir.path().join("IMG_0002.CR2")]);
        assert_eq!(summary.missing, vec!["IMG_9999.JPG".to_string()]);
        assert!(summary.failed.is_empty());
        assert_eq!(camera.live_handles(), 0);
    }

    #[test]
    fn test_download_items_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        let camera = MockCamera::with_sample_content().unwrap();
        camera.fail_next(MockOp::Download, Status::COMM_DISCONNECTED);
        let shutdown = AtomicBool::new(false);
        let options = DownloadOptions {
            default_directory: None,
            delete_after_download: true,
        };

        let summary = download_items(&camera, &[], dir.path(), &options, &shutdown).unwrap();

        assert_eq!(summary.failed, vec!["IMG_0001.JPG".to_string()]);
        assert_eq!(summary.downloaded.len(), 2);
        assert_eq!(camera.items().len(), 1);
    }

    #[test]
    fn test_download_items_honours_shutdown() {
        let dir = TempDir::new().unwrap();
        let camera = MockCamera::with_sample_content().unwrap();
        let shutdown = AtomicBool::new(true);

        let summary = download_items(
            &camera,
            &[],
            dir.path(),
            &DownloadOptions::default(),
            &shutdown,
        )
        .unwrap();
        assert!(summary.downloaded.is_empty());
        assert_eq!(camera.call_count(MockOp::Download), 0);
    }

    #[test]
    fn test_live_view_settings_overrides() {
        let config = Config::default();
        let defaults = LiveViewSettings::resolve(&config, None, None, None, None);
        assert_eq!(defaults.max_frames, 0);
        assert_eq!(defaults.interval, Duration::from_millis(100));
        assert_eq!(defaults.format, FrameFormat::Jpeg);

        let custom = LiveViewSettings::resolve(
            &config,
            Some(3),
            Some(PathBuf::from("frames")),
            Some(5),
            Some("png"),
        );
        assert_eq!(custom.max_frames, 3);
        assert_eq!(custom.output_directory, PathBuf::from("frames"));
        assert_eq!(custom.interval, Duration::from_millis(5));
        assert_eq!(custom.format, FrameFormat::Png);
    }

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name(7, FrameFormat::Jpeg), "frame_000007.jpg");
        assert_eq!(frame_file_name(12, FrameFormat::Png), "frame_000012.png");
    }

    #[test]
    fn test_save_frame_rejects_corrupt_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.jpg");

        let corrupt = MockDataGenerator::generate_corrupt_frame();
        assert!(save_frame(&corrupt, FrameFormat::Jpeg, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_stream_frames_saves_requested_count() {
        let dir = TempDir::new().unwrap();
        let camera = MockCamera::with_config(MockCameraConfig {
            frames_not_ready: 2,
            ..MockCameraConfig::default()
        });
        camera.push_frames(MockDataGenerator::generate_frames(4).unwrap());
        let shutdown = AtomicBool::new(false);

        let saved = stream_frames(
            &camera,
            camera.camera(),
            &settings(dir.path(), 3, FrameFormat::Png),
            &shutdown,
        )
        .unwrap();

        assert_eq!(saved, 3);
        assert!(dir.path().join("frame_000002.png").exists());
        assert!(!dir.path().join("frame_000003.png").exists());
        assert_eq!(camera.live_handles(), 0);
        assert_eq!(
            camera.property_bytes(camera.camera().raw(), PropertyId::EVF_MODE),
            Some(0u32.to_ne_bytes().to_vec())
        );
    }

    #[test]
    fn test_stream_frames_skips_corrupt_frame() {
        let dir = TempDir::new().unwrap();
        let camera = MockCamera::new();
        camera.push_frame(MockDataGenerator::generate_corrupt_frame());
        camera.push_frames(MockDataGenerator::generate_frames(2).unwrap());
        let shutdown = AtomicBool::new(false);

        let saved = stream_frames(
            &camera,
            camera.camera(),
            &settings(dir.path(), 2, FrameFormat::Jpeg),
            &shutdown,
        )
        .unwrap();

        assert_eq!(saved, 2);
        assert!(dir.path().join("frame_000001.jpg").exists());
    }

    #[test]
    fn test_stream_frames_stops_on_device_error() {
        let dir = TempDir::new().unwrap();
        let camera = MockCamera::new();
        camera.push_frames(MockDataGenerator::generate_frames(2).unwrap());
        camera.fail_next(MockOp::DownloadEvfImage, Status::COMM_DISCONNECTED);
        let shutdown = AtomicBool::new(false);

        let result = stream_frames(
            &camera,
            camera.camera(),
            &settings(dir.path(), 2, FrameFormat::Jpeg),
            &shutdown,
        );

        assert!(result.is_err());
        assert_eq!(camera.live_handles(), 0);
    }
}
