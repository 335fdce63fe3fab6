//! Mock data generator for the simulated camera
//!
//! Live view frames are real JPEGs produced by the `image` encoder, so the
//! decode path runs exactly as it does against a camera. Files on the
//! simulated card only need a believable header: nothing decodes them, they
//! are just moved byte for byte.

use image::{ImageFormat, ImageResult, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::Cursor;

/// Default live view frame width
pub const FRAME_WIDTH: u32 = 160;

/// Default live view frame height
pub const FRAME_HEIGHT: u32 = 120;

/// Default size of a simulated file on the card
pub const TEST_FILE_SIZE: usize = 4 * 1024;

/// Mock data generator for frames and card files
pub struct MockDataGenerator;

impl MockDataGenerator {
    // =========================================================================
    // LIVE VIEW FRAMES
    // =========================================================================

    /// Encode a JPEG frame of the given size
    ///
    /// The picture is a gradient with a vertical bar whose position depends on
    /// `seed`, so consecutive seeds give visibly different frames.
    pub fn generate_frame(width: u32, height: u32, seed: u64) -> ImageResult<Vec<u8>> {
        let bar = if width == 0 {
            0
        } else {
            (seed % width as u64) as u32
        };

        let image = RgbImage::from_fn(width, height, |x, y| {
            if x.abs_diff(bar) < 4 {
                Rgb([255, 255, 255])
            } else {
                let r = (x * 255 / width.max(1)) as u8;
                let g = (y * 255 / height.max(1)) as u8;
                let b = (seed.wrapping_mul(37) % 256) as u8;
                Rgb([r, g, b])
            }
        });

        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Jpeg)?;
        Ok(buffer.into_inner())
    }

    /// A sequence of `count` default-sized frames
    pub fn generate_frames(count: usize) -> ImageResult<Vec<Vec<u8>>> {
        (0..count as u64)
            .map(|seed| Self::generate_frame(FRAME_WIDTH, FRAME_HEIGHT, seed * 7))
            .collect()
    }

    /// Bytes that start like a JPEG but cannot be decoded
    pub fn generate_corrupt_frame() -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[0x00; 32]);
        data
    }

    // =========================================================================
    // CARD FILES
    // =========================================================================

    /// JPEG-looking content of exactly `size` bytes
    pub fn generate_jpeg_with_seed(size: usize, seed: u64) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);

        // SOI + APP0 (JFIF)
        data.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);

        Self::fill_random(&mut data, size.saturating_sub(2), seed);

        // EOI
        data.extend_from_slice(&[0xFF, 0xD9]);
        data.truncate(size);
        data
    }

    /// CR2-looking content of exactly `size` bytes
    pub fn generate_cr2_with_seed(size: usize, seed: u64) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);

        // TIFF little-endian header, CR2 magic and version
        data.extend_from_slice(&[0x49, 0x49, 0x2A, 0x00, 0x10, 0x00, 0x00, 0x00]);
        data.extend_from_slice(b"CR");
        data.extend_from_slice(&[0x02, 0x00]);

        Self::fill_random(&mut data, size, seed);
        data.truncate(size);
        data
    }

    /// Content for a card file, picked by extension
    pub fn generate_for_name(name: &str, size: usize, seed: u64) -> Vec<u8> {
        let lower = name.to_lowercase();
        if lower.ends_with(".cr2") || lower.ends_with(".cr3") {
            Self::generate_cr2_with_seed(size, seed)
        } else {
            Self::generate_jpeg_with_seed(size, seed)
        }
    }

    fn fill_random(data: &mut Vec<u8>, target_len: usize, seed: u64) {
        if data.len() >= target_len {
            return;
        }
        let start = data.len();
        data.resize(target_len, 0);
        StdRng::seed_from_u64(seed).fill_bytes(&mut data[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_frame_decodes() {
        let bytes = MockDataGenerator::generate_frame(64, 48, 3).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
    }

    #[test]
    fn test_corrupt_frame_does_not_decode() {
        let bytes = MockDataGenerator::generate_corrupt_frame();
        assert!(image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).is_err());
    }

    #[test]
    fn test_jpeg_content_size_and_markers() {
        let data = MockDataGenerator::generate_jpeg_with_seed(1024, 1);
        assert_eq!(data.len(), 1024);
        assert_eq!(&data[0..2], &[0xFF, 0xD8]);
        assert_eq!(&data[data.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_seeded_content_is_deterministic() {
        let a = MockDataGenerator::generate_for_name("IMG_0001.CR2", 512, 42);
        let b = MockDataGenerator::generate_for_name("IMG_0001.CR2", 512, 42);
        let c = MockDataGenerator::generate_for_name("IMG_0001.CR2", 512, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(&a[8..10], b"CR");
    }

    #[test]
    fn test_frame_sequence_differs() {
        let frames = MockDataGenerator::generate_frames(3).unwrap();
        assert_eq!(frames.len(), 3);
        assert_ne!(frames[0], frames[1]);
    }
}
