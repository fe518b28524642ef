//! Image-processing collaborator.
//!
//! The thumbnail service never touches pixels itself. It talks to an
//! [`ImageProcessor`], which loads a source image and writes a fitted copy to
//! the cache. [`ImageCrateProcessor`] is the default implementation, built on
//! the `image` crate.
//!
//! # Fit semantics
//!
//! The output fills the target box exactly: the source is scaled until it
//! covers the box and the overflow is cropped around the center. When
//! upscaling is disabled and the source is smaller than the box, the source
//! is only cropped to the target aspect ratio and keeps its own scale.
//!
//! # Saving
//!
//! Thumbnails are written to a temporary file next to the cache entry and
//! renamed into place once complete, so the cache never holds a truncated
//! entry that would later be served as a hit.

use std::fs::File;
use std::io::{self, Cursor, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};

use crate::error::ProcessingError;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Minimum JPEG quality accepted by the encoder.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// Collaborator Trait
// =============================================================================

/// Target box for a fit resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOptions {
    pub width: u32,
    pub height: u32,

    /// Enlarge sources smaller than the box
    pub upscale: bool,
}

/// Loads source images and saves fitted thumbnails.
pub trait ImageProcessor {
    /// Decoded image.
    type Handle;

    /// Open and decode the image at `path`.
    fn load(&self, path: &Path) -> Result<Self::Handle, ProcessingError>;

    /// Fit `handle` into `options` and write it to `output`.
    ///
    /// The output format follows the extension of `output`; `quality` only
    /// applies to JPEG.
    fn fit_and_save(
        &self,
        handle: Self::Handle,
        options: FitOptions,
        output: &Path,
        quality: u8,
    ) -> Result<(), ProcessingError>;
}

// =============================================================================
// image crate implementation
// =============================================================================

/// [`ImageProcessor`] backed by the `image` crate.
#[derive(Debug, Clone)]
pub struct ImageCrateProcessor {
    filter: FilterType,
}

impl Default for ImageCrateProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCrateProcessor {
    /// Create a processor using Lanczos3 resampling.
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Create a processor with a specific resampling filter.
    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Apply fit semantics to a decoded image.
    pub fn fit(&self, img: &DynamicImage, options: FitOptions) -> DynamicImage {
        let (src_w, src_h) = (img.width(), img.height());
        let (crop_w, crop_h) = crop_to_aspect(src_w, src_h, options.width, options.height);

        let needs_upscale = crop_w < options.width || crop_h < options.height;
        if needs_upscale && !options.upscale {
            let x = (src_w - crop_w) / 2;
            let y = (src_h - crop_h) / 2;
            return img.crop_imm(x, y, crop_w, crop_h);
        }

        img.resize_to_fill(options.width, options.height, self.filter)
    }
}

impl ImageProcessor for ImageCrateProcessor {
    type Handle = DynamicImage;

    fn load(&self, path: &Path) -> Result<DynamicImage, ProcessingError> {
        let load_error = |message: String| ProcessingError::Load {
            path: path.to_path_buf(),
            message,
        };

        ImageReader::open(path)
            .map_err(|e| load_error(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| load_error(e.to_string()))?
            .decode()
            .map_err(|e| load_error(e.to_string()))
    }

    fn fit_and_save(
        &self,
        handle: DynamicImage,
        options: FitOptions,
        output: &Path,
        quality: u8,
    ) -> Result<(), ProcessingError> {
        if options.width == 0 || options.height == 0 {
            return Err(ProcessingError::InvalidDimensions {
                width: options.width,
                height: options.height,
            });
        }

        let fitted = self.fit(&handle, options);
        let encoded = encode(&fitted, output_format(output), quality)?;

        save_atomically(output, |file| file.write_all(&encoded))
    }
}

/// Write `output` through a temporary file in the same directory.
///
/// On any failure the temporary file is removed and nothing appears at
/// `output`; an existing entry there is left untouched.
pub(crate) fn save_atomically<F>(output: &Path, write: F) -> Result<(), ProcessingError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let save_error = |message: String| ProcessingError::Save {
        path: output.to_path_buf(),
        message,
    };

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".tmp-thumb")
        .tempfile_in(dir)
        .map_err(|e| save_error(e.to_string()))?;

    write(tmp.as_file_mut()).map_err(|e| save_error(e.to_string()))?;

    // Temporary files are created 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| save_error(e.to_string()))?;
    }

    tmp.persist(output)
        .map_err(|e| save_error(e.error.to_string()))?;

    Ok(())
}

/// Encode into memory so a failed encode never leaves a partial file behind.
fn encode(
    img: &DynamicImage,
    format: image::ImageFormat,
    quality: u8,
) -> Result<Vec<u8>, ProcessingError> {
    let mut output = Vec::new();

    let result = match format {
        image::ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = img.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut output, clamp_quality(quality));
            encoder.encode_image(&rgb)
        }
        _ => img.write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png),
    };

    result.map_err(|e| ProcessingError::Encode {
        message: e.to_string(),
    })?;

    Ok(output)
}

fn output_format(output: &Path) -> image::ImageFormat {
    match image::ImageFormat::from_path(output) {
        Ok(image::ImageFormat::Jpeg) => image::ImageFormat::Jpeg,
        _ => image::ImageFormat::Png,
    }
}

/// Largest centered region of a `src_w`x`src_h` image with the aspect ratio
/// of `dst_w`x`dst_h`.
pub fn crop_to_aspect(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32) {
    if dst_w == 0 || dst_h == 0 || src_w == 0 || src_h == 0 {
        return (src_w, src_h);
    }

    // Compare src_w / src_h against dst_w / dst_h without floats
    let src_wide = u64::from(src_w) * u64::from(dst_h) > u64::from(dst_w) * u64::from(src_h);
    if src_wide {
        let w = (u64::from(src_h) * u64::from(dst_w) / u64::from(dst_h)) as u32;
        (w.clamp(1, src_w), src_h)
    } else {
        let h = (u64::from(src_w) * u64::from(dst_h) / u64::from(dst_w)) as u32;
        (src_w, h.clamp(1, src_h))
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Validate JPEG quality parameter.
///
/// Configuration accepts 0-100; 0 is clamped to 1 when encoding.
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    quality <= MAX_JPEG_QUALITY
}

/// Clamp quality to the encoder's range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
