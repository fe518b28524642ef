//! Thumbnail service.
//!
//! The ThumbnailService is the main entry point for thumbnail requests. It
//! orchestrates:
//! - Source validation (existence, content-based format)
//! - Cache filename derivation
//! - Cache lookups against the flat cache directory
//! - Delegation to the image processor on a miss
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ThumbnailService                       │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                        make()                          │  │
//! │  │  1. Validate source    4. Check cache dir              │  │
//! │  │  2. Detect format      5. Load, fit & save on miss     │  │
//! │  │  3. Build cache name   6. Return cache path            │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │          │                      │                   │        │
//! │          ▼                      ▼                   ▼        │
//! │  ┌───────────────┐   ┌────────────────────┐  ┌────────────┐  │
//! │  │ format::detect│   │ cache::build_name  │  │ Processor  │  │
//! │  └───────────────┘   └────────────────────┘  └────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no locking: two callers missing on the same key both generate,
//! and the last write wins.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{build_name, effective_height, CacheInvalidator, FlushReport};
use crate::config::ThumbConfig;
use crate::error::ThumbError;
use crate::format::{detect_file_format, SourceFormat};

use super::processor::{FitOptions, ImageCrateProcessor, ImageProcessor};

// =============================================================================
// Thumbnail
// =============================================================================

/// Result of a thumbnail request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    /// Path of the cached thumbnail
    pub path: PathBuf,

    /// Whether the thumbnail was already cached
    pub cache_hit: bool,

    /// Detected source format
    pub format: SourceFormat,

    /// Thumbnail width in pixels
    pub width: u32,

    /// Thumbnail height in pixels (derived when not requested)
    pub height: u32,
}

// =============================================================================
// Thumbnail Service
// =============================================================================

/// Service for generating and caching thumbnails.
///
/// # Type Parameters
///
/// * `P` - The image processor (defaults to the `image` crate backend)
///
/// # Example
///
/// ```no_run
/// use thumbcache::{ThumbConfig, ThumbnailService};
///
/// let config = ThumbConfig::new("storage/images/cache");
/// let service = ThumbnailService::with_default_processor(config)?;
///
/// let thumb = service.make("images/photo.jpg", 800, None)?;
/// println!("{} (cache hit: {})", thumb.path.display(), thumb.cache_hit);
/// # Ok::<(), thumbcache::ThumbError>(())
/// ```
#[derive(Debug)]
pub struct ThumbnailService<P: ImageProcessor = ImageCrateProcessor> {
    config: ThumbConfig,
    processor: P,
    invalidator: CacheInvalidator,
}

impl ThumbnailService<ImageCrateProcessor> {
    /// Create a service backed by [`ImageCrateProcessor`].
    pub fn with_default_processor(config: ThumbConfig) -> Result<Self, ThumbError> {
        Self::new(config, ImageCrateProcessor::new())
    }
}

impl<P: ImageProcessor> ThumbnailService<P> {
    /// Create a new service, creating the cache directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbError::DirectoryCreation`] if the cache directory is
    /// missing and cannot be created, or if the path exists but is not a
    /// directory.
    pub fn new(config: ThumbConfig, processor: P) -> Result<Self, ThumbError> {
        ensure_cache_dir(&config.cache_dir)?;

        let invalidator = CacheInvalidator::new(config.cache_dir.clone());
        Ok(Self {
            config,
            processor,
            invalidator,
        })
    }

    /// Get a thumbnail of `source` at `width`x`height`, generating it on a
    /// cache miss.
    ///
    /// A missing or zero `height` becomes `round(width / 1.777)`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source does not exist ([`ThumbError::NotFound`])
    /// - The width is zero ([`ThumbError::InvalidDimensions`])
    /// - The source is not a JPEG or PNG ([`ThumbError::UnsupportedFormat`])
    /// - The processor fails to load, resize or save ([`ThumbError::Processing`])
    pub fn make(
        &self,
        source: impl AsRef<Path>,
        width: u32,
        height: Option<u32>,
    ) -> Result<Thumbnail, ThumbError> {
        let source = source.as_ref();
        if !source.exists() {
            return Err(ThumbError::NotFound {
                path: source.to_path_buf(),
            });
        }

        let height = effective_height(width, height);
        if width == 0 || height == 0 {
            return Err(ThumbError::InvalidDimensions { width, height });
        }

        let format = detect_file_format(source)?;
        let path = self
            .config
            .cache_dir
            .join(build_name(&source.to_string_lossy(), format, width, height));

        let thumbnail = |cache_hit| Thumbnail {
            path: path.clone(),
            cache_hit,
            format,
            width,
            height,
        };

        if path.is_file() {
            debug!(source = %source.display(), cache_path = %path.display(), "Thumbnail cache hit");
            return Ok(thumbnail(true));
        }

        debug!(source = %source.display(), width, height, "Thumbnail cache miss");

        let handle = self.processor.load(source)?;
        self.processor.fit_and_save(
            handle,
            FitOptions {
                width,
                height,
                upscale: self.config.allow_upscale,
            },
            &path,
            self.config.jpeg_quality,
        )?;

        info!(
            source = %source.display(),
            cache_path = %path.display(),
            format = format.mime_type(),
            "Generated thumbnail"
        );

        Ok(thumbnail(false))
    }

    /// Compute the cache filename for a request without generating anything.
    ///
    /// See the free function [`cache_name`](fn@cache_name).
    pub fn cache_name(
        &self,
        source: impl AsRef<Path>,
        width: u32,
        height: Option<u32>,
    ) -> Result<String, ThumbError> {
        cache_name(source, width, height)
    }

    /// Remove cached thumbnails of `source`, or the whole cache when `None`.
    pub fn flush(&self, source: Option<&Path>) -> FlushReport {
        self.invalidator.flush(source)
    }

    /// The cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }

    /// The active configuration.
    pub fn config(&self) -> &ThumbConfig {
        &self.config
    }

    /// The underlying image processor.
    pub fn processor(&self) -> &P {
        &self.processor
    }
}

/// Cache filename a request would get. Touches neither the cache directory
/// nor the processor.
///
/// The source must exist: its format decides the extension.
pub fn cache_name(
    source: impl AsRef<Path>,
    width: u32,
    height: Option<u32>,
) -> Result<String, ThumbError> {
    let source = source.as_ref();
    let format = detect_file_format(source)?;
    let height = effective_height(width, height);
    Ok(build_name(&source.to_string_lossy(), format, width, height))
}

/// Create the cache directory (mode 0755 on Unix) unless it already exists.
fn ensure_cache_dir(path: &Path) -> Result<(), ThumbError> {
    if path.is_dir() {
        return Ok(());
    }

    let creation_error = |message: String| ThumbError::DirectoryCreation {
        path: path.to_path_buf(),
        message,
    };

    if path.exists() {
        return Err(creation_error("path exists and is not a directory".to_string()));
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(path)
        .map_err(|e| creation_error(e.to_string()))?;

    info!(cache_dir = %path.display(), "Created thumbnail cache directory");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
