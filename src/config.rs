//! Configuration management for thumbcache.
//!
//! Two layers live here:
//!
//! - [`ThumbConfig`]: the library-side settings handed to
//!   [`ThumbnailService::new`](crate::ThumbnailService::new)
//! - [`Cli`]: command-line arguments via clap, each global option also
//!   readable from a `THUMB_` environment variable
//!
//! # Environment Variables
//!
//! - `THUMB_CACHE_DIR` - Cache directory (default: storage/images/cache)
//! - `THUMB_JPEG_QUALITY` - JPEG quality for generated thumbnails, 0-100 (default: 80)
//! - `THUMB_NO_UPSCALE` - Never enlarge sources smaller than the target box

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::thumbnail::{is_valid_quality, DEFAULT_JPEG_QUALITY};

// =============================================================================
// Default Values
// =============================================================================

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "storage/images/cache";

// =============================================================================
// Library Configuration
// =============================================================================

/// Settings for a [`ThumbnailService`](crate::ThumbnailService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbConfig {
    /// Flat directory holding every cached thumbnail
    pub cache_dir: PathBuf,

    /// JPEG quality (0-100) used when saving JPEG thumbnails
    pub jpeg_quality: u8,

    /// Enlarge sources smaller than the requested box
    pub allow_upscale: bool,
}

impl ThumbConfig {
    /// Create a configuration with default quality and upscaling enabled.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            allow_upscale: true,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_upscale(mut self, allow: bool) -> Self {
        self.allow_upscale = allow;
        self
    }

    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err("Cache directory is required. Set --cache-dir or THUMB_CACHE_DIR".to_string());
        }

        if !is_valid_quality(self.jpeg_quality) {
            return Err("jpeg_quality must be between 0 and 100".to_string());
        }

        Ok(())
    }
}

impl Default for ThumbConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// thumbcache - on-demand image thumbnails with a flat on-disk cache.
#[derive(Parser, Debug, Clone)]
#[command(name = "thumbcache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the cached thumbnails.
    #[arg(long, global = true, default_value = DEFAULT_CACHE_DIR, env = "THUMB_CACHE_DIR")]
    pub cache_dir: PathBuf,

    /// JPEG quality for generated thumbnails (0-100).
    #[arg(long, global = true, default_value_t = DEFAULT_JPEG_QUALITY, env = "THUMB_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    /// Never enlarge sources smaller than the requested size.
    #[arg(long, global = true, default_value_t = false, env = "THUMB_NO_UPSCALE")]
    pub no_upscale: bool,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the path of a thumbnail, generating it on a cache miss.
    Make(SizeArgs),

    /// Print the cache filename a thumbnail would get, without generating it.
    Name(SizeArgs),

    /// Remove the thumbnails of one source, or the whole cache.
    Flush(FlushArgs),
}

/// Source and target size of a thumbnail.
#[derive(Args, Debug, Clone)]
pub struct SizeArgs {
    /// Source image (JPEG or PNG).
    pub source: PathBuf,

    /// Thumbnail width in pixels.
    #[arg(short = 'W', long)]
    pub width: u32,

    /// Thumbnail height in pixels. Defaults to width / 1.777.
    #[arg(short = 'H', long)]
    pub height: Option<u32>,
}

/// Arguments of the flush subcommand.
#[derive(Args, Debug, Clone)]
pub struct FlushArgs {
    /// Source image whose thumbnails are removed. Omit to empty the cache.
    pub source: Option<PathBuf>,
}

/// How command results are printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text
    Text,

    /// JSON object
    Json,
}

impl Cli {
    /// Library configuration derived from the global options.
    pub fn thumb_config(&self) -> ThumbConfig {
        ThumbConfig::new(self.cache_dir.clone())
            .with_jpeg_quality(self.jpeg_quality)
            .with_upscale(!self.no_upscale)
    }

    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.thumb_config().validate()?;

        match &self.command {
            Command::Make(args) | Command::Name(args) if args.width == 0 => {
                Err("width must be greater than 0".to_string())
            }
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
