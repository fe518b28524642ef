//! Thumbnail generation integration tests.
//!
//! Tests verify:
//! - Real JPEG and PNG sources are fitted to the exact requested size
//! - Cache hits never reach the image library
//! - Pre-populated cache entries are returned as-is
//! - Missing and unsupported sources surface typed errors

use std::fs;

use thumbcache::{
    fingerprint, ProcessingError, SourceFormat, ThumbConfig, ThumbError, ThumbnailService,
};

use super::test_utils::{
    create_test_jpeg, create_test_png, is_valid_jpeg, is_valid_png, list_dir, write_file,
    CountingProcessor, PanickingProcessor,
};

// =============================================================================
// Generation
// =============================================================================

#[test]
fn test_make_jpeg_thumbnail() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "images/photo.jpg", &create_test_jpeg(320, 240));
    let service =
        ThumbnailService::with_default_processor(ThumbConfig::new(dir.path().join("cache")))
            .unwrap();

    let thumb = service.make(&source, 160, None).unwrap();

    assert!(!thumb.cache_hit);
    assert_eq!(thumb.format, SourceFormat::Jpeg);
    assert_eq!((thumb.width, thumb.height), (160, 90));
    assert_eq!(
        thumb.path.file_name().unwrap().to_string_lossy(),
        format!("photo-160x90-{}.jpg", fingerprint("photo.jpg"))
    );

    let bytes = fs::read(&thumb.path).unwrap();
    assert!(is_valid_jpeg(&bytes));
    assert_eq!(image::image_dimensions(&thumb.path).unwrap(), (160, 90));
}

#[test]
fn test_make_png_thumbnail_keeps_png() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "icon.png", &create_test_png(64, 64));
    let service =
        ThumbnailService::with_default_processor(ThumbConfig::new(dir.path().join("cache")))
            .unwrap();

    let thumb = service.make(&source, 32, Some(32)).unwrap();

    assert_eq!(thumb.format, SourceFormat::Png);
    assert!(thumb.path.to_string_lossy().ends_with(".png"));
    assert!(is_valid_png(&fs::read(&thumb.path).unwrap()));
    assert_eq!(image::image_dimensions(&thumb.path).unwrap(), (32, 32));
}

#[test]
fn test_format_follows_content_not_extension() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "mislabeled.jpg", &create_test_png(40, 40));
    let service =
        ThumbnailService::with_default_processor(ThumbConfig::new(dir.path().join("cache")))
            .unwrap();

    let thumb = service.make(&source, 20, Some(20)).unwrap();

    assert_eq!(thumb.format, SourceFormat::Png);
    assert!(thumb.path.to_string_lossy().ends_with(".png"));
}

#[test]
fn test_small_source_is_upscaled() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "tiny.jpg", &create_test_jpeg(16, 16));
    let service =
        ThumbnailService::with_default_processor(ThumbConfig::new(dir.path().join("cache")))
            .unwrap();

    let thumb = service.make(&source, 64, Some(32)).unwrap();
    assert_eq!(image::image_dimensions(&thumb.path).unwrap(), (64, 32));
}

#[test]
fn test_small_source_without_upscale_is_only_cropped() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "tiny.jpg", &create_test_jpeg(16, 16));
    let config = ThumbConfig::new(dir.path().join("cache")).with_upscale(false);
    let service = ThumbnailService::with_default_processor(config).unwrap();

    let thumb = service.make(&source, 64, Some(32)).unwrap();
    assert_eq!(image::image_dimensions(&thumb.path).unwrap(), (16, 8));
}

#[test]
fn test_quality_affects_jpeg_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "photo.jpg", &create_test_jpeg(256, 256));

    let low = ThumbnailService::with_default_processor(
        ThumbConfig::new(dir.path().join("low")).with_jpeg_quality(10),
    )
    .unwrap();
    let high = ThumbnailService::with_default_processor(
        ThumbConfig::new(dir.path().join("high")).with_jpeg_quality(95),
    )
    .unwrap();

    let low_size = fs::metadata(low.make(&source, 128, Some(128)).unwrap().path)
        .unwrap()
        .len();
    let high_size = fs::metadata(high.make(&source, 128, Some(128)).unwrap().path)
        .unwrap()
        .len();

    assert!(low_size < high_size);
}

// =============================================================================
// Cache Hits
// =============================================================================

#[test]
fn test_second_request_is_cache_hit() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "photo.jpg", &create_test_jpeg(100, 100));
    let service =
        ThumbnailService::new(ThumbConfig::new(dir.path().join("cache")), CountingProcessor::new())
            .unwrap();

    let first = service.make(&source, 50, Some(50)).unwrap();
    let second = service.make(&source, 50, Some(50)).unwrap();

    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_eq!(first.path, second.path);
    assert_eq!(service.processor().loads(), 1);
    assert_eq!(service.processor().saves(), 1);
}

#[test]
fn test_each_size_is_cached_separately() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "photo.jpg", &create_test_jpeg(100, 100));
    let cache_dir = dir.path().join("cache");
    let service = ThumbnailService::new(ThumbConfig::new(&cache_dir), CountingProcessor::new())
        .unwrap();

    service.make(&source, 50, Some(50)).unwrap();
    service.make(&source, 40, Some(50)).unwrap();
    service.make(&source, 50, Some(40)).unwrap();
    service.make(&source, 50, Some(50)).unwrap();

    assert_eq!(service.processor().saves(), 3);
    assert_eq!(list_dir(&cache_dir).len(), 3);
}

#[test]
fn test_prepopulated_entry_is_returned_without_processing() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    fs::create_dir(&cache_dir).unwrap();

    let source = write_file(dir.path(), "images/photo.jpg", &create_test_jpeg(10, 10));
    let entry = format!("photo-800x450-{}.jpg", fingerprint("photo.jpg"));
    // Placeholder content: a hit must not be decoded or validated
    let cached = write_file(&cache_dir, &entry, b"not really a jpeg");

    let service = ThumbnailService::new(ThumbConfig::new(&cache_dir), PanickingProcessor).unwrap();
    let thumb = service.make(&source, 800, Some(450)).unwrap();

    assert!(thumb.cache_hit);
    assert_eq!(thumb.path, cached);
    assert_eq!(fs::read(&cached).unwrap(), b"not really a jpeg");
}

#[test]
fn test_directory_at_cache_path_is_not_a_hit() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    let source = write_file(dir.path(), "photo.jpg", &create_test_jpeg(10, 10));
    let entry = format!("photo-20x20-{}.jpg", fingerprint("photo.jpg"));
    fs::create_dir_all(cache_dir.join(&entry)).unwrap();

    let service =
        ThumbnailService::new(ThumbConfig::new(&cache_dir), CountingProcessor::new()).unwrap();
    let result = service.make(&source, 20, Some(20));

    // The save fails because a directory occupies the target path
    assert!(matches!(
        result,
        Err(ThumbError::Processing(ProcessingError::Save { .. }))
    ));
    assert_eq!(service.processor().loads(), 1);
    // No temporary file is left next to the entry
    assert_eq!(list_dir(&cache_dir), vec![entry]);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let service =
        ThumbnailService::new(ThumbConfig::new(dir.path().join("cache")), PanickingProcessor)
            .unwrap();

    let result = service.make(dir.path().join("nope.jpg"), 100, None);
    match result {
        Err(ThumbError::NotFound { path }) => assert!(path.ends_with("nope.jpg")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_text_file_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "readme.txt", b"plain text, not an image\n");
    let service =
        ThumbnailService::new(ThumbConfig::new(dir.path().join("cache")), PanickingProcessor)
            .unwrap();

    let result = service.make(&source, 100, None);
    assert!(matches!(result, Err(ThumbError::UnsupportedFormat { .. })));
}

#[test]
fn test_truncated_jpeg_is_processing_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = create_test_jpeg(64, 64);
    bytes.truncate(20);
    let source = write_file(dir.path(), "broken.jpg", &bytes);
    let cache_dir = dir.path().join("cache");
    let service =
        ThumbnailService::with_default_processor(ThumbConfig::new(&cache_dir)).unwrap();

    let result = service.make(&source, 32, None);

    assert!(matches!(
        result,
        Err(ThumbError::Processing(ProcessingError::Load { .. }))
    ));
    assert!(list_dir(&cache_dir).is_empty());
}

#[test]
fn test_nested_cache_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("storage").join("images").join("cache");

    let service = ThumbnailService::with_default_processor(ThumbConfig::new(&cache_dir)).unwrap();

    assert!(cache_dir.is_dir());
    assert_eq!(service.cache_dir(), cache_dir.as_path());
}
