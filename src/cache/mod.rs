//! On-disk thumbnail cache layout.
//!
//! The cache is one flat directory. There is no index or manifest: an entry's
//! filename carries everything needed to find it again.
//!
//! # Components
//!
//! - [`sanitize`]: readable slug of the source filename
//! - [`fingerprint`]: CRC-32 of the source base filename
//! - [`build_name`]: composes slug, size, fingerprint and extension
//! - [`CacheInvalidator`]: removes one source's entries or all entries
//!
//! # Example
//!
//! ```
//! use thumbcache::cache::{build_name, fingerprint};
//! use thumbcache::format::SourceFormat;
//!
//! let name = build_name("images/Café.jpg", SourceFormat::Jpeg, 320, 180);
//! assert_eq!(name, format!("cafe-320x180-{}.jpg", fingerprint("Café.jpg")));
//! ```

mod fingerprint;
mod invalidate;
mod key;
mod sanitize;

pub use fingerprint::{fingerprint, FINGERPRINT_LEN};
pub use invalidate::{CacheInvalidator, FlushFailure, FlushReport};
pub use key::{build_name, effective_height, DEFAULT_ASPECT_RATIO};
pub use sanitize::sanitize;
