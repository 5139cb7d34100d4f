//! Web font encodings of sfnt binaries.
//!
//! ```no_run
//! let ttf: &[u8] = &[];
//! let woff = fontmill_font_web::encode_woff(ttf);
//! let woff2 = fontmill_font_web::encode_woff2(ttf);
//! ```

mod sfnt;
mod woff;
mod woff2;

pub use woff::encode_woff;
pub use woff2::encode_woff2;

/// Round up to a multiple of four.
pub(crate) fn pad4(len: usize) -> usize {
    (len + 3) & !3
}
