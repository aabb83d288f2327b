//! Bitmap row alignment helpers
//!
//! GL unpacks pixel rows on 4-byte boundaries by default, so tightly packed
//! RGB images need padded strides before upload.

/// Row stride in bytes for `width` pixels of `channels` bytes, rounded up to a multiple of 4
pub const fn align_row_to_4(width: usize, channels: usize) -> usize {
    (width * channels + 3) & !3
}

/// Size in bytes of an image whose rows are padded to 4-byte alignment
pub const fn padded_image_size(width: usize, height: usize, channels: usize) -> usize {
    align_row_to_4(width, channels) * height
}
