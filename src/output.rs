// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hands a finished buffer to the image encoder.  The caller picks the
//! path; the format follows its extension.

use std::path::Path;

use image::ColorType;

use crate::canvas::PixelBuffer;
use crate::errors::OutputError;

/// Encode `buffer` as an RGBA image at `path`.
pub fn write_image<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> Result<(), OutputError> {
    let path = path.as_ref();
    image::save_buffer(
        path,
        buffer.as_bytes(),
        buffer.width() as u32,
        buffer.height() as u32,
        ColorType::Rgba8,
    )
    .map_err(|e| OutputError::Encode {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
