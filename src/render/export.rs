use std::io::Cursor;
use std::str::FromStr;

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{TweenError, TweenResult};

/// Encoded image format for frame export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Ok(Self::Png),
            "jpeg" | "jpg" | "image/jpeg" => Ok(Self::Jpeg),
            other => Err(TweenError::validation(format!(
                "unsupported export format '{other}' (expected png or jpeg)"
            ))),
        }
    }
}

/// One encoded frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedFrame {
    pub time_ms: f64,
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Map a `0..=1` quality factor to the encoder's `1..=100` scale.
pub fn jpeg_quality(quality: f64) -> u8 {
    if !quality.is_finite() {
        return 92;
    }
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode `frame` as straight-alpha PNG or opaque JPEG.
pub fn encode_frame(frame: &FrameRGBA, format: ExportFormat, quality: f64) -> TweenResult<Vec<u8>> {
    let rgba = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight())
        .ok_or_else(|| {
            TweenError::export(format!(
                "frame buffer does not match {}x{}",
                frame.width, frame.height
            ))
        })?;

    let mut buf = Vec::new();
    match format {
        ExportFormat::Png => {
            rgba.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| TweenError::export(format!("png encode: {e}")))?;
        }
        ExportFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(rgba).into_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut buf,
                jpeg_quality(quality),
            );
            rgb.write_with_encoder(encoder)
                .map_err(|e| TweenError::export(format!("jpeg encode: {e}")))?;
        }
    }
    Ok(buf)
}

/// Frame times for a sequence export: `start`, then every `1000 / rate` ms, with the final
/// sample clamped to `end`.
pub fn sequence_times(start_ms: f64, end_ms: f64, frame_rate: f64) -> TweenResult<Vec<f64>> {
    if !(start_ms.is_finite() && end_ms.is_finite()) || start_ms < 0.0 || end_ms < start_ms {
        return Err(TweenError::validation(format!(
            "invalid export range {start_ms}..{end_ms}"
        )));
    }
    if !(frame_rate.is_finite() && frame_rate > 0.0) {
        return Err(TweenError::validation(format!(
            "export frame rate must be finite and > 0, got {frame_rate}"
        )));
    }
    let step = 1000.0 / frame_rate;
    let intervals = ((end_ms - start_ms) / step - 1e-9).ceil().max(0.0) as usize;
    Ok((0..=intervals)
        .map(|i| (start_ms + i as f64 * step).min(end_ms))
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
