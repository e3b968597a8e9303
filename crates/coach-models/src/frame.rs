//! Extracted video frames.
//!
//! Frames arrive from the frame-extraction service (or inline in a request)
//! either as raw JPEG bytes or as base64 text, optionally wrapped in a
//! `data:` URI. They are immutable once constructed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_MIME: &str = "image/jpeg";

/// Errors raised while constructing a frame from wire data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame {0} has an empty image payload")]
    Empty(u64),

    #[error("frame {0} has an invalid data URI")]
    InvalidDataUri(u64),

    #[error("frame {index} is not valid base64: {reason}")]
    InvalidBase64 { index: u64, reason: String },
}

/// Image payload of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameImage {
    /// Raw encoded image bytes.
    Bytes { mime: String, data: Vec<u8> },
    /// Base64 text without any `data:` prefix.
    Base64 { mime: String, data: String },
}

/// A single extracted video frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireFrame", into = "WireFrame")]
pub struct Frame {
    index: u64,
    image: FrameImage,
}

impl Frame {
    /// Create a frame from raw JPEG bytes.
    pub fn from_jpeg(index: u64, data: Vec<u8>) -> Self {
        Self {
            index,
            image: FrameImage::Bytes {
                mime: DEFAULT_MIME.to_string(),
                data,
            },
        }
    }

    /// Create a frame from base64 text or a `data:<mime>;base64,` URI.
    pub fn from_base64(index: u64, text: &str) -> Result<Self, FrameError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FrameError::Empty(index));
        }

        let (mime, data) = match text.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest
                    .split_once(',')
                    .ok_or(FrameError::InvalidDataUri(index))?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or(FrameError::InvalidDataUri(index))?;
                let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
                (mime.to_string(), data)
            }
            None => (DEFAULT_MIME.to_string(), text),
        };

        if data.is_empty() {
            return Err(FrameError::Empty(index));
        }

        STANDARD
            .decode(data)
            .map_err(|e| FrameError::InvalidBase64 {
                index,
                reason: e.to_string(),
            })?;

        Ok(Self {
            index,
            image: FrameImage::Base64 {
                mime,
                data: data.to_string(),
            },
        })
    }

    /// Index of this frame in the original video.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn image(&self) -> &FrameImage {
        &self.image
    }

    /// Render the payload as a `data:` URI suitable for an `image_url` part.
    pub fn data_uri(&self) -> String {
        match &self.image {
            FrameImage::Bytes { mime, data } => {
                format!("data:{};base64,{}", mime, STANDARD.encode(data))
            }
            FrameImage::Base64 { mime, data } => format!("data:{};base64,{}", mime, data),
        }
    }
}

/// Level of detail requested from the model for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameDetail {
    High,
    Low,
}

/// A frame chosen for a model call, tagged with its detail level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampledFrame<'a> {
    pub frame: &'a Frame,
    pub detail: FrameDetail,
}

/// Wire representation shared with the frame-extraction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFrame {
    pub frame_index: u64,
    pub image: String,
}

impl TryFrom<WireFrame> for Frame {
    type Error = FrameError;

    fn try_from(wire: WireFrame) -> Result<Self, Self::Error> {
        Frame::from_base64(wire.frame_index, &wire.image)
    }
}

impl From<Frame> for WireFrame {
    fn from(frame: Frame) -> Self {
        let image = match frame.image {
            FrameImage::Bytes { data, .. } => STANDARD.encode(data),
            FrameImage::Base64 { data, .. } => data,
        };
        Self {
            frame_index: frame.index,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_base64_gets_jpeg_data_uri() {
        let frame = Frame::from_base64(4, "aGVsbG8=").unwrap();
        assert_eq!(frame.index(), 4);
        assert_eq!(frame.data_uri(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_data_uri_keeps_mime() {
        let frame = Frame::from_base64(0, "data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(frame.data_uri(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_bytes_are_encoded() {
        let frame = Frame::from_jpeg(1, b"hello".to_vec());
        assert_eq!(frame.data_uri(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert_eq!(Frame::from_base64(2, "  "), Err(FrameError::Empty(2)));
        assert_eq!(
            Frame::from_base64(3, "data:image/jpeg,abc"),
            Err(FrameError::InvalidDataUri(3))
        );
        assert!(matches!(
            Frame::from_base64(5, "not base64!!"),
            Err(FrameError::InvalidBase64 { index: 5, .. })
        ));
    }

    #[test]
    fn test_deserialize_wire_frame() {
        let frame: Frame =
            serde_json::from_str(r#"{"frameIndex": 30, "image": "aGVsbG8="}"#).unwrap();
        assert_eq!(frame.index(), 30);

        let err = serde_json::from_str::<Frame>(r#"{"frameIndex": 1, "image": ""}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_detail_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&FrameDetail::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&FrameDetail::Low).unwrap(), "\"low\"");
    }
}
