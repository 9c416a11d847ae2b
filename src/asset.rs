// The file a user picked for upload, held in memory for one interaction.

use crate::error::AssetError;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

/// The only media type the prediction service accepts.
pub const WAV_MEDIA_TYPE: &str = "audio/wav";

/// Raw bytes plus what the picker declared about them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedAsset {
    bytes: Vec<u8>,
    media_type: String,
    file_name: String,
}

impl UploadedAsset {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        UploadedAsset {
            bytes,
            media_type: media_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Read a file from disk. The declared media type comes from the
    /// extension, the way a browser upload widget declares it; the content
    /// is not sniffed.
    pub fn from_path(path: &Path) -> Result<Self, AssetError> {
        if !path.is_file() {
            return Err(AssetError::NotAFile(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("audio.wav")
            .to_string();
        let media_type = media_type_for(path);
        log::debug!(
            "loaded {} ({} bytes, declared {})",
            path.display(),
            bytes.len(),
            media_type
        );
        Ok(UploadedAsset::new(bytes, media_type, file_name))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True only for an exact `audio/wav` declaration.
    pub fn validate_type(&self) -> bool {
        self.media_type == WAV_MEDIA_TYPE
    }

    /// Parse the RIFF header and summarise the recording.
    pub fn preview(&self) -> Result<WavSummary, hound::Error> {
        let reader = hound::WavReader::new(Cursor::new(self.bytes.as_slice()))?;
        let spec = reader.spec();
        let frames = reader.duration();
        let duration_secs = if spec.sample_rate == 0 {
            0.0
        } else {
            frames as f64 / spec.sample_rate as f64
        };
        Ok(WavSummary {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            duration_secs,
        })
    }
}

/// Media type a file picker would declare for `path`.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("wav") => WAV_MEDIA_TYPE,
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Terminal stand-in for an audio player: what is in the file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavSummary {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub duration_secs: f64,
}

impl fmt::Display for WavSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{} ch", n),
        };
        write!(
            f,
            "{}, {} Hz, {}-bit, {:.2} s",
            layout, self.sample_rate, self.bits_per_sample, self.duration_secs
        )
    }
}
