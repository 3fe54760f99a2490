//! WAV persistence for raw PCM returned by the provider

use crate::error::{Result, TtsError};
use crate::models::AudioBuffer;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Sample rate of the PCM the Gemini TTS models return
pub const PROVIDER_SAMPLE_RATE: u32 = 24000;

/// Size of the canonical PCM WAV header hound emits for up to two channels
/// of at most 16-bit samples
pub const WAV_HEADER_LEN: u64 = 44;

/// Container parameters for a WAV file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavFileSpec {
    /// Number of interleaved channels
    pub channels: u16,
    /// Frames per second
    pub sample_rate_hz: u32,
    /// Bytes per sample (1 to 4)
    pub sample_width_bytes: u16,
}

impl Default for WavFileSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate_hz: PROVIDER_SAMPLE_RATE,
            sample_width_bytes: 2,
        }
    }
}

impl WavFileSpec {
    pub fn new(channels: u16, sample_rate_hz: u32, sample_width_bytes: u16) -> Self {
        Self {
            channels,
            sample_rate_hz,
            sample_width_bytes,
        }
    }

    /// Check the parameters describe a writable integer PCM container
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(TtsError::Validation(
                "WAV channel count must be at least 1".to_string(),
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err(TtsError::Validation(
                "WAV sample rate must be greater than 0".to_string(),
            ));
        }
        if !(1..=4).contains(&self.sample_width_bytes) {
            return Err(TtsError::Validation(format!(
                "Unsupported WAV sample width: {} bytes (expected 1 to 4)",
                self.sample_width_bytes
            )));
        }
        Ok(())
    }

    /// Bytes per interleaved frame
    pub fn frame_len(&self) -> usize {
        self.channels as usize * self.sample_width_bytes as usize
    }

    fn to_hound(self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate_hz,
            bits_per_sample: self.sample_width_bytes * 8,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

/// Write PCM bytes to `path` as a WAV file.
///
/// The bytes are copied verbatim behind a header built from `spec`. Data is
/// staged in a temporary file next to the destination and renamed into place
/// once the header is finalized, so a failed write leaves no file behind.
/// Bytes past the last whole frame are appended after the encoded frames and
/// counted in the chunk sizes, without any alignment check.
pub fn write_wav<P: AsRef<Path>>(path: P, audio: &AudioBuffer, spec: &WavFileSpec) -> Result<()> {
    let path = path.as_ref();
    spec.validate()?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let pcm = audio.as_bytes();
    let whole = pcm.len() - pcm.len() % spec.frame_len();
    let (frames, trailing) = pcm.split_at(whole);

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer =
            hound::WavWriter::new(BufWriter::new(staged.as_file_mut()), spec.to_hound())?;
        write_frames(&mut writer, frames, spec)?;
        writer.finalize()?;
    }
    if !trailing.is_empty() {
        tracing::debug!("Appending {} bytes past the last whole frame", trailing.len());
        append_trailing(staged.as_file_mut(), trailing)?;
    }

    match_permissions(path, staged.as_file())?;
    staged.persist(path).map_err(|e| TtsError::Io(e.error))?;

    tracing::debug!(
        "Wrote {} PCM bytes to {} ({} ch, {} Hz, {}-bit)",
        audio.len(),
        path.display(),
        spec.channels,
        spec.sample_rate_hz,
        spec.sample_width_bytes * 8
    );
    Ok(())
}

fn write_frames<W: Write + Seek>(
    writer: &mut hound::WavWriter<W>,
    frames: &[u8],
    spec: &WavFileSpec,
) -> Result<()> {
    let width = spec.sample_width_bytes as usize;
    for sample in frames.chunks_exact(width) {
        match *sample {
            // 8-bit WAV is unsigned; hound stores `sample + 128`
            [b] => writer.write_sample((b as i16 - 128) as i8)?,
            [b0, b1] => writer.write_sample(i16::from_le_bytes([b0, b1]))?,
            [b0, b1, b2] => {
                let sign = if b2 & 0x80 != 0 { 0xff } else { 0x00 };
                writer.write_sample(i32::from_le_bytes([b0, b1, b2, sign]))?
            }
            [b0, b1, b2, b3] => writer.write_sample(i32::from_le_bytes([b0, b1, b2, b3]))?,
            _ => unreachable!("sample width validated to 1..=4"),
        }
    }
    Ok(())
}

/// Append raw bytes to a finalized WAV and grow the RIFF and `data` sizes
fn append_trailing<F: Read + Write + Seek>(file: &mut F, bytes: &[u8]) -> std::io::Result<()> {
    let end = file.seek(SeekFrom::End(0))?;
    file.write_all(bytes)?;
    let extra = bytes.len() as u32;

    let riff_len = (end + bytes.len() as u64 - 8) as u32;
    file.seek(SeekFrom::Start(4))?;
    file.write_all(&riff_len.to_le_bytes())?;

    let mut pos = 12;
    while pos + 8 <= end {
        let mut header = [0u8; 8];
        file.seek(SeekFrom::Start(pos))?;
        file.read_exact(&mut header)?;
        let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if &header[..4] == b"data" {
            file.seek(SeekFrom::Start(pos + 4))?;
            file.write_all(&(size + extra).to_le_bytes())?;
            return file.flush();
        }
        pos += 8 + size as u64 + (size as u64 & 1);
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "WAV data chunk not found",
    ))
}

/// Give the staged file the destination's current permissions, or the usual
/// 0644 for a new file, instead of the temp file's 0600
#[cfg(unix)]
fn match_permissions(path: &Path, staged: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match std::fs::metadata(path) {
        Ok(existing) => existing.permissions(),
        Err(_) => std::fs::Permissions::from_mode(0o644),
    };
    staged.set_permissions(permissions)
}

#[cfg(not(unix))]
fn match_permissions(_path: &Path, _staged: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

/// Playback length of `byte_len` PCM bytes under `spec`
pub fn duration_seconds(byte_len: usize, spec: &WavFileSpec) -> f32 {
    let frames = byte_len / spec.frame_len().max(1);
    frames as f32 / spec.sample_rate_hz.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm(len: usize) -> AudioBuffer {
        AudioBuffer::new((0..len).map(|i| (i % 251) as u8).collect())
    }

    #[test]
    fn test_default_spec() {
        let spec = WavFileSpec::default();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate_hz, 24000);
        assert_eq!(spec.sample_width_bytes, 2);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_default_spec_writes_mono_24k_16bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let audio = pcm(1000);

        write_wav(&path, &audio, &WavFileSpec::default()).unwrap();

        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(len, WAV_HEADER_LEN + 1000);

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        assert_eq!(reader.len(), 500);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[WAV_HEADER_LEN as usize..], audio.as_bytes());
    }

    #[test]
    fn test_stereo_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        write_wav(&path, &pcm(800), &WavFileSpec::new(2, 48000, 2)).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 48000);
        assert_eq!(reader.duration(), 200);
    }

    #[test]
    fn test_eight_bit_bytes_are_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u8.wav");
        let audio = AudioBuffer::new(vec![0, 1, 127, 128, 200, 255]);

        write_wav(&path, &audio, &WavFileSpec::new(1, 8000, 1)).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[bytes.len() - 6..], audio.as_bytes());
    }

    #[test]
    fn test_partial_trailing_frame_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.wav");
        let audio = pcm(1001);

        write_wav(&path, &audio, &WavFileSpec::default()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len() as u64, WAV_HEADER_LEN + 1001);
        assert_eq!(&bytes[WAV_HEADER_LEN as usize..], audio.as_bytes());
        // RIFF size covers everything after the first 8 bytes, data size the payload
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 1045 - 8);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 1001);
    }

    #[test]
    fn test_trailing_bytes_on_stereo_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo-odd.wav");
        let audio = pcm(803);

        write_wav(&path, &audio, &WavFileSpec::new(2, 24000, 2)).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len() as u64, WAV_HEADER_LEN + 803);
        assert_eq!(&bytes[WAV_HEADER_LEN as usize..], audio.as_bytes());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.wav");

        write_wav(&path, &pcm(10), &WavFileSpec::default()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_replaced_file_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("existing.wav");
        std::fs::write(&path, b"old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_wav(&path, &pcm(10), &WavFileSpec::default()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_invalid_spec_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");

        for spec in [
            WavFileSpec::new(0, 24000, 2),
            WavFileSpec::new(1, 0, 2),
            WavFileSpec::new(1, 24000, 0),
            WavFileSpec::new(1, 24000, 5),
        ] {
            let err = write_wav(&path, &pcm(10), &spec).unwrap_err();
            assert!(matches!(err, TtsError::Validation(_)), "{:?}", spec);
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.wav");

        let err = write_wav(&path, &pcm(100), &WavFileSpec::default()).unwrap_err();
        assert!(matches!(err, TtsError::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        std::fs::write(&path, b"stale contents").unwrap();

        write_wav(&path, &pcm(20), &WavFileSpec::default()).unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), WAV_HEADER_LEN + 20);
        // only the destination remains in the directory
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_duration() {
        let duration = duration_seconds(48000, &WavFileSpec::default());
        assert!((duration - 1.0).abs() < 0.001);
    }
}
