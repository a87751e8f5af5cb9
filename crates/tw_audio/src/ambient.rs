//! Looping ambient sound effect.
//!
//! The clip is read and validated once at startup. The scene loop calls
//! `keep_playing()` every frame; the clip is re-queued only after the previous
//! play-through has drained from the sink, so instances never overlap and the
//! sound loops continuously.
//!
//! A missing or undecodable clip is a startup error. A machine without an
//! audio output device runs muted.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

pub const DEFAULT_VOLUME: f32 = 0.5;

/// Encoded audio bytes that are known to decode.
#[derive(Clone)]
pub struct SoundClip {
    label: String,
    bytes: Arc<[u8]>,
}

impl SoundClip {
    pub fn load(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("Failed to read sound '{}': {e}", path.display()))?;
        Self::from_bytes(bytes, &path.display().to_string())
    }

    pub fn from_bytes(bytes: Vec<u8>, label: &str) -> Result<Self, String> {
        let clip = Self {
            label: label.to_string(),
            bytes: Arc::from(bytes),
        };
        clip.decoder()
            .map_err(|e| format!("Failed to decode sound '{label}': {e}"))?;
        Ok(clip)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn decoder(&self) -> Result<Decoder<Cursor<Arc<[u8]>>>, rodio::decoder::DecoderError> {
        Decoder::new(Cursor::new(self.bytes.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioStatus {
    Playing,
    Stopped,
    /// No output device; the loop runs silently.
    Muted,
}

impl AudioStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Playing => "Audio: playing",
            Self::Stopped => "Audio: stopped",
            Self::Muted => "Audio: muted (no output device)",
        }
    }
}

struct Output {
    // The stream must outlive the sink or playback stops.
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

pub struct AmbientSound {
    clip: SoundClip,
    output: Option<Output>,
    stopped: bool,
}

impl AmbientSound {
    pub fn new(clip: SoundClip, volume: f32) -> Self {
        let output = match open_output(volume) {
            Ok(output) => {
                log::info!("Audio output opened for '{}' (volume {volume})", clip.label());
                Some(output)
            }
            Err(err) => {
                log::warn!("{err}. Running without sound.");
                None
            }
        };
        Self {
            clip,
            output,
            stopped: false,
        }
    }

    pub fn status(&self) -> AudioStatus {
        match (&self.output, self.stopped) {
            (None, _) => AudioStatus::Muted,
            (Some(_), true) => AudioStatus::Stopped,
            (Some(_), false) => AudioStatus::Playing,
        }
    }

    /// Queue another play-through if the previous one has finished.
    pub fn keep_playing(&mut self) {
        if self.stopped {
            return;
        }
        let Some(output) = &self.output else {
            return;
        };
        if !output.sink.empty() {
            return;
        }
        match self.clip.decoder() {
            Ok(source) => output.sink.append(source.convert_samples::<f32>()),
            Err(err) => {
                log::error!("Failed to restart sound '{}': {err}", self.clip.label());
                self.stopped = true;
            }
        }
    }

    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Some(output) = &self.output {
            output.sink.stop();
            log::info!("Sound '{}' stopped", self.clip.label());
        }
    }
}

impl Drop for AmbientSound {
    fn drop(&mut self) {
        self.stop();
    }
}

fn open_output(volume: f32) -> Result<Output, String> {
    let (stream, handle) = OutputStream::try_default()
        .map_err(|e| format!("Failed to open audio output: {e}"))?;
    let sink = Sink::try_new(&handle).map_err(|e| format!("Failed to create audio sink: {e}"))?;
    sink.set_volume(volume);
    Ok(Output {
        _stream: stream,
        _handle: handle,
        sink,
    })
}
