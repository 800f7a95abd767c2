// src/source/file.rs

use crate::error::{RenderError, Result};
use crate::source::{SampleFormat, SampleSource};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

/// Decodes the default track of an audio file into interleaved f32 samples.
///
/// The stream is described as 32-bit float, since that is what `read` yields
/// regardless of the bit depth stored in the file.
pub struct FileSampleSource {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    spec: SampleFormat,
    n_frames: u64,
    sample_buf: Option<SampleBuffer<f32>>,
    pending: Vec<f32>,
    pending_pos: usize,
    finished: bool,
}

impl FileSampleSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(unsupported_as_invalid)?;
        let format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| RenderError::InvalidFormat("no default audio track".into()))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let channels = codec_params
            .channels
            .map(|c| c.count())
            .ok_or_else(|| RenderError::InvalidFormat("unknown channel layout".into()))?;
        let n_frames = codec_params
            .n_frames
            .ok_or_else(|| RenderError::InvalidFormat("unknown stream length".into()))?;
        let sample_rate = codec_params.sample_rate.unwrap_or(44100);

        let decoder = get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(unsupported_as_invalid)?;

        log::debug!(
            "opened {}: {} frames, {} ch, {} Hz",
            path.display(),
            n_frames,
            channels,
            sample_rate
        );

        Ok(Self {
            format,
            decoder,
            track_id,
            spec: SampleFormat {
                bits_per_sample: 32,
                channels,
                sample_rate,
            },
            n_frames,
            sample_buf: None,
            pending: Vec::new(),
            pending_pos: 0,
            finished: false,
        })
    }

    /// Decodes the next packet of our track into `pending`.
    /// Leaves `pending` empty and sets `finished` at end of stream.
    fn decode_next(&mut self) -> Result<()> {
        self.pending.clear();
        self.pending_pos = 0;

        loop {
            let packet = match self.format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    self.finished = true;
                    return Ok(());
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.finished = true;
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = self.decoder.decode(&packet)?;
            if decoded.frames() == 0 {
                continue;
            }

            let needs_new = match &self.sample_buf {
                Some(buf) => buf.capacity() < decoded.capacity(),
                None => true,
            };
            if needs_new {
                self.sample_buf = Some(SampleBuffer::<f32>::new(
                    decoded.capacity() as u64,
                    *decoded.spec(),
                ));
            }
            if let Some(buf) = self.sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                self.pending.extend_from_slice(buf.samples());
            }
            return Ok(());
        }
    }
}

impl SampleSource for FileSampleSource {
    fn format(&self) -> SampleFormat {
        self.spec
    }

    fn byte_len(&self) -> u64 {
        self.n_frames * self.spec.channels as u64 * self.spec.bytes_per_sample()
    }

    fn read(&mut self, buf: &mut [f32]) -> Result<usize> {
        let mut written = 0usize;
        while written < buf.len() {
            if self.pending_pos == self.pending.len() {
                if self.finished {
                    break;
                }
                self.decode_next()?;
                continue;
            }
            let n = (buf.len() - written).min(self.pending.len() - self.pending_pos);
            buf[written..written + n]
                .copy_from_slice(&self.pending[self.pending_pos..self.pending_pos + n]);
            self.pending_pos += n;
            written += n;
        }
        Ok(written)
    }
}

fn unsupported_as_invalid(e: SymphoniaError) -> RenderError {
    match e {
        SymphoniaError::Unsupported(what) => RenderError::InvalidFormat(what.to_string()),
        other => other.into(),
    }
}
