//! Click feedback played on every sector crossing
//!
//! The click is either a WAV file (decoded with hound) or a short synthesized
//! tick. Each play picks a random pitch so fast crossings don't sound like a
//! machine gun.

use rand::Rng;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Source};
use std::path::Path;

const CLICK_SAMPLE_RATE: u32 = 44_100;

/// Length of the synthesized click in seconds
const CLICK_LENGTH: f32 = 0.025;

const CLICK_FREQ: f32 = 1_800.0;

/// Mono samples plus their rate
#[derive(Debug, Clone)]
pub struct ClickSound {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl ClickSound {
    /// Short sine burst with an exponential decay
    pub fn synthesized() -> Self {
        let n = (CLICK_SAMPLE_RATE as f32 * CLICK_LENGTH) as usize;
        let samples = (0..n)
            .map(|i| {
                let t = i as f32 / CLICK_SAMPLE_RATE as f32;
                let envelope = (-t * 220.0).exp();
                (2.0 * std::f32::consts::PI * CLICK_FREQ * t).sin() * envelope
            })
            .collect();

        Self {
            samples,
            sample_rate: CLICK_SAMPLE_RATE,
        }
    }

    /// Load a WAV file, folding stereo to mono
    pub fn from_wav(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_wav_bytes(&data)
    }

    /// Decode WAV bytes, folding stereo to mono
    pub fn from_wav_bytes(data: &[u8]) -> anyhow::Result<Self> {
        let reader = hound::WavReader::new(std::io::Cursor::new(data))?;
        Self::from_reader(reader)
    }

    fn from_reader<R: std::io::Read>(reader: hound::WavReader<R>) -> anyhow::Result<Self> {
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.into_samples::<f32>().filter_map(|s| s.ok()).collect()
            }
            hound::SampleFormat::Int => {
                let bits = spec.bits_per_sample;
                let max_val = (1i64 << (bits - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .filter_map(|s| s.ok())
                    .map(|s| s as f32 / max_val)
                    .collect()
            }
        };

        let channels = spec.channels.max(1) as usize;
        let mono: Vec<f32> = if channels > 1 {
            samples
                .chunks(channels)
                .map(|c| c.iter().sum::<f32>() / c.len() as f32)
                .collect()
        } else {
            samples
        };

        if mono.is_empty() {
            anyhow::bail!("WAV file has no samples");
        }

        Ok(Self {
            samples: mono,
            sample_rate: spec.sample_rate,
        })
    }
}

/// Random pitch factor in `[1 - range, 1 + range]`
pub fn random_pitch<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    let min_pitch = 1.0 - range;
    let max_pitch = 1.0 + range;
    min_pitch + rng.gen::<f32>() * (max_pitch - min_pitch)
}

/// Plays clicks on the default output device
pub struct ClickPlayer {
    // Dropping the stream stops all output
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sound: ClickSound,
    volume: f32,
    pitch_range: f32,
}

impl ClickPlayer {
    pub fn new(sound: ClickSound, volume: f32, pitch_range: f32) -> anyhow::Result<Self> {
        let (stream, handle) = OutputStream::try_default()?;
        tracing::info!(
            "Audio output opened ({} click samples at {} Hz)",
            sound.samples.len(),
            sound.sample_rate
        );

        Ok(Self {
            _stream: stream,
            handle,
            sound,
            volume,
            pitch_range,
        })
    }

    /// Play one click; overlapping clicks are mixed
    pub fn click(&self) {
        let pitch = random_pitch(&mut rand::thread_rng(), self.pitch_range);
        let source = SamplesBuffer::new(1, self.sound.sample_rate, self.sound.samples.clone())
            .speed(pitch)
            .amplify(self.volume);

        if let Err(e) = self.handle.play_raw(source.convert_samples()) {
            tracing::warn!("Failed to play click: {}", e);
        }
    }
}
