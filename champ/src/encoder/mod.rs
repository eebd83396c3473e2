//! External image encoder
//!
//! The encoder is a separate program that reads a palette and pixel data on
//! stdin and writes the encoded file to stdout. Two kinds of sessions exist:
//!
//! - [`encode_still_image`]: one short-lived process per histogram
//! - [`AnimationRecorder`]: one process held open for the whole trace

pub mod framing;
pub mod process;

pub use framing::{AnimationFrame, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use process::EncoderProcess;

use std::time::Duration;

use crate::domain::{EncoderError, Rgb};
use crate::render::Image;

/// Encode one still image and return the encoded bytes
///
/// # Errors
/// Any [`EncoderError`] from starting, feeding or finishing the encoder.
pub async fn encode_still_image(
    command: &str,
    image: &Image,
    timeout: Duration,
) -> Result<Vec<u8>, EncoderError> {
    let mut encoder = EncoderProcess::spawn(command, &framing::still_image_args(image), timeout)?;
    framing::write_still_image(encoder.input(), image).await.map_err(EncoderError::WriteFailed)?;
    encoder.finish().await
}

/// Streams screen frames into a long-lived animation encoder
pub struct AnimationRecorder {
    encoder: EncoderProcess,
    frames: usize,
}

impl AnimationRecorder {
    /// Start the encoder and send the black/white palette
    ///
    /// # Errors
    /// `SpawnFailed` or `WriteFailed`.
    pub async fn start(command: &str, timeout: Duration) -> Result<Self, EncoderError> {
        let mut encoder = EncoderProcess::spawn(command, &framing::animation_args(), timeout)?;
        framing::write_animation_header(encoder.input(), Rgb::BLACK, Rgb::WHITE)
            .await
            .map_err(EncoderError::WriteFailed)?;
        Ok(Self { encoder, frames: 0 })
    }

    /// Append one frame
    ///
    /// # Errors
    /// `WriteFailed` if the encoder went away.
    pub async fn send(&mut self, frame: &AnimationFrame) -> Result<(), EncoderError> {
        framing::write_animation_frame(self.encoder.input(), frame)
            .await
            .map_err(EncoderError::WriteFailed)?;
        self.frames += 1;
        Ok(())
    }

    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Close the stream and return the encoded animation
    ///
    /// # Errors
    /// See [`EncoderProcess::finish`].
    pub async fn finish(self) -> Result<Vec<u8>, EncoderError> {
        self.encoder.finish().await
    }
}
