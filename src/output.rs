//! Raw PCM output: interleaved 16 bit little endian stereo samples without any header.

use std::io;

use crate::wave::Stereo;

/// Bytes per stereo sample.
pub const FRAME_BYTES: usize = 4;

/// Encode a stereo sample, left channel first.
///
/// # Examples
///
/// ```
/// use tone_txt::output::encode_frame;
/// use tone_txt::wave::Stereo;
///
/// assert_eq!(encode_frame(Stereo::new(1, -2)), [0x01, 0x00, 0xfe, 0xff]);
/// ```
pub fn encode_frame(frame: Stereo<i16>) -> [u8; FRAME_BYTES] {
    let left = frame.left.to_le_bytes();
    let right = frame.right.to_le_bytes();
    [left[0], left[1], right[0], right[1]]
}

/// Writes stereo samples to a byte sink, collecting them in a buffer first.
pub struct PcmWriter<W> {
    sink: W,
    buffer: Vec<u8>,
    capacity: usize,
    frames: u64,
}

impl<W: io::Write> PcmWriter<W> {
    /// 10 ms at 44100 Hz
    pub const DEFAULT_BUFFER_FRAMES: usize = 441;

    pub fn new(sink: W) -> Self {
        Self::with_buffer_frames(sink, Self::DEFAULT_BUFFER_FRAMES)
    }

    pub fn with_buffer_frames(sink: W, frames: usize) -> Self {
        let capacity = frames.max(1) * FRAME_BYTES;
        PcmWriter {
            sink,
            buffer: Vec::with_capacity(capacity),
            capacity,
            frames: 0,
        }
    }

    pub fn write_frame(&mut self, frame: Stereo<i16>) -> io::Result<()> {
        self.buffer.extend_from_slice(&encode_frame(frame));
        self.frames += 1;
        if self.buffer.len() >= self.capacity {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Number of frames written so far, including those still buffered.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Write out everything still buffered and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_buffer()?;
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        self.sink.write_all(&self.buffer)?;
        self.buffer.clear();
        Ok(())
    }
}
