//! Byte link to the remote controller (Bluetooth serial module)

use embedded_io::{Read, ReadReady};
use heapless::Vec;

use crate::config::FRAME_CAPACITY;

/// Body of one continuous frame, end marker stripped
pub type Frame = Vec<u8, FRAME_CAPACITY>;

/// Transport the remote decoder reads from
pub trait LinkTransport {
    type Error;

    /// Next byte if one is waiting, `None` when the link is idle
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Block until `marker` arrives and return everything before it
    ///
    /// Bytes beyond [`FRAME_CAPACITY`] are consumed but dropped.
    fn read_frame_until(&mut self, marker: u8) -> Result<Frame, Self::Error>;
}

/// [`LinkTransport`] over any `embedded-io` serial port
pub struct SerialLink<R> {
    port: R,
}

impl<R> SerialLink<R>
where
    R: Read + ReadReady,
{
    pub fn new(port: R) -> Self {
        Self { port }
    }

    pub fn into_inner(self) -> R {
        self.port
    }

    fn next_blocking(&mut self) -> Result<Option<u8>, R::Error> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

impl<R> LinkTransport for SerialLink<R>
where
    R: Read + ReadReady,
{
    type Error = R::Error;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.port.read_ready()? {
            return Ok(None);
        }
        self.next_blocking()
    }

    fn read_frame_until(&mut self, marker: u8) -> Result<Frame, Self::Error> {
        let mut frame = Frame::new();
        let mut dropped = 0usize;
        // A port reporting end-of-stream ends the frame early.
        while let Some(byte) = self.next_blocking()? {
            if byte == marker {
                break;
            }
            if frame.push(byte).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!("Frame overflow, dropped {} bytes", dropped);
        }
        debug!("Received frame of {} bytes", frame.len());
        Ok(frame)
    }
}
