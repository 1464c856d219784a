//! Output buffer for frames drawn to the terminal.

use std::fs::File;

/// Moves the terminal cursor to the top-left corner.
pub const CURSOR_HOME: &[u8; 6] = b"\x1b[0;0H";

/// Reusable frame buffer with a fixed cursor-reset prefix.
///
/// The prefix is written once at construction; each frame only overwrites
/// the payload area behind it, so a whole frame goes out in a single write.
#[derive(Clone, Debug)]
pub struct RenderBuffer {
    bytes: Vec<u8>,
}

impl RenderBuffer {
    /// Allocate a buffer holding the prefix plus `payload_len` bytes.
    pub fn new(payload_len: usize) -> Self {
        let mut bytes = Vec::with_capacity(CURSOR_HOME.len() + payload_len);
        bytes.extend_from_slice(CURSOR_HOME);
        bytes.resize(CURSOR_HOME.len() + payload_len, 0);
        Self { bytes }
    }

    /// Length of the fixed prefix.
    #[inline]
    pub fn prefix_len(&self) -> usize {
        CURSOR_HOME.len()
    }

    /// Capacity of the payload area.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.bytes.len() - self.prefix_len()
    }

    /// Mutable payload area, to be filled from the source.
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let start = self.prefix_len();
        &mut self.bytes[start..]
    }

    /// Prefix followed by the first `filled` payload bytes.
    ///
    /// `filled` is clamped to the payload capacity.
    #[inline]
    pub fn frame(&self, filled: usize) -> &[u8] {
        let end = self.prefix_len() + filled.min(self.payload_len());
        &self.bytes[..end]
    }
}

/// Unbuffered handle to standard output.
///
/// `std::io::Stdout` is line buffered, which splits a frame that does not end
/// in a line feed into two writes. Writing through this handle sends each
/// frame with a single write call.
pub fn unbuffered_stdout() -> std::io::Result<File> {
    #[cfg(unix)]
    let owned = {
        use std::os::fd::AsFd;
        std::io::stdout().as_fd().try_clone_to_owned()?
    };
    #[cfg(windows)]
    let owned = {
        use std::os::windows::io::AsHandle;
        std::io::stdout().as_handle().try_clone_to_owned()?
    };
    Ok(File::from(owned))
}
