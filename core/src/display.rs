pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// Bytes per row of the byte view returned by [`Display::buffer`].
pub const SCREEN_PITCH: usize = SCREEN_WIDTH * 4;

pub const PIXEL_ON: u32 = 0xFFFFFFFF;
pub const PIXEL_OFF: u32 = 0;

/// Monochrome 64x32 screen.
///
/// Pixels are stored row-major as 32-bit words that are either all bits set
/// ([`PIXEL_ON`]) or all bits clear ([`PIXEL_OFF`]), so the buffer can be
/// streamed into a 32-bit-per-pixel texture as is.
#[derive(Clone)]
pub struct Display {
    pixels: [u32; SCREEN_WIDTH * SCREEN_HEIGHT],
    dirty: bool,
}

impl Display {
    pub fn new() -> Display {
        Display {
            pixels: [PIXEL_OFF; SCREEN_WIDTH * SCREEN_HEIGHT],
            dirty: true,
        }
    }

    /// Pixel words, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels[..]
    }

    /// Pixel words as raw bytes, `SCREEN_PITCH` bytes per row.
    pub fn buffer(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels[..])
    }

    pub fn pitch(&self) -> usize {
        SCREEN_PITCH
    }

    /// True if the screen changed since the last [`Display::mark_clean`].
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::idx(x, y)] == PIXEL_ON
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, on_off: bool) {
        self.pixels[Self::idx(x, y)] = if on_off { PIXEL_ON } else { PIXEL_OFF };
        self.dirty = true;
    }

    /// XOR a lit sprite pixel onto the screen, coordinates wrap around both axes.
    /// Returns true if the pixel was on before, i.e. it was erased.
    pub fn flip_pixel(&mut self, x: usize, y: usize) -> bool {
        let idx = Self::idx(x % SCREEN_WIDTH, y % SCREEN_HEIGHT);
        let was_on = self.pixels[idx] == PIXEL_ON;
        self.pixels[idx] ^= PIXEL_ON;
        self.dirty = true;
        was_on
    }

    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = PIXEL_OFF);
        self.dirty = true;
    }

    fn idx(x: usize, y: usize) -> usize {
        y * SCREEN_WIDTH + x
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_display_is_blank() {
        let display = Display::new();
        assert!(display.pixels().iter().all(|p| *p == PIXEL_OFF));
        assert!(display.dirty());
    }

    #[test]
    fn test_buffer_layout() {
        // Arrange
        let mut display = Display::new();
        display.set_pixel(1, 1, true);

        // Act
        let buffer = display.buffer();

        // Assert: 4 bytes per pixel, row-major
        assert_eq!(buffer.len(), SCREEN_WIDTH * SCREEN_HEIGHT * 4);
        assert_eq!(display.pitch(), 256);
        let offset = SCREEN_PITCH + 4;
        assert_eq!(&buffer[offset..offset + 4], &[0xFF; 4]);
        assert_eq!(&buffer[offset - 4..offset], &[0x00; 4]);
    }

    #[test]
    fn test_flip_pixel_wraps() {
        let mut display = Display::new();

        let erased = display.flip_pixel(SCREEN_WIDTH + 3, SCREEN_HEIGHT + 2);

        assert!(!erased);
        assert!(display.get_pixel(3, 2));
        assert!(display.flip_pixel(3, 2));
        assert!(!display.get_pixel(3, 2));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut display = Display::new();
        display.mark_clean();
        assert!(!display.dirty());

        display.clear();
        assert!(display.dirty());
    }
}
