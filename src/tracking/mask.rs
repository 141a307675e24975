//! Binary foreground mask.

/// ROI-sized binary grid, `true` = foreground
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl ForegroundMask {
    /// All-background mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width as usize) * (height as usize)],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, f(x, y));
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Foreground test; out-of-bounds coordinates are background
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.bits[(y as usize) * (self.width as usize) + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let index = (y as usize) * (self.width as usize) + x as usize;
        self.bits[index] = value;
    }

    /// Number of foreground pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|b| *b)
    }
}
