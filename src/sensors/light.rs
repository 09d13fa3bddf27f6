//! Moving-average smoother for the LDR channel.
//!
//! Fixed-size ring buffer of the last `window` raw readings. The buffer is
//! primed with the first live reading so the average does not start out
//! biased toward zero (which on this divider reads as "bright").

/// Upper bound on the configurable window (stack-allocated ring).
pub const MAX_WINDOW: usize = 32;

pub struct LightSmoother {
    ring: [u16; MAX_WINDOW],
    window: usize,
    head: usize,
    primed: bool,
}

impl LightSmoother {
    /// `window` is clamped into `1..=MAX_WINDOW`.
    pub fn new(window: usize) -> Self {
        Self {
            ring: [0; MAX_WINDOW],
            window: window.clamp(1, MAX_WINDOW),
            head: 0,
            primed: false,
        }
    }

    /// Push one raw reading and return the integer mean of the window.
    pub fn push(&mut self, raw: u16) -> u16 {
        if !self.primed {
            self.ring[..self.window].fill(raw);
            self.primed = true;
        }

        self.ring[self.head] = raw;
        self.head = (self.head + 1) % self.window;

        self.mean()
    }

    /// Integer mean of all slots; 0 before the first reading.
    pub fn mean(&self) -> u16 {
        if !self.primed {
            return 0;
        }
        let sum: u32 = self.ring[..self.window].iter().map(|&v| v as u32).sum();
        (sum / self.window as u32) as u16
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn is_primed(&self) -> bool {
        self.primed
    }
}
