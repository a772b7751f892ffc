//! Linear domain → range mapping used by every chart axis.

/// Maps a numeric domain onto a screen range.
///
/// The range may be inverted (`range.0 > range.1`), which is how the y axis
/// grows upward on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Project a domain value. A collapsed domain maps to the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Range value back to the domain.
    pub fn invert(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (value - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Round tick values covering the domain, roughly `target` of them.
    pub fn ticks(&self, target: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let span = hi - lo;
        if span <= 0.0 || !span.is_finite() || target == 0 {
            return vec![lo];
        }

        let step = nice_step(span, target);
        let mut ticks = Vec::new();
        let mut value = (lo / step).ceil() * step;
        // Slack for accumulated float error at the top end
        while value <= hi + step * 1e-9 {
            ticks.push(value);
            value += step;
        }
        ticks
    }
}

/// Tick step of 1, 2 or 5 times a power of ten.
pub fn nice_step(range: f64, target_steps: usize) -> f64 {
    let raw_step = range / target_steps as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}
