//! Continuous and band scales with d3-compatible tick selection.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Step between ticks for `count` ticks over `[start, stop]`. Negative values
/// encode the reciprocal of a fractional step, as in d3's `tickIncrement`.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / (count.max(1) as f64);
    if !(step.is_finite()) || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Evenly spaced "nice" values inside `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !(start.is_finite() && stop.is_finite()) || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi, reverse) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };

    let inc = tick_increment(lo, hi, count);
    if inc == 0.0 {
        return Vec::new();
    }

    let mut values = Vec::new();
    if inc > 0.0 {
        let first = (lo / inc).ceil() as i64;
        let last = (hi / inc).floor() as i64;
        for i in first..=last {
            values.push(i as f64 * inc);
        }
    } else {
        let inv = -inc;
        let first = (lo * inv).ceil() as i64;
        let last = (hi * inv).floor() as i64;
        for i in first..=last {
            values.push(i as f64 / inv);
        }
    }
    if reverse {
        values.reverse();
    }
    values
}

/// Linear map from a numeric domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    pub fn with_domain(&self, domain: (f64, f64)) -> Self {
        Self {
            domain,
            range: self.range,
        }
    }

    /// Extends the domain outward to round tick values.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut previous = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if previous == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }

        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Discrete categories laid out as equal bands across a range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    pub domain: Vec<String>,
    pub range: (f64, f64),
    pub padding_inner: f64,
    pub padding_outer: f64,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding_inner: 0.2,
            padding_outer: 0.1,
        }
    }

    pub fn padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    pub fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let span = self.range.1 - self.range.0;
        span / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    fn start(&self) -> f64 {
        let n = self.domain.len() as f64;
        let span = self.range.1 - self.range.0;
        self.range.0 + (span - self.step() * (n - self.padding_inner)) * 0.5
    }

    pub fn position_of(&self, index: usize) -> f64 {
        self.start() + self.step() * index as f64
    }

    pub fn position(&self, label: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|candidate| candidate == label)
            .map(|index| self.position_of(index))
    }

    /// Index of the band containing `pixel`, if any.
    pub fn index_at(&self, pixel: f64) -> Option<usize> {
        let bandwidth = self.bandwidth();
        (0..self.domain.len()).find(|&index| {
            let start = self.position_of(index);
            pixel >= start && pixel <= start + bandwidth
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_match_d3_for_common_domains() {
        assert_eq!(ticks(0.0, 10.0, 5), [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(2019.0, 2024.0, 5), [2019.0, 2020.0, 2021.0, 2022.0, 2023.0, 2024.0]);
        let fractional = ticks(0.0, 1.0, 5);
        assert_eq!(fractional.len(), 6);
        assert!((fractional[1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn nice_rounds_domain_outward() {
        let scale = LinearScale::new((0.0, 97.3), (0.0, 100.0)).nice(5);
        assert_eq!(scale.domain, (0.0, 100.0));
        let scale = LinearScale::new((3.2, 1234.0), (0.0, 1.0)).nice(10);
        assert_eq!(scale.domain, (0.0, 1300.0));
    }

    #[test]
    fn invert_is_inverse_of_apply() {
        let scale = LinearScale::new((2019.0, 2024.0), (0.0, 500.0));
        assert_eq!(scale.apply(2019.0), 0.0);
        assert_eq!(scale.apply(2024.0), 500.0);
        assert!((scale.invert(scale.apply(2021.5)) - 2021.5).abs() < 1e-9);
    }

    #[test]
    fn band_positions_are_centered_and_hit_testable() {
        let scale = BandScale::new(vec!["a".into(), "b".into()], (0.0, 100.0)).padding(0.0, 0.0);
        assert_eq!(scale.step(), 50.0);
        assert_eq!(scale.position("b"), Some(50.0));
        assert_eq!(scale.index_at(10.0), Some(0));
        assert_eq!(scale.index_at(75.0), Some(1));
        assert_eq!(scale.index_at(120.0), None);
    }
}
