use std::fmt;
use std::str::FromStr;

/// Distribution binning: `nbins` equal bins over `[low, high]`.
/// `low == high` means the range comes from the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binning {
    pub nbins: usize,
    pub low: f64,
    pub high: f64,
}

impl Default for Binning {
    fn default() -> Self {
        Self {
            nbins: 25,
            low: 0.0,
            high: 0.0,
        }
    }
}

impl fmt::Display for Binning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.nbins, self.low, self.high)
    }
}

impl FromStr for Binning {
    type Err = String;

    /// Parses `nbins:low:high`, e.g. `25:0:0` or `50:0:2.5e3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let [nbins, low, high] = parts.as_slice() else {
            return Err(format!("expected nbins:low:high, got `{s}`"));
        };
        let nbins: usize = nbins
            .parse()
            .map_err(|e| format!("bad bin count `{nbins}`: {e}"))?;
        let low: f64 = low.parse().map_err(|e| format!("bad low edge `{low}`: {e}"))?;
        let high: f64 = high
            .parse()
            .map_err(|e| format!("bad high edge `{high}`: {e}"))?;
        if nbins == 0 {
            return Err("bin count must be at least 1".to_string());
        }
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(format!("bad range {low}..{high}"));
        }
        Ok(Self { nbins, low, high })
    }
}

impl Binning {
    /// Concrete `[low, high)` range for `samples`.
    pub fn range_for(&self, samples: &[f64]) -> (f64, f64) {
        if self.low < self.high {
            return (self.low, self.high);
        }
        let finite = samples.iter().copied().filter(|v| v.is_finite());
        let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() {
            (0.0, 1.0)
        } else if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        }
    }
}

/// Binned counts of one bucket's samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub low: f64,
    pub high: f64,
    pub counts: Vec<usize>,
    pub underflow: usize,
    pub overflow: usize,
}

impl Histogram {
    pub fn fill(samples: &[f64], binning: &Binning) -> Self {
        let (low, high) = binning.range_for(samples);
        let nbins = binning.nbins.max(1);
        let width = (high - low) / nbins as f64;
        let mut hist = Histogram {
            low,
            high,
            counts: vec![0; nbins],
            underflow: 0,
            overflow: 0,
        };

        for &v in samples {
            if v < low {
                hist.underflow += 1;
            } else if v > high || v.is_nan() {
                hist.overflow += 1;
            } else {
                // Upper edge belongs to the last bin.
                let bin = (((v - low) / width) as usize).min(nbins - 1);
                hist.counts[bin] += 1;
            }
        }
        hist
    }

    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.counts.len() as f64
    }

    /// `(low_edge, high_edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        let w = self.bin_width();
        self.counts
            .iter()
            .enumerate()
            .map(move |(i, &c)| (self.low + w * i as f64, self.low + w * (i + 1) as f64, c))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn entries(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.underflow + self.overflow
    }
}
