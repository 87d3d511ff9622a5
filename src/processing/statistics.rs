use serde::Serialize;

/// Count, sum and sum of squares of the values seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    pub count: usize,
    pub sum: f64,
    pub sum_sq: f64,
}

impl RunningStats {
    #[must_use]
    pub fn push(self, x: f64) -> Self {
        Self {
            count: self.count + 1,
            sum: self.sum + x,
            sum_sq: self.sum_sq + x * x,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Standard error of the mean, `sqrt((E[x²] - mean²) / (n - 1))`.
    /// Defined only for two or more values.
    pub fn stderr(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        // Rounding can push the variance slightly below zero for equal values.
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        Some((variance / (n - 1.0)).sqrt())
    }

    pub fn finish(&self) -> BucketStats {
        BucketStats {
            count: self.count,
            mean: self.mean(),
            stderr: self.stderr(),
        }
    }
}

/// Frozen statistics of one (series, label) bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketStats {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<f64>,
}
