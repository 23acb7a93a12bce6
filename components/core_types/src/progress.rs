//! Progress payloads.
//!
//! Progress is advisory: it never settles a promise. The payload is a
//! normalized fraction with an optional human-readable note.

/// A progress notification.
///
/// The fraction is always kept inside `[0, 1]`; out-of-range inputs are
/// clamped and NaN is treated as zero.
///
/// # Examples
///
/// ```
/// use core_types::Progress;
///
/// assert_eq!(Progress::new(1.5).fraction(), 1.0);
/// assert_eq!(Progress::ratio(2, 3).fraction(), 2.0 / 3.0);
///
/// let p = Progress::new(0.5).with_message("loading");
/// assert_eq!(p.message(), Some("loading"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Progress {
    fraction: f64,
    message: Option<String>,
}

impl Progress {
    /// Creates a progress payload from a fraction.
    pub fn new(fraction: f64) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Self {
            fraction,
            message: None,
        }
    }

    /// Creates a progress payload of `done / total`.
    ///
    /// A zero `total` counts as complete.
    pub fn ratio(done: usize, total: usize) -> Self {
        if total == 0 {
            return Self::new(1.0);
        }
        Self::new(done as f64 / total as f64)
    }

    /// Attaches a note to this payload.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The completed fraction, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// The attached note, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<f64> for Progress {
    fn from(fraction: f64) -> Self {
        Progress::new(fraction)
    }
}
