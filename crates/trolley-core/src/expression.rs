use crate::constants::SMILE_THRESHOLD;

/// One reading from the expression classifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    /// No face in the frame.
    NoFace,
    /// First detected face with its "happy" confidence in `[0, 1]`.
    Face { happy: f32 },
}

impl Sample {
    /// Build a sample from the first detection's happy score, if any.
    ///
    /// `None` means nothing was detected. A detection without a happy key
    /// should pass `Some(None)`, which reads as a score of zero.
    pub fn from_detection(first: Option<Option<f64>>) -> Self {
        match first {
            None => Sample::NoFace,
            Some(happy) => Sample::Face {
                happy: happy.filter(|h| h.is_finite()).unwrap_or(0.0).clamp(0.0, 1.0) as f32,
            },
        }
    }

    #[inline]
    pub fn is_smiling(&self) -> bool {
        matches!(self, Sample::Face { happy } if *happy >= SMILE_THRESHOLD)
    }
}
