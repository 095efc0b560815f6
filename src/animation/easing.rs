/// Interpolation curves for pose transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Cubic ease-in/ease-out, `3t^2 - 2t^3`
    #[default]
    SmoothStep,
    /// Quintic ease-in/ease-out with zero second derivative at both ends
    SmootherStep,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` onto the curve. Input is clamped.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::SmootherStep => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_pin_endpoints() {
        for easing in [Easing::Linear, Easing::SmoothStep, Easing::SmootherStep] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.0), 1.0);
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn smoothstep_eases_in_and_out() {
        let e = Easing::SmoothStep;
        // slower than linear near both ends
        assert!(e.apply(0.1) < 0.1);
        assert!(e.apply(0.9) > 0.9);
        // monotonic
        let mut last = 0.0;
        for i in 1..=20 {
            let v = e.apply(i as f32 / 20.0);
            assert!(v >= last);
            last = v;
        }
    }
}
