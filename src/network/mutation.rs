use rand::Rng;
use std::f64::consts::PI;

/// Builds a perturbation for `NeuralNetwork::mutate`.
///
/// Each value is nudged by `N(0, 1) * std_dev` with probability `rate` and
/// returned unchanged otherwise.
pub fn gaussian<R: Rng>(rate: f64, std_dev: f64, mut rng: R) -> impl FnMut(f64) -> f64 {
    move |value| {
        if rng.gen::<f64>() < rate {
            value + sample_standard_normal(&mut rng) * std_dev
        } else {
            value
        }
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Both uniforms in (0, 1] to avoid log(0).
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_rate_is_identity() {
        let mut f = gaussian(0.0, 1.0, StdRng::seed_from_u64(3));
        for v in [-1.0, 0.0, 0.25] {
            assert_eq!(f(v), v);
        }
    }

    #[test]
    fn full_rate_perturbs() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut f = gaussian(1.0, 0.5, &mut rng);
        let changed = (0..100).filter(|_| f(1.0) != 1.0).count();
        assert_eq!(changed, 100);
    }

    #[test]
    fn box_muller_samples_are_finite() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(sample_standard_normal(&mut rng).is_finite());
        }
    }
}
