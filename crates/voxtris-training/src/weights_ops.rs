use rand::Rng;
use rand_distr::{Distribution as _, Normal};
use voxtris_evaluator::WeightVector;

use crate::genetic::Individual;

/// Angles below this are treated as collinear and fall back to averaging.
const SLERP_EPS: f64 = 1e-6;

/// Jitter half-width applied to the slerp interpolation parameter.
const SLERP_JITTER: f64 = 0.1;

/// Fitness-weighted average of two parents, normalized. Two zero-fitness
/// parents average evenly.
pub(crate) fn average_crossover(a: &Individual, b: &Individual) -> WeightVector {
    let total = a.fitness + b.fitness;
    let (wa, wb) = if total == 0 {
        (0.5, 0.5)
    } else {
        #[expect(clippy::cast_precision_loss)]
        let split = (a.fitness as f64 / total as f64, b.fitness as f64 / total as f64);
        split
    };
    let mixed: [f64; 4] = std::array::from_fn(|i| {
        wa * a.weights.as_array()[i] + wb * b.weights.as_array()[i]
    });
    WeightVector::from_array(mixed).normalized()
}

/// Spherical interpolation between the parents' unit vectors, with the
/// interpolation parameter biased toward the fitter parent and jittered.
/// Near-collinear parents fall back to [`average_crossover`].
pub(crate) fn slerp_crossover<R: Rng + ?Sized>(
    a: &Individual,
    b: &Individual,
    rng: &mut R,
) -> WeightVector {
    let from = a.weights.normalized();
    let to = b.weights.normalized();
    let angle = from.dot(to).clamp(-1.0, 1.0).acos();
    if angle.sin() < SLERP_EPS {
        return average_crossover(a, b);
    }

    let total = a.fitness + b.fitness;
    let toward_b = if total == 0 {
        0.5
    } else {
        #[expect(clippy::cast_precision_loss)]
        let share = b.fitness as f64 / total as f64;
        share
    };
    let t = (toward_b + rng.random_range(-SLERP_JITTER..=SLERP_JITTER)).clamp(0.0, 1.0);

    let (fa, fb) = (
        (((1.0 - t) * angle).sin()) / angle.sin(),
        ((t * angle).sin()) / angle.sin(),
    );
    let mixed: [f64; 4] =
        std::array::from_fn(|i| fa * from.as_array()[i] + fb * to.as_array()[i]);
    WeightVector::from_array(mixed).normalized()
}

/// Perturbs one uniformly chosen component with Gaussian noise clamped to
/// `±delta`, then renormalizes.
pub(crate) fn mutate<R: Rng + ?Sized>(weights: &mut WeightVector, delta: f64, rng: &mut R) {
    let Ok(noise) = Normal::new(0.0, delta / 2.0) else {
        return;
    };
    let mut components = weights.as_array();
    let idx = rng.random_range(0..components.len());
    components[idx] += noise.sample(rng).clamp(-delta, delta);
    *weights = WeightVector::from_array(components).normalized();
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn individual(weights: [f64; 4], fitness: u64) -> Individual {
        Individual {
            weights: WeightVector::from_array(weights).normalized(),
            fitness,
        }
    }

    #[test]
    fn test_average_crossover_weighs_by_fitness() {
        let a = individual([1.0, 0.0, 0.0, 0.0], 30);
        let b = individual([0.0, 1.0, 0.0, 0.0], 10);
        let child = average_crossover(&a, &b);
        assert!((child.norm() - 1.0).abs() < 1e-12);
        // 3:1 blend, then normalized.
        assert!(child.height > child.lines);
        assert!(child.lines > 0.0);
    }

    #[test]
    fn test_average_crossover_of_zero_fitness_parents() {
        let a = individual([1.0, 0.0, 0.0, 0.0], 0);
        let b = individual([0.0, 1.0, 0.0, 0.0], 0);
        let child = average_crossover(&a, &b);
        assert!((child.height - child.lines).abs() < 1e-12);
    }

    #[test]
    fn test_slerp_stays_on_unit_sphere() {
        let mut rng = Pcg32::seed_from_u64(5);
        let a = individual([1.0, 0.0, 0.0, 0.0], 10);
        let b = individual([0.0, 0.0, 1.0, 0.0], 20);
        for _ in 0..32 {
            let child = slerp_crossover(&a, &b, &mut rng);
            assert!((child.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_slerp_of_collinear_parents_falls_back() {
        let mut rng = Pcg32::seed_from_u64(5);
        let a = individual([0.0, 1.0, 0.0, 0.0], 10);
        let b = individual([0.0, 1.0, 0.0, 0.0], 20);
        let child = slerp_crossover(&a, &b, &mut rng);
        assert!((child.lines - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mutation_changes_one_component_and_renormalizes() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..32 {
            let original = WeightVector::default();
            let mut mutated = original;
            mutate(&mut mutated, 0.2, &mut rng);
            assert!((mutated.norm() - 1.0).abs() < 1e-9);

            let changed = original
                .as_array()
                .iter()
                .zip(mutated.as_array())
                .filter(|(a, b)| (**a - *b).abs() > 1e-15)
                .count();
            // renormalization shifts every component unless the noise
            // sample was exactly zero
            assert!(changed > 0 || mutated == original);
        }
    }
}
