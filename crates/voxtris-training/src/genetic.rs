use std::thread;

use rand::{Rng, distr::{Distribution, StandardUniform}, seq::IndexedRandom as _};
use voxtris_engine::PieceSeed;
use voxtris_evaluator::{EnumeratePlacements, MoveSelector, SearchStrategy, WeightVector};

use crate::{
    simulation::play_training_game,
    stats::FitnessSummary,
    weights_ops::{average_crossover, mutate, slerp_crossover},
};

/// One member of the population: a unit weight vector and the total lines
/// it cleared during its last evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Individual {
    pub weights: WeightVector,
    pub fitness: u64,
}

/// A population of weight vectors, kept sorted by descending fitness
/// after each evaluation. Fitness ties keep their incumbent order.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `size` individuals with uniformly random unit weight
    /// vectors and zero fitness.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let individuals = (0..size)
            .map(|_| Individual {
                weights: random_weights(rng),
                fitness: 0,
            })
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// The fittest individual as of the last evaluation.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    #[must_use]
    pub fn fitness_summary(&self) -> FitnessSummary {
        let values: Vec<u64> = self.individuals.iter().map(|i| i.fitness).collect();
        FitnessSummary::from_values(&values)
    }

    /// Scores every individual by playing `games` seeded games each, one
    /// scoped thread per individual; fitness is the total lines cleared.
    /// A panicked worker scores 0 with a warning. Sorts descending.
    pub fn evaluate<F, R>(
        &mut self,
        template: &F,
        strategy: SearchStrategy,
        games: usize,
        placement_limit: usize,
        rng: &mut R,
    ) where
        F: EnumeratePlacements,
        StandardUniform: Distribution<F::Kind>,
        R: Rng + ?Sized,
    {
        let seeds: Vec<Vec<PieceSeed>> = (0..self.individuals.len())
            .map(|_| (0..games).map(|_| rng.random::<PieceSeed>()).collect())
            .collect();
        let weights: Vec<WeightVector> = self.individuals.iter().map(|i| i.weights).collect();
        let mut fitnesses = vec![0_u64; self.individuals.len()];
        thread::scope(|scope| {
            let handles: Vec<_> = weights
                .iter()
                .zip(&seeds)
                .map(|(weights, game_seeds)| {
                    scope.spawn(move || {
                        let selector = MoveSelector::new(*weights);
                        game_seeds
                            .iter()
                            .map(|&seed| {
                                let report = play_training_game(
                                    template.clone(),
                                    seed,
                                    &selector,
                                    strategy,
                                    placement_limit,
                                );
                                report.cleared_lines as u64
                            })
                            .sum()
                    })
                })
                .collect();
            for (slot, handle) in fitnesses.iter_mut().zip(handles) {
                match handle.join() {
                    Ok(fitness) => *slot = fitness,
                    Err(_) => {
                        eprintln!("warning: evaluation worker panicked, scoring 0");
                    }
                }
            }
        });
        for (individual, fitness) in self.individuals.iter_mut().zip(fitnesses) {
            individual.fitness = fitness;
        }
        self.individuals.sort_by(|a, b| b.fitness.cmp(&a.fitness));
    }

    /// Keeps the top 20% (at least one) and replaces the rest with fresh
    /// random individuals.
    pub fn reseed_keeping_top<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let keep = (self.individuals.len() / 5).max(1);
        for individual in &mut self.individuals[keep..] {
            *individual = Individual {
                weights: random_weights(rng),
                fitness: 0,
            };
        }
    }
}

fn random_weights<R: Rng + ?Sized>(rng: &mut R) -> WeightVector {
    WeightVector::from_array(std::array::from_fn(|_| rng.random_range(-1.0..=1.0))).normalized()
}

/// One generation step: breed offspring from tournament-selected parents
/// and overwrite the worst individuals with them.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver {
    pub tournament_size: usize,
    pub offspring_count: usize,
    /// Probability that a child is bred by spherical interpolation
    /// instead of fitness-weighted averaging.
    pub slerp_probability: f64,
    pub mutation_rate: f64,
    pub mutation_delta: f64,
}

impl PopulationEvolver {
    /// Breeds `offspring_count` children and writes them over the tail of
    /// the (descending-sorted) population with zero fitness.
    pub fn evolve<R: Rng + ?Sized>(&self, population: &mut Population, rng: &mut R) {
        let offspring: Vec<WeightVector> = (0..self.offspring_count)
            .map(|_| {
                let father = self.tournament_select(population, rng);
                let mother = self.tournament_select(population, rng);
                let mut child = if rng.random_bool(self.slerp_probability) {
                    slerp_crossover(&father, &mother, rng)
                } else {
                    average_crossover(&father, &mother)
                };
                if rng.random_bool(self.mutation_rate) {
                    mutate(&mut child, self.mutation_delta, rng);
                }
                child
            })
            .collect();

        let len = population.individuals.len();
        let tail = len.saturating_sub(self.offspring_count);
        for (slot, weights) in population.individuals[tail..].iter_mut().zip(offspring) {
            *slot = Individual {
                weights,
                fitness: 0,
            };
        }
    }

    fn tournament_select<R: Rng + ?Sized>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Individual {
        population
            .individuals
            .choose_multiple(rng, self.tournament_size)
            .max_by_key(|individual| individual.fitness)
            .copied()
            .unwrap_or(Individual {
                weights: WeightVector::default(),
                fitness: 0,
            })
    }
}

/// Knobs of the generation loop. [`TrainerConfig::default`] matches the
/// command line defaults.
#[derive(Debug, Clone, Copy)]
pub struct TrainerConfig {
    pub generations: usize,
    pub population_size: usize,
    /// Games played per individual per generation; fitness sums over them.
    pub games_per_individual: usize,
    pub tournament_size: usize,
    pub offspring_count: usize,
    pub slerp_probability: f64,
    /// Mutation rate decays linearly from `initial` to `final` over the
    /// generations, as does the mutation delta.
    pub initial_mutation_rate: f64,
    pub final_mutation_rate: f64,
    pub initial_mutation_delta: f64,
    pub final_mutation_delta: f64,
    /// Per-game placement budget, stretched from min toward max as the
    /// stagnation streak grows.
    pub min_placement_limit: usize,
    pub max_placement_limit: usize,
    /// Generations without a new best fitness before the population is
    /// partially reseeded.
    pub stagnation_limit: usize,
    pub strategy: SearchStrategy,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            generations: 60,
            population_size: 30,
            games_per_individual: 4,
            tournament_size: 3,
            offspring_count: 15,
            slerp_probability: 0.3,
            initial_mutation_rate: 0.3,
            final_mutation_rate: 0.05,
            initial_mutation_delta: 0.2,
            final_mutation_delta: 0.02,
            min_placement_limit: 200,
            max_placement_limit: 600,
            stagnation_limit: 8,
            strategy: SearchStrategy::TwoPly,
        }
    }
}

/// Snapshot handed to the progress callback after each generation's
/// evaluation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationReport {
    pub generation: usize,
    pub placement_limit: usize,
    pub mutation_rate: f64,
    pub mutation_delta: f64,
    pub best: Individual,
    pub summary: FitnessSummary,
    pub stagnation_streak: usize,
    pub reseeded: bool,
}

/// Drives the evaluate/evolve loop over a board template.
#[derive(Debug, Clone, Copy)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    #[must_use]
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Runs the full training loop and returns the fittest individual
    /// seen across all generations. The callback observes every
    /// generation in order.
    pub fn train<F, R>(
        &self,
        template: &F,
        rng: &mut R,
        mut on_generation: impl FnMut(&GenerationReport),
    ) -> Individual
    where
        F: EnumeratePlacements,
        StandardUniform: Distribution<F::Kind>,
        R: Rng + ?Sized,
    {
        let config = &self.config;
        let mut population = Population::random(config.population_size, rng);
        let mut best = Individual {
            weights: WeightVector::default(),
            fitness: 0,
        };
        let mut streak = 0_usize;

        for generation in 0..config.generations {
            let placement_limit = self.placement_limit(streak);
            population.evaluate(
                template,
                config.strategy,
                config.games_per_individual,
                placement_limit,
                rng,
            );

            let generation_best = population.best().copied().unwrap_or(best);
            if generation_best.fitness > best.fitness {
                best = generation_best;
                streak = 0;
            } else {
                streak += 1;
            }

            let reseeded = streak >= config.stagnation_limit;
            if reseeded {
                population.reseed_keeping_top(rng);
                streak = 0;
            }

            let (mutation_rate, mutation_delta) = self.decayed_mutation(generation);
            on_generation(&GenerationReport {
                generation,
                placement_limit,
                mutation_rate,
                mutation_delta,
                best: generation_best,
                summary: population.fitness_summary(),
                stagnation_streak: streak,
                reseeded,
            });

            if !reseeded && generation + 1 < config.generations {
                let evolver = PopulationEvolver {
                    tournament_size: config.tournament_size,
                    offspring_count: config.offspring_count,
                    slerp_probability: config.slerp_probability,
                    mutation_rate,
                    mutation_delta,
                };
                evolver.evolve(&mut population, rng);
            }
        }
        best
    }

    /// Linear interpolation from the minimum budget toward the maximum as
    /// the stagnation streak approaches the reseed threshold.
    fn placement_limit(&self, streak: usize) -> usize {
        let config = &self.config;
        if config.stagnation_limit == 0 {
            return config.max_placement_limit;
        }
        let range = config
            .max_placement_limit
            .saturating_sub(config.min_placement_limit);
        let streak = streak.min(config.stagnation_limit);
        config.min_placement_limit + range * streak / config.stagnation_limit
    }

    fn decayed_mutation(&self, generation: usize) -> (f64, f64) {
        let config = &self.config;
        let t = if config.generations > 1 {
            #[expect(clippy::cast_precision_loss)]
            let t = generation as f64 / (config.generations - 1) as f64;
            t
        } else {
            0.0
        };
        let lerp = |from: f64, to: f64| from + (to - from) * t;
        (
            lerp(config.initial_mutation_rate, config.final_mutation_rate),
            lerp(config.initial_mutation_delta, config.final_mutation_delta),
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use voxtris_engine::Board2;

    use super::*;

    #[test]
    fn test_random_population_is_normalized() {
        let mut rng = Pcg32::seed_from_u64(1);
        let population = Population::random(16, &mut rng);
        assert_eq!(population.individuals().len(), 16);
        for individual in population.individuals() {
            assert!((individual.weights.norm() - 1.0).abs() < 1e-9);
            assert_eq!(individual.fitness, 0);
        }
    }

    #[test]
    fn test_evaluate_sorts_descending() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut population = Population::random(6, &mut rng);
        population.evaluate(
            &Board2::new(8, 16),
            SearchStrategy::SinglePly,
            1,
            40,
            &mut rng,
        );
        let fitnesses: Vec<u64> = population.individuals().iter().map(|i| i.fitness).collect();
        assert!(fitnesses.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(population.best().unwrap().fitness, fitnesses[0]);
    }

    #[test]
    fn test_evolve_replaces_the_tail() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut population = Population::random(10, &mut rng);
        for (idx, individual) in population.individuals.iter_mut().enumerate() {
            individual.fitness = (10 - idx) as u64;
        }
        let survivors: Vec<Individual> = population.individuals()[..6].to_vec();

        let evolver = PopulationEvolver {
            tournament_size: 3,
            offspring_count: 4,
            slerp_probability: 0.3,
            mutation_rate: 0.5,
            mutation_delta: 0.2,
        };
        evolver.evolve(&mut population, &mut rng);

        assert_eq!(population.individuals().len(), 10);
        assert_eq!(&population.individuals()[..6], &survivors[..]);
        for child in &population.individuals()[6..] {
            assert_eq!(child.fitness, 0);
            assert!((child.weights.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_reseed_keeps_the_top_fifth() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut population = Population::random(10, &mut rng);
        for (idx, individual) in population.individuals.iter_mut().enumerate() {
            individual.fitness = (100 - idx) as u64;
        }
        let elite = population.individuals()[..2].to_vec();

        population.reseed_keeping_top(&mut rng);
        assert_eq!(&population.individuals()[..2], &elite[..]);
        for fresh in &population.individuals()[2..] {
            assert_eq!(fresh.fitness, 0);
        }
    }

    #[test]
    fn test_trainer_runs_every_generation() {
        let mut rng = Pcg32::seed_from_u64(5);
        let config = TrainerConfig {
            generations: 3,
            population_size: 4,
            games_per_individual: 1,
            tournament_size: 2,
            offspring_count: 2,
            min_placement_limit: 5,
            max_placement_limit: 10,
            stagnation_limit: 2,
            strategy: SearchStrategy::SinglePly,
            ..TrainerConfig::default()
        };
        let trainer = Trainer::new(config);

        let mut seen = Vec::new();
        let best = trainer.train(&Board2::new(6, 12), &mut rng, |report| {
            seen.push(report.generation);
        });
        assert_eq!(seen, vec![0, 1, 2]);
        assert!((best.weights.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_placement_limit_stretches_with_stagnation() {
        let trainer = Trainer::new(TrainerConfig {
            min_placement_limit: 200,
            max_placement_limit: 600,
            stagnation_limit: 8,
            ..TrainerConfig::default()
        });
        assert_eq!(trainer.placement_limit(0), 200);
        assert_eq!(trainer.placement_limit(4), 400);
        assert_eq!(trainer.placement_limit(8), 600);
        assert_eq!(trainer.placement_limit(20), 600);
    }
}
