//! Generation loop.
//!
//! [`GroupingRunner`] drives a run through its states:
//!
//! ```text
//! Init ──> Evaluating ──> Generation(1) ──> ... ──> Generation(n) ──> Terminated
//! ```
//!
//! - **Init**: validate the configuration, compute run statistics, create
//!   the random population.
//! - **Evaluating**: score every initial chromosome and seed the best-ever
//!   solution.
//! - **Generation(n)**: crossover selection → PMX → mutation selection →
//!   reciprocal exchange → score offspring → elitist replacement → best-ever
//!   update.
//! - **Terminated**: the generation best reached the target fraction of the
//!   maximum fitness, or `max_generations` ran out.

use super::chromosome::Chromosome;
use super::config::GroupingConfig;
use super::fitness::FitnessEvaluator;
use super::operators::{pmx_crossover, reciprocal_exchange};
use super::population::{score_all, Population, Scored};
use super::result::{GroupAssignment, GroupDetail, GroupingResult, RunSummary};
use super::selection::{select_crossover_pairs, select_mutation_parents};
use crate::error::{GroupingError, Result};
use crate::models::{Individual, RawIndividual};
use crate::random::rng_from_option;
use crate::stats::{preprocess, RunStatistics};
use log::{debug, info};
use rand::Rng;
use std::time::Instant;

/// Per-generation progress report passed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    /// 1-based generation number.
    pub generation: usize,
    /// Best fitness in the population after replacement.
    pub generation_best: usize,
    /// Best fitness seen since initialization.
    pub best_ever: usize,
    /// Offspring produced this generation.
    pub offspring: usize,
    /// Cumulative chromosome evaluations.
    pub evaluations: usize,
    /// `4 * group_count`.
    pub max_fitness: usize,
}

/// Executes grouping runs.
///
/// # Usage
///
/// ```ignore
/// let config = GroupingConfig::new(4).with_seed(42);
/// let result = GroupingRunner::run(&individuals, &config)?;
/// println!("best fitness: {}", result.statistics.best_fitness);
/// ```
pub struct GroupingRunner;

impl GroupingRunner {
    /// Runs the GA on already-normalized individuals.
    ///
    /// # Errors
    /// Configuration and precondition failures are reported before any
    /// population is created.
    pub fn run(individuals: &[Individual], config: &GroupingConfig) -> Result<GroupingResult> {
        Self::run_with_observer(individuals, config, |_| {})
    }

    /// Normalizes raw records with `config.vocabulary`, then runs the GA.
    pub fn run_raw(raw: &[RawIndividual], config: &GroupingConfig) -> Result<GroupingResult> {
        config.validate()?;
        let (individuals, stats) = preprocess(raw, config.group_count, config.vocabulary)?;
        run_prepared(&individuals, &stats, config, |_| {})
    }

    /// Runs the GA, calling `observer` at the end of every generation.
    pub fn run_with_observer<F>(
        individuals: &[Individual],
        config: &GroupingConfig,
        observer: F,
    ) -> Result<GroupingResult>
    where
        F: FnMut(&GenerationStats),
    {
        // Init
        config.validate()?;
        let stats = RunStatistics::compute(individuals, config.group_count)?;
        run_prepared(individuals, &stats, config, observer)
    }
}

/// Runs the generation loop on validated input with precomputed statistics.
fn run_prepared<F>(
    individuals: &[Individual],
    stats: &RunStatistics,
    config: &GroupingConfig,
    mut observer: F,
) -> Result<GroupingResult>
where
    F: FnMut(&GenerationStats),
{
    let evaluator = FitnessEvaluator::new(individuals, stats);
    let mut rng = rng_from_option(config.seed);
    let started = Instant::now();

    info!(
        "grouping {} individuals into {} groups (sizes {:?}), population {}, max {} generations",
        stats.n, stats.group_count, stats.expected_sizes, config.population_size, config.max_generations
    );

    // Evaluating
    let mut population = Population::random(
        stats.n,
        config.population_size,
        &evaluator,
        config.parallel,
        &mut rng,
    );
    let mut best = population
        .best()
        .cloned()
        .ok_or_else(|| GroupingError::InvariantViolation("empty initial population".into()))?;
    let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
    fitness_history.push(best.fitness);
    debug!("initial best fitness {}/{}", best.fitness, stats.max_fitness);

    let target = config.target_fraction * stats.max_fitness as f64;
    let mut generations_run = 0;

    // Generation(n)
    for generation in 1..=config.max_generations {
        generations_run = generation;

        let offspring = breed(&population, config, &mut rng);
        check_permutations(&offspring, stats.n, generation)?;
        let offspring_count = offspring.len();

        let scored = score_all(offspring, &evaluator, config.parallel);
        population.replace(scored, config.population_size);

        let generation_best = population.get(0).fitness;
        if generation_best > best.fitness {
            best = population.get(0).clone();
            debug!("generation {generation}: new best {generation_best}/{}", stats.max_fitness);
        }
        fitness_history.push(best.fitness);

        observer(&GenerationStats {
            generation,
            generation_best,
            best_ever: best.fitness,
            offspring: offspring_count,
            evaluations: evaluator.evaluations(),
            max_fitness: stats.max_fitness,
        });

        if generation_best as f64 >= target {
            info!("target fitness {target:.2} reached at generation {generation}");
            break;
        }
    }

    // Terminated
    let elapsed_seconds = started.elapsed().as_secs_f64();
    info!(
        "finished after {} generations: best fitness {}/{} in {:.3}s",
        generations_run, best.fitness, stats.max_fitness, elapsed_seconds
    );

    Ok(build_result(
        &evaluator,
        &best,
        generations_run,
        elapsed_seconds,
        fitness_history,
    ))
}

/// Runs the GA on normalized individuals. See [`GroupingRunner::run`].
pub fn optimize(individuals: &[Individual], config: &GroupingConfig) -> Result<GroupingResult> {
    GroupingRunner::run(individuals, config)
}

/// Normalizes raw records, then runs the GA. See [`GroupingRunner::run_raw`].
pub fn optimize_raw(raw: &[RawIndividual], config: &GroupingConfig) -> Result<GroupingResult> {
    GroupingRunner::run_raw(raw, config)
}

/// Produces this generation's unscored offspring.
///
/// Draw order is fixed: crossover selection, every PMX, mutation selection,
/// every exchange.
fn breed<R: Rng>(population: &Population, config: &GroupingConfig, rng: &mut R) -> Vec<Chromosome> {
    let pairs = select_crossover_pairs(population.len(), config.crossover_rate, rng);
    let mut offspring = Vec::with_capacity(pairs.len() * 2);
    for (a, b) in pairs {
        let (c1, c2) = pmx_crossover(
            population.get(a).chromosome.genes(),
            population.get(b).chromosome.genes(),
            rng,
        );
        offspring.push(Chromosome::from_genes(c1));
        offspring.push(Chromosome::from_genes(c2));
    }

    for i in select_mutation_parents(population.len(), config.mutation_rate, rng) {
        let child = reciprocal_exchange(population.get(i).chromosome.genes(), rng);
        offspring.push(Chromosome::from_genes(child));
    }
    offspring
}

/// Development-build check that every offspring is still a permutation.
#[cfg(debug_assertions)]
fn check_permutations(offspring: &[Chromosome], n: usize, generation: usize) -> Result<()> {
    match offspring.iter().position(|c| !c.is_permutation(n)) {
        Some(i) => Err(GroupingError::InvariantViolation(format!(
            "offspring {i} of generation {generation} is not a permutation of {n} individuals"
        ))),
        None => Ok(()),
    }
}

#[cfg(not(debug_assertions))]
fn check_permutations(_offspring: &[Chromosome], _n: usize, _generation: usize) -> Result<()> {
    Ok(())
}

fn build_result(
    evaluator: &FitnessEvaluator<'_>,
    best: &Scored,
    generations_run: usize,
    elapsed_seconds: f64,
    fitness_history: Vec<usize>,
) -> GroupingResult {
    let max_fitness = evaluator.stats().max_fitness;
    let breakdown = evaluator.breakdown(&best.chromosome);

    let groups = breakdown
        .iter()
        .map(|(group, _)| GroupAssignment {
            index: group.slot + 1,
            members: group.member_ids(),
        })
        .collect();

    let details = breakdown
        .iter()
        .map(|(group, scores)| GroupDetail {
            index: group.slot + 1,
            members: group.member_ids(),
            member_count: group.len(),
            constraints: *scores,
            score: scores.total(),
        })
        .collect();

    GroupingResult {
        groups,
        statistics: RunSummary {
            best_fitness: best.fitness,
            normalized_fitness: best.fitness as f64 / max_fitness as f64,
            generations_run,
            elapsed_seconds,
            max_fitness,
            evaluations: evaluator.evaluations(),
        },
        details,
        fitness_history,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Precondition;
    use crate::models::Gender;

    /// Ten students: five men, five women, five majors, three tagged.
    fn cohort() -> Vec<Individual> {
        let majors = ["IT", "Law", "Math", "Bio", "Art"];
        (0..10)
            .map(|i| {
                let gender = if i < 5 { Gender::Male } else { Gender::Female };
                Individual::new(i as u64 + 1, gender, majors[i % 5], i % 4 == 0)
            })
            .collect()
    }

    /// Everybody shares one major, so C2 can never hold for groups of 2+.
    fn monoculture(n: usize) -> Vec<Individual> {
        (0..n)
            .map(|i| {
                let gender = if i % 2 == 0 { Gender::Male } else { Gender::Female };
                Individual::new(i as u64, gender, "IT", true)
            })
            .collect()
    }

    fn small_config() -> GroupingConfig {
        GroupingConfig::new(2)
            .with_population_size(4)
            .with_max_generations(5)
            .with_crossover_rate(0.5)
            .with_mutation_rate(0.5)
            .with_target_fraction(1.0)
            .with_seed(42)
    }

    #[test]
    fn test_ten_individuals_two_groups() {
        let inds = cohort();
        let result = GroupingRunner::run(&inds, &small_config()).unwrap();

        assert!(result.statistics.generations_run <= 5);
        assert_eq!(result.groups.len(), 2);
        let total: usize = result.groups.iter().map(|g| g.members.len()).sum();
        assert_eq!(total, 10);
        assert!((0.0..=1.0).contains(&result.statistics.normalized_fitness));
        assert_eq!(result.statistics.max_fitness, 8);

        let mut ids: Vec<u64> = result.groups.iter().flat_map(|g| g.members.clone()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
    }

    #[test]
    fn test_precondition_fails_fast() {
        let inds: Vec<Individual> = cohort().into_iter().take(3).collect();
        let mut generations = 0;
        let err = GroupingRunner::run_with_observer(&inds, &GroupingConfig::new(5), |_| {
            generations += 1
        })
        .unwrap_err();
        assert_eq!(
            err,
            GroupingError::Precondition(Precondition::TooFewIndividuals {
                individuals: 3,
                groups: 5
            })
        );
        assert_eq!(generations, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GroupingConfig {
            population_size: 0,
            ..GroupingConfig::new(2)
        };
        assert!(matches!(
            GroupingRunner::run(&cohort(), &config),
            Err(GroupingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_target_stops_after_one_generation() {
        let config = small_config().with_target_fraction(0.0).with_max_generations(50);
        let result = GroupingRunner::run(&cohort(), &config).unwrap();
        assert_eq!(result.statistics.generations_run, 1);
        assert_eq!(result.fitness_history.len(), 2);
    }

    #[test]
    fn test_unreachable_target_runs_all_generations() {
        let inds = monoculture(12);
        let config = GroupingConfig::new(3)
            .with_population_size(10)
            .with_max_generations(25)
            .with_target_fraction(1.0)
            .with_seed(7);
        let result = GroupingRunner::run(&inds, &config).unwrap();
        assert_eq!(result.statistics.generations_run, 25);
        assert!(!result.is_perfect());
        assert_eq!(result.fitness_history.len(), 26);
    }

    #[test]
    fn test_best_is_monotonic() {
        let config = GroupingConfig::new(3)
            .with_population_size(12)
            .with_max_generations(40)
            .with_seed(11);
        let mut seen = Vec::new();
        let result = GroupingRunner::run_with_observer(&cohort(), &config, |s| seen.push(s.best_ever))
            .unwrap();

        for window in result.fitness_history.windows(2) {
            assert!(window[1] >= window[0], "best decreased: {window:?}");
        }
        for window in seen.windows(2) {
            assert!(window[1] >= window[0]);
        }
        assert_eq!(result.statistics.best_fitness, *result.fitness_history.last().unwrap());
    }

    #[test]
    fn test_evaluations_match_new_chromosomes() {
        let config = GroupingConfig::new(2)
            .with_population_size(10)
            .with_max_generations(15)
            .with_crossover_rate(0.6)
            .with_mutation_rate(0.3)
            .with_seed(3);
        let mut offspring_total = 0;
        let mut last_evaluations = 0;
        let result = GroupingRunner::run_with_observer(&cohort(), &config, |s| {
            offspring_total += s.offspring;
            last_evaluations = s.evaluations;
        })
        .unwrap();

        // 6 crossover children + 3 mutants per generation
        assert_eq!(offspring_total, 9 * result.statistics.generations_run);
        assert_eq!(last_evaluations, 10 + offspring_total);
        assert_eq!(result.statistics.evaluations, last_evaluations);
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = GroupingConfig::new(3)
            .with_population_size(8)
            .with_max_generations(20)
            .with_seed(99);
        let a = GroupingRunner::run(&cohort(), &config).unwrap();
        let b = GroupingRunner::run(&cohort(), &config).unwrap();
        assert_eq!(a.groups, b.groups);
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.statistics.generations_run, b.statistics.generations_run);
    }

    #[test]
    fn test_details_consistent_with_statistics() {
        let config = GroupingConfig::new(3).with_population_size(10).with_seed(5);
        let result = GroupingRunner::run(&cohort(), &config).unwrap();

        assert_eq!(result.details.len(), 3);
        let score_sum: usize = result.details.iter().map(|d| d.score).sum();
        assert_eq!(score_sum, result.statistics.best_fitness);
        let sizes: Vec<usize> = result.details.iter().map(|d| d.member_count).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        for (detail, group) in result.details.iter().zip(&result.groups) {
            assert_eq!(detail.index, group.index);
            assert_eq!(detail.members, group.members);
            assert_eq!(detail.constraints.size_match, 1);
        }
        assert_eq!(result.groups[0].index, 1);
        assert_eq!(result.group_of(result.groups[2].members[0]), Some(3));
        assert_eq!(result.group_of(999), None);
    }

    #[test]
    fn test_no_operators_keeps_initial_population() {
        let config = GroupingConfig::new(2)
            .with_population_size(6)
            .with_max_generations(3)
            .with_crossover_rate(0.0)
            .with_mutation_rate(0.0)
            .with_seed(1);
        let result = GroupingRunner::run(&monoculture(8), &config).unwrap();
        assert_eq!(result.statistics.evaluations, 6);
        assert_eq!(result.statistics.generations_run, 3);
    }

    #[test]
    fn test_single_individual_single_group() {
        let inds = vec![Individual::new(1, Gender::Female, "IT", true)];
        let config = GroupingConfig::new(1)
            .with_population_size(3)
            .with_max_generations(2)
            .with_crossover_rate(1.0)
            .with_mutation_rate(1.0)
            .with_seed(4);
        let result = GroupingRunner::run(&inds, &config).unwrap();
        assert_eq!(result.groups[0].members, vec![1]);
        assert!(result.is_perfect());
        assert_eq!(result.statistics.generations_run, 1);
    }

    #[test]
    fn test_run_raw_normalizes() {
        let raw: Vec<RawIndividual> = (0..6)
            .map(|i| {
                let gender = if i % 2 == 0 { "LK" } else { "perempuan" };
                RawIndividual::new(i, gender, format!("M{i}"), if i == 0 { "Ya" } else { "tidak" })
            })
            .collect();
        let result = optimize_raw(&raw, &GroupingConfig::new(2).with_seed(8)).unwrap();
        assert_eq!(result.groups.len(), 2);
    }

    #[test]
    fn test_run_raw_rejects_unknown_gender() {
        let raw = vec![
            RawIndividual::new(1, "LK", "IT", "Ya"),
            RawIndividual::new(2, "?", "IT", "Ya"),
        ];
        assert!(matches!(
            optimize_raw(&raw, &GroupingConfig::new(1)),
            Err(GroupingError::Validation { id: 2, .. })
        ));
    }

    #[test]
    fn test_run_raw_matches_run_on_normalized_input() {
        let raw: Vec<RawIndividual> = (0..12)
            .map(|i| {
                let gender = if i % 3 == 0 { "P" } else { "L" };
                RawIndividual::new(i, gender, format!("M{}", i % 4), if i % 5 == 0 { "Y" } else { "N" })
            })
            .collect();
        let config = GroupingConfig::new(3).with_max_generations(20).with_seed(13);

        let (individuals, stats) = preprocess(&raw, 3, config.vocabulary).unwrap();
        let from_raw = GroupingRunner::run_raw(&raw, &config).unwrap();
        let direct = GroupingRunner::run(&individuals, &config).unwrap();

        assert_eq!(from_raw.groups, direct.groups);
        assert_eq!(from_raw.fitness_history, direct.fitness_history);
        assert_eq!(from_raw.statistics.max_fitness, stats.max_fitness);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_scoring_matches_sequential() {
        let majors = ["IT", "Law", "Math", "Bio", "Art", "Econ", "Chem"];
        let inds: Vec<Individual> = (0..30)
            .map(|i| {
                let gender = if i % 3 == 0 { Gender::Female } else { Gender::Male };
                Individual::new(i as u64, gender, majors[i % majors.len()], i % 6 == 0)
            })
            .collect();
        let config = GroupingConfig::new(6)
            .with_population_size(20)
            .with_max_generations(30)
            .with_seed(5);

        let sequential = GroupingRunner::run(&inds, &config.clone().with_parallel(false)).unwrap();
        let parallel = GroupingRunner::run(&inds, &config.with_parallel(true)).unwrap();

        assert_eq!(sequential.groups, parallel.groups);
        assert_eq!(sequential.details, parallel.details);
        assert_eq!(sequential.fitness_history, parallel.fitness_history);
        assert_eq!(sequential.statistics.evaluations, parallel.statistics.evaluations);
    }

    #[test]
    fn test_breed_offspring_are_permutations() {
        let inds = cohort();
        let stats = RunStatistics::compute(&inds, 2).unwrap();
        let eval = FitnessEvaluator::new(&inds, &stats);
        let mut rng = crate::random::create_rng(21);
        let pop = Population::random(10, 8, &eval, false, &mut rng);
        let config = GroupingConfig::new(2).with_crossover_rate(1.0).with_mutation_rate(1.0);

        let offspring = breed(&pop, &config, &mut rng);
        assert_eq!(offspring.len(), 16);
        assert!(check_permutations(&offspring, 10, 1).is_ok());
    }

    #[test]
    fn test_check_permutations_flags_duplicates() {
        let broken = vec![Chromosome::from_genes(vec![0, 0, 2])];
        let result = check_permutations(&broken, 3, 4);
        if cfg!(debug_assertions) {
            assert!(matches!(result, Err(GroupingError::InvariantViolation(_))));
        } else {
            assert!(result.is_ok());
        }
    }
}
