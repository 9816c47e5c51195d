use crate::engines::generation::individual::{Individual, ParameterBounds, ScoredIndividual};
use rand::Rng;

/// Restore `long > short` after any operator.
///
/// First raises long to `short + 1` (capped at `max_long`); if the cap still
/// leaves long <= short, lowers short to `max_long - 1`. Validated bounds
/// guarantee `max_long - 1 >= min_short`, so the result is always valid.
pub fn repair(individual: Individual, bounds: &ParameterBounds) -> Individual {
    let Individual {
        mut short_period,
        mut long_period,
    } = individual;

    if long_period <= short_period {
        long_period = short_period.saturating_add(1).min(bounds.max_long);
        if long_period <= short_period {
            short_period = long_period - 1;
        }
    }

    Individual {
        short_period,
        long_period,
    }
}

/// Draw both windows uniformly from their ranges, then repair.
pub fn create_individual<R: Rng>(bounds: &ParameterBounds, rng: &mut R) -> Individual {
    let short_period = rng.gen_range(bounds.min_short..=bounds.max_short);
    let long_period = rng.gen_range(bounds.min_long..=bounds.max_long);
    repair(Individual::new(short_period, long_period), bounds)
}

pub fn random_population<R: Rng>(size: usize, bounds: &ParameterBounds, rng: &mut R) -> Vec<Individual> {
    (0..size).map(|_| create_individual(bounds, rng)).collect()
}

/// Uniform gene-wise crossover: short and long each come from either
/// parent, chosen independently.
///
/// The raw child may break `long > short`; callers repair it.
pub fn crossover<R: Rng>(parent1: &Individual, parent2: &Individual, rng: &mut R) -> Individual {
    let short_period = if rng.gen_bool(0.5) {
        parent1.short_period
    } else {
        parent2.short_period
    };
    let long_period = if rng.gen_bool(0.5) {
        parent1.long_period
    } else {
        parent2.long_period
    };
    Individual::new(short_period, long_period)
}

/// Step each window by +/-1 with probability `mutation_rate`, clamped to
/// its range.
pub fn mutate<R: Rng>(
    individual: &mut Individual,
    bounds: &ParameterBounds,
    mutation_rate: f64,
    rng: &mut R,
) {
    if rng.gen::<f64>() < mutation_rate {
        individual.short_period = bounds.clamp_short(step(individual.short_period, rng));
    }
    if rng.gen::<f64>() < mutation_rate {
        individual.long_period = bounds.clamp_long(step(individual.long_period, rng));
    }
}

fn step<R: Rng>(period: usize, rng: &mut R) -> usize {
    if rng.gen_bool(0.5) {
        period.saturating_add(1)
    } else {
        period.saturating_sub(1)
    }
}

/// Crossover then mutation, repairing after each.
pub fn breed<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    bounds: &ParameterBounds,
    mutation_rate: f64,
    rng: &mut R,
) -> Individual {
    let mut child = repair(crossover(parent1, parent2, rng), bounds);
    mutate(&mut child, bounds, mutation_rate, rng);
    repair(child, bounds)
}

/// Truncation selection: the fittest `max(1, population / 2)` individuals.
///
/// Sorting is stable, so equal fitness keeps population order.
pub fn truncation_selection(scored: &[ScoredIndividual]) -> Vec<Individual> {
    let mut sorted = scored.to_vec();
    sorted.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(std::cmp::Ordering::Equal));

    let keep = (scored.len() / 2).max(1);
    sorted.into_iter().take(keep).map(|s| s.individual).collect()
}

/// Uniform pick with replacement.
pub fn random_parent<'a, R: Rng>(survivors: &'a [Individual], rng: &mut R) -> &'a Individual {
    &survivors[rng.gen_range(0..survivors.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bounds() -> ParameterBounds {
        ParameterBounds::new(2, 10, 5, 20).unwrap()
    }

    #[test]
    fn test_repair_raises_long() {
        let fixed = repair(Individual::new(8, 6), &bounds());
        assert_eq!(fixed, Individual::new(8, 9));
    }

    #[test]
    fn test_repair_lowers_short_when_long_capped() {
        let b = ParameterBounds::new(2, 30, 5, 20).unwrap();
        let fixed = repair(Individual::new(25, 20), &b);
        assert_eq!(fixed, Individual::new(19, 20));
    }

    #[test]
    fn test_repair_leaves_valid_untouched() {
        let ind = Individual::new(3, 12);
        assert_eq!(repair(ind, &bounds()), ind);
    }

    #[test]
    fn test_create_individual_within_bounds() {
        let b = bounds();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let ind = create_individual(&b, &mut rng);
            assert!(ind.is_valid());
            assert!((b.min_short..=b.max_short).contains(&ind.short_period));
            assert!((b.min_long..=b.max_long).contains(&ind.long_period));
        }
    }

    #[test]
    fn test_crossover_takes_genes_from_parents() {
        let p1 = Individual::new(2, 15);
        let p2 = Individual::new(9, 6);
        let mut rng = StdRng::seed_from_u64(1);
        let mut saw_mixed = false;
        for _ in 0..200 {
            let child = crossover(&p1, &p2, &mut rng);
            assert!([2, 9].contains(&child.short_period));
            assert!([15, 6].contains(&child.long_period));
            if child == Individual::new(9, 15) || child == Individual::new(2, 6) {
                saw_mixed = true;
            }
        }
        assert!(saw_mixed);
    }

    #[test]
    fn test_mutate_zero_rate_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ind = Individual::new(4, 12);
        for _ in 0..100 {
            mutate(&mut ind, &bounds(), 0.0, &mut rng);
        }
        assert_eq!(ind, Individual::new(4, 12));
    }

    #[test]
    fn test_mutate_full_rate_steps_by_one() {
        let b = bounds();
        let mut rng = StdRng::seed_from_u64(11);
        let (mut short_up, mut short_down, mut long_up, mut long_down) = (0, 0, 0, 0);
        for _ in 0..200 {
            let before = Individual::new(5, 12);
            let mut after = before;
            mutate(&mut after, &b, 1.0, &mut rng);
            assert_eq!(after.short_period.abs_diff(before.short_period), 1);
            assert_eq!(after.long_period.abs_diff(before.long_period), 1);
            if after.short_period > before.short_period {
                short_up += 1;
            } else {
                short_down += 1;
            }
            if after.long_period > before.long_period {
                long_up += 1;
            } else {
                long_down += 1;
            }
        }
        // Both directions are equally likely; 200 fair draws stay well
        // inside these margins.
        for count in [short_up, short_down, long_up, long_down] {
            assert!((50..=150).contains(&count), "direction count {}", count);
        }
    }

    #[test]
    fn test_operators_saturate_at_usize_max() {
        let b = ParameterBounds::new(2, usize::MAX, 5, 10).unwrap();
        let fixed = repair(Individual::new(usize::MAX, 7), &b);
        assert_eq!(fixed, Individual::new(9, 10));

        let wide = ParameterBounds::new(1, usize::MAX, 1, usize::MAX).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let mut ind = Individual::new(usize::MAX - 1, usize::MAX);
            mutate(&mut ind, &wide, 1.0, &mut rng);
            let ind = repair(ind, &wide);
            assert!(ind.is_valid());
            let child = breed(&ind, &Individual::new(usize::MAX, usize::MAX), &wide, 1.0, &mut rng);
            assert!(child.is_valid());
        }
    }

    #[test]
    fn test_mutate_clamps_to_bounds() {
        let b = ParameterBounds::new(2, 2, 5, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let mut ind = Individual::new(2, 5);
            mutate(&mut ind, &b, 1.0, &mut rng);
            assert_eq!(ind, Individual::new(2, 5));
        }
    }

    #[test]
    fn test_breed_always_valid() {
        let b = bounds();
        let mut rng = StdRng::seed_from_u64(99);
        // Gene mixing here yields (10, 5) half the time before repair.
        let p1 = Individual::new(2, 5);
        let p2 = Individual::new(10, 20);
        for _ in 0..1000 {
            assert!(breed(&p1, &p2, &b, 0.5, &mut rng).is_valid());
        }
    }

    #[test]
    fn test_truncation_selection_keeps_top_half() {
        let scored: Vec<ScoredIndividual> = [(2, 5, 10.0), (3, 6, 30.0), (4, 7, 20.0), (5, 8, 30.0)]
            .into_iter()
            .map(|(s, l, f)| ScoredIndividual {
                individual: Individual::new(s, l),
                fitness: f,
            })
            .collect();

        let survivors = truncation_selection(&scored);
        assert_eq!(survivors, vec![Individual::new(3, 6), Individual::new(5, 8)]);
    }

    #[test]
    fn test_truncation_selection_single_individual() {
        let scored = vec![ScoredIndividual {
            individual: Individual::new(2, 5),
            fitness: 1.0,
        }];
        assert_eq!(truncation_selection(&scored), vec![Individual::new(2, 5)]);
    }
}
