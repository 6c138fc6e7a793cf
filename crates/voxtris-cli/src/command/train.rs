use std::path::PathBuf;

use rand::{Rng, SeedableRng as _, distr::{Distribution, StandardUniform}};
use rand_pcg::Pcg32;
use voxtris_engine::{Board2, Board3, PieceSeed};
use voxtris_evaluator::{EnumeratePlacements, SearchStrategy};
use voxtris_training::{Individual, Trainer, TrainerConfig};

use crate::{
    command::Variant,
    model::TrainedModel,
    util::{Lenient, Output, resolve_dim},
};

#[derive(Debug, clap::Args)]
pub(crate) struct Args {
    /// Board variant to train for: "2d" or "3d".
    #[arg(long, default_value = "2d")]
    variant: Lenient<Variant>,
    /// Generations to evolve.
    #[arg(long, default_value = "60")]
    generations: Lenient<usize>,
    /// Population size.
    #[arg(long, default_value = "30")]
    population: Lenient<usize>,
    /// Games played per individual per generation.
    #[arg(long, default_value = "4")]
    games: Lenient<usize>,
    /// Individuals per selection tournament.
    #[arg(long, default_value = "3")]
    tournament: Lenient<usize>,
    /// Board width. Defaults to 10 (2d) or 5 (3d).
    #[arg(long)]
    width: Option<Lenient<usize>>,
    /// Board height along the gravity axis. Defaults to 20 (2d) or 12 (3d).
    #[arg(long)]
    height: Option<Lenient<usize>>,
    /// Board depth (3d only). Defaults to 5.
    #[arg(long)]
    depth: Option<Lenient<usize>>,
    /// Training RNG seed (32 hex digits). Random when omitted.
    #[arg(long)]
    seed: Option<Lenient<PieceSeed>>,
    /// Model name recorded in the JSON export.
    #[arg(long, default_value = "voxtris")]
    name: String,
    /// Write the result to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Export the full JSON model instead of the plain weight text.
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(args: &Args) -> anyhow::Result<()> {
    let variant = args.variant.clone().resolve("variant", Variant::TwoD);
    let generations = args.generations.clone().resolve("generations", 60);
    let population = args.population.clone().resolve("population", 30);
    let config = TrainerConfig {
        generations,
        population_size: population,
        games_per_individual: args.games.clone().resolve("games", 4),
        tournament_size: args.tournament.clone().resolve("tournament", 3),
        offspring_count: (population / 2).max(1),
        // two-ply search separates 2D individuals faster; the wider 3D
        // branching factor makes one ply the better budget spend there
        strategy: match variant {
            Variant::TwoD => SearchStrategy::TwoPly,
            Variant::ThreeD => SearchStrategy::SinglePly,
        },
        ..TrainerConfig::default()
    };
    let trainer = Trainer::new(config);
    let seed = args
        .seed
        .clone()
        .map_or_else(rand::random, |s| s.resolve_with("seed", rand::random));
    eprintln!("training seed: {seed}");
    let mut rng = Pcg32::from_seed(seed.into_bytes());

    let best = match variant {
        Variant::TwoD => {
            let template = Board2::new(
                resolve_dim(args.width.as_ref(), "width", 10),
                resolve_dim(args.height.as_ref(), "height", 20),
            );
            train_on(&trainer, &template, &mut rng)
        }
        Variant::ThreeD => {
            let template = Board3::new(
                resolve_dim(args.width.as_ref(), "width", 5),
                resolve_dim(args.height.as_ref(), "height", 12),
                resolve_dim(args.depth.as_ref(), "depth", 5),
            );
            train_on(&trainer, &template, &mut rng)
        }
    };
    eprintln!(
        "training finished: best fitness {} over {generations} generations",
        best.fitness
    );

    let output = Output::from_arg(args.output.clone());
    if args.json {
        let model = TrainedModel::new(
            args.name.clone(),
            variant.to_string(),
            generations,
            best.fitness,
            best.weights,
        );
        output.save_json(&model)?;
    } else {
        output.save_text(&best.weights.to_string())?;
    }
    Ok(())
}

fn train_on<F, R>(trainer: &Trainer, template: &F, rng: &mut R) -> Individual
where
    F: EnumeratePlacements,
    StandardUniform: Distribution<F::Kind>,
    R: Rng + ?Sized,
{
    trainer.train(template, rng, |report| {
        eprintln!(
            "generation {:>3}: best {:>5}, mean {:>8.1}, max {:>5}, budget {}{}",
            report.generation,
            report.best.fitness,
            report.summary.mean,
            report.summary.max,
            report.placement_limit,
            if report.reseeded { ", reseeded" } else { "" },
        );
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::command::{Args as CliArgs, Command};

    fn parse_train(argv: &[&str]) -> Args {
        let args = CliArgs::try_parse_from(argv).unwrap();
        match args.command {
            Command::Train(train) => train,
            Command::AutoPlay(_) => panic!("expected the train subcommand"),
        }
    }

    #[test]
    fn test_well_formed_values_parse_through() {
        let train = parse_train(&["voxtris", "train", "--generations", "12"]);
        assert_eq!(train.generations.resolve("generations", 60), 12);
        assert_eq!(train.population.resolve("population", 30), 30);
    }

    #[test]
    fn test_malformed_values_fall_back_instead_of_aborting() {
        let train = parse_train(&[
            "voxtris",
            "train",
            "--generations",
            "plenty",
            "--variant",
            "4d",
            "--width",
            "wide",
        ]);
        assert!(matches!(&train.generations, Lenient::Invalid(_)));
        assert_eq!(train.generations.resolve("generations", 60), 60);
        assert_eq!(train.variant.resolve("variant", Variant::TwoD), Variant::TwoD);
        assert_eq!(resolve_dim(train.width.as_ref(), "width", 10), 10);
    }
}
