use std::{fs, path::PathBuf};

use rand::{Rng as _, SeedableRng as _, distr::{Distribution, StandardUniform}};
use rand_pcg::Pcg32;
use serde::Serialize;
use voxtris_engine::{Board2, Board3, GameField, PieceSeed};
use voxtris_evaluator::{
    EnumeratePlacements, MoveSelector, SearchStrategy, SessionReport, WeightVector, play_session,
};

use crate::{
    command::{StrategyArg, Variant},
    util::{Lenient, Output, resolve_dim},
};

#[derive(Debug, clap::Args)]
pub(crate) struct Args {
    /// Board variant to play: "2d" or "3d".
    #[arg(long, default_value = "2d")]
    variant: Lenient<Variant>,
    /// Weight file in the `name = value` text format. Defaults to the
    /// shipped weights; an unreadable file warns and falls back.
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Master seed (32 hex digits) deriving each game's piece sequence.
    /// Random when omitted.
    #[arg(long)]
    seed: Option<Lenient<PieceSeed>>,
    /// Games to play.
    #[arg(long, default_value = "1")]
    games: Lenient<usize>,
    /// Stop each game after this many placements.
    #[arg(long, default_value = "500")]
    placements: Lenient<usize>,
    /// Placement search: "single-ply", "parallel", or "two-ply".
    /// Defaults to two-ply on 2d and parallel on 3d.
    #[arg(long)]
    strategy: Option<Lenient<StrategyArg>>,
    /// Board width. Defaults to 10 (2d) or 5 (3d).
    #[arg(long)]
    width: Option<Lenient<usize>>,
    /// Board height along the gravity axis. Defaults to 20 (2d) or 12 (3d).
    #[arg(long)]
    height: Option<Lenient<usize>>,
    /// Board depth (3d only). Defaults to 5.
    #[arg(long)]
    depth: Option<Lenient<usize>>,
    /// Write the report to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Emit the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct PlayReport {
    variant: String,
    strategy: String,
    seed: String,
    games: Vec<GameReport>,
    total_cleared_lines: usize,
}

#[derive(Debug, Serialize)]
struct GameReport {
    seed: String,
    placements: usize,
    cleared_lines: usize,
    topped_out: bool,
}

/// Board settings resolved once and cloned per game.
#[derive(Debug)]
enum BoardTemplate {
    TwoD(Board2),
    ThreeD(Board3),
}

fn default_strategy(variant: Variant) -> StrategyArg {
    match variant {
        Variant::TwoD => StrategyArg::TwoPly,
        Variant::ThreeD => StrategyArg::Parallel,
    }
}

pub(crate) fn run(args: &Args) -> anyhow::Result<()> {
    let variant = args.variant.clone().resolve("variant", Variant::TwoD);
    let weights = load_weights(args.weights.as_deref());
    let selector = MoveSelector::new(weights);
    let strategy_arg = args.strategy.clone().map_or_else(
        || default_strategy(variant),
        |s| s.resolve_with("strategy", || default_strategy(variant)),
    );
    let strategy = SearchStrategy::from(strategy_arg);

    let master_seed = args
        .seed
        .clone()
        .map_or_else(rand::random, |s| s.resolve_with("seed", rand::random));
    let mut master = Pcg32::from_seed(master_seed.into_bytes());

    let game_count = args.games.clone().resolve("games", 1);
    let placements = args.placements.clone().resolve("placements", 500);
    let template = match variant {
        Variant::TwoD => BoardTemplate::TwoD(Board2::new(
            resolve_dim(args.width.as_ref(), "width", 10),
            resolve_dim(args.height.as_ref(), "height", 20),
        )),
        Variant::ThreeD => BoardTemplate::ThreeD(Board3::new(
            resolve_dim(args.width.as_ref(), "width", 5),
            resolve_dim(args.height.as_ref(), "height", 12),
            resolve_dim(args.depth.as_ref(), "depth", 5),
        )),
    };
    let mut games = Vec::with_capacity(game_count);
    for _ in 0..game_count {
        let seed: PieceSeed = master.random();
        let report = match &template {
            BoardTemplate::TwoD(board) => {
                play_on(board.clone(), seed, &selector, strategy, placements)
            }
            BoardTemplate::ThreeD(board) => {
                play_on(board.clone(), seed, &selector, strategy, placements)
            }
        };
        games.push(GameReport {
            seed: seed.to_string(),
            placements: report.placements,
            cleared_lines: report.cleared_lines,
            topped_out: report.topped_out,
        });
    }

    let report = PlayReport {
        variant: variant.to_string(),
        strategy: strategy_arg.to_string(),
        seed: master_seed.to_string(),
        total_cleared_lines: games.iter().map(|g| g.cleared_lines).sum(),
        games,
    };
    let output = Output::from_arg(args.output.clone());
    if args.json {
        output.save_json(&report)?;
    } else {
        output.save_text(&render_text(&report))?;
    }
    Ok(())
}

fn render_text(report: &PlayReport) -> String {
    use std::fmt::Write as _;

    let mut text = format!(
        "variant: {}\nstrategy: {}\nseed: {}\n",
        report.variant, report.strategy, report.seed,
    );
    for (idx, game) in report.games.iter().enumerate() {
        let _ = writeln!(
            text,
            "game {:>3}: {} lines over {} placements{} (seed {})",
            idx + 1,
            game.cleared_lines,
            game.placements,
            if game.topped_out { ", topped out" } else { "" },
            game.seed,
        );
    }
    let _ = writeln!(text, "total lines: {}", report.total_cleared_lines);
    text
}

fn play_on<F>(
    board: F,
    seed: PieceSeed,
    selector: &MoveSelector,
    strategy: SearchStrategy,
    placement_limit: usize,
) -> SessionReport
where
    F: EnumeratePlacements,
    StandardUniform: Distribution<F::Kind>,
{
    let mut field = GameField::with_seed(board, seed);
    play_session(&mut field, selector, strategy, placement_limit)
}

/// Reads the weight file, normalizing the parsed vector. Any failure
/// warns on stderr and falls back to the shipped defaults.
fn load_weights(path: Option<&std::path::Path>) -> WeightVector {
    let Some(path) = path else {
        return WeightVector::default();
    };
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!(
                "warning: cannot read {}: {err}; using default weights",
                path.display()
            );
            return WeightVector::default();
        }
    };
    match text.parse::<WeightVector>() {
        Ok(weights) => weights.normalized(),
        Err(err) => {
            eprintln!(
                "warning: cannot parse {}: {err}; using default weights",
                path.display()
            );
            WeightVector::default()
        }
    }
}
