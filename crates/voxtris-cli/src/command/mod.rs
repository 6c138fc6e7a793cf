use std::str::FromStr;

use clap::Parser as _;
use voxtris_evaluator::SearchStrategy;

mod auto_play;
mod train;

#[derive(Debug, clap::Parser)]
#[command(name = "voxtris", version, about = "Self-tuning stacking agent")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Evolve a weight vector by playing headless games.
    Train(train::Args),
    /// Play one session with a fixed weight vector and report the result.
    AutoPlay(auto_play::Args),
}

pub(crate) fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Train(args) => train::run(&args),
        Command::AutoPlay(args) => auto_play::run(&args),
    }
}

/// Board dimensionality selected once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub(crate) enum Variant {
    #[display("2d")]
    TwoD,
    #[display("3d")]
    ThreeD,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("variant must be \"2d\" or \"3d\"")]
pub(crate) struct ParseVariantError;

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2d" => Ok(Self::TwoD),
            "3d" => Ok(Self::ThreeD),
            _ => Err(ParseVariantError),
        }
    }
}

/// Command line spelling of [`SearchStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub(crate) enum StrategyArg {
    #[display("single-ply")]
    SinglePly,
    #[display("parallel")]
    Parallel,
    #[display("two-ply")]
    TwoPly,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("strategy must be \"single-ply\", \"parallel\", or \"two-ply\"")]
pub(crate) struct ParseStrategyError;

impl FromStr for StrategyArg {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-ply" => Ok(Self::SinglePly),
            "parallel" => Ok(Self::Parallel),
            "two-ply" => Ok(Self::TwoPly),
            _ => Err(ParseStrategyError),
        }
    }
}

impl From<StrategyArg> for SearchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::SinglePly => Self::SinglePly,
            StrategyArg::Parallel => Self::SinglePlyParallel,
            StrategyArg::TwoPly => Self::TwoPly,
        }
    }
}
