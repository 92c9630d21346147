use clap::{Args, Parser, Subcommand};
use lazy_beaver::{
    distribution, lazy_beaver_breadth, ConfigLoader, Format, LazyBeaverError, Reporter,
    Scheduler, SchedulerConfig,
};
use log::info;
use std::error::Error;
use std::io;
use std::path::PathBuf;

/// Computes Lazy Beaver values by lazily enumerating two-symbol Turing machines.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  lazy-beaver search --max-states 3
  lazy-beaver search --max-states 4 --seed 4=100 --json
  RUST_LOG=debug lazy-beaver search --config schedule.json
  lazy-beaver distribution --states 3 --steps 200
  lazy-beaver breadth --states 2 --steps 20")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Settle LB(n) for each size, raising the step budget until a gap appears
    Search(SearchArgs),
    /// Count how many machines halt on each step
    Distribution(DistributionArgs),
    /// Find LB(n) breadth first, dropping machines that provably run past the horizon
    Breadth(BreadthArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// JSON scheduler configuration; flags below override its values
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// First machine size to settle
    #[clap(long)]
    min_states: Option<usize>,

    /// Last machine size to settle
    #[clap(short = 'n', long)]
    max_states: Option<usize>,

    /// Step budget to start from
    #[clap(short = 'b', long)]
    initial_budget: Option<u64>,

    /// Factor the budget grows by after an inconclusive search
    #[clap(short, long)]
    growth: Option<u64>,

    /// Give up on a size instead of searching beyond this budget
    #[clap(short, long)]
    max_budget: Option<u64>,

    /// Starting budget for one size, as SIZE=BUDGET (repeatable)
    #[clap(short, long, value_parser = parse_seed)]
    seed: Vec<(usize, u64)>,

    /// Start every size from the initial budget instead of the previous size's budget
    #[clap(long)]
    no_carry: bool,

    /// Print one JSON object per line
    #[clap(long)]
    json: bool,
}

#[derive(Args)]
struct DistributionArgs {
    /// Number of states
    #[clap(short = 'n', long, default_value_t = 3)]
    states: usize,

    /// Number of steps to simulate
    #[clap(short = 's', long, default_value_t = 200)]
    steps: u64,

    /// Print the distribution as JSON
    #[clap(long)]
    json: bool,
}

#[derive(Args)]
struct BreadthArgs {
    /// Number of states
    #[clap(short = 'n', long, default_value_t = 3)]
    states: usize,

    /// Number of steps to look ahead
    #[clap(short = 's', long, default_value_t = 100)]
    steps: u64,

    /// Print the result as JSON
    #[clap(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Search(args) => run_search(args),
        Command::Distribution(args) => run_distribution(args),
        Command::Breadth(args) => run_breadth(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_search(args: SearchArgs) -> Result<(), Box<dyn Error>> {
    let config = build_config(&args)?;
    info!("scheduling with {:?}", config);

    let mut reporter = Reporter::new(io::stdout().lock(), format(args.json));
    for verdict in Scheduler::new(config)? {
        reporter.verdict(&verdict?)?;
        reporter.flush()?;
    }

    Ok(())
}

fn run_distribution(args: DistributionArgs) -> Result<(), Box<dyn Error>> {
    let distribution = distribution(args.states, args.steps)?;

    let mut reporter = Reporter::new(io::stdout().lock(), format(args.json));
    reporter.distribution(&distribution)?;
    reporter.flush()?;

    Ok(())
}

fn run_breadth(args: BreadthArgs) -> Result<(), Box<dyn Error>> {
    let result = lazy_beaver_breadth(args.states, args.steps)?;
    info!(
        "breadth-first search of {} states dropped {} machines",
        args.states, result.pruned
    );

    let mut reporter = Reporter::new(io::stdout().lock(), format(args.json));
    reporter.breadth(&result)?;
    reporter.flush()?;

    Ok(())
}

/// Loads the configuration file if given, then applies command-line overrides.
fn build_config(args: &SearchArgs) -> Result<SchedulerConfig, LazyBeaverError> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_config(path)?,
        None => SchedulerConfig::default(),
    };

    if let Some(min_states) = args.min_states {
        config.min_states = min_states;
    }
    if let Some(max_states) = args.max_states {
        config.max_states = max_states;
    }
    if let Some(initial_budget) = args.initial_budget {
        config.initial_budget = initial_budget;
    }
    if let Some(growth) = args.growth {
        config.growth_factor = growth;
    }
    if args.max_budget.is_some() {
        config.max_budget = args.max_budget;
    }
    config.seeds.extend(args.seed.iter().copied());
    if args.no_carry {
        config.carry_budget = false;
    }

    config.validate()?;
    Ok(config)
}

fn parse_seed(value: &str) -> Result<(usize, u64), String> {
    let (size, budget) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SIZE=BUDGET, got '{}'", value))?;
    let size = size
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{}': {}", size, e))?;
    let budget = budget
        .trim()
        .parse()
        .map_err(|e| format!("invalid budget '{}': {}", budget, e))?;
    Ok((size, budget))
}

fn format(json: bool) -> Format {
    if json {
        Format::Json
    } else {
        Format::Text
    }
}
