use std::path::PathBuf;

use clap::{Parser, Subcommand};
use permsched::{
    checker, serialize::SerializableProblem, EngineOptions, Inst, PermutationEngine,
    PermutationSelection, Schedule,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
/// Tool for exploring the permutations of a scheduling problem.
struct Args {
    /// Print the input problem before running the query.
    #[clap(short = 'v')]
    verbose: bool,

    /// Input file containing a bincode-encoded SerializableProblem.
    input: PathBuf,

    /// Problems with more items than this are searched without recursion.
    #[clap(long, default_value_t = permsched::DEFAULT_RECURSION_LIMIT)]
    recursion_limit: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count every valid ordering.
    Count,
    /// Print the ordering with the given canonical index.
    Index {
        /// The index to print. Defaults to the one selected for `--region`
        /// by `--perms`, or 0.
        index: Option<u64>,
        /// Region name to look up in `--perms`.
        #[clap(long)]
        region: Option<String>,
        /// Per-region indices, `REGION=INDEX,...`.
        #[clap(long, default_value = "")]
        perms: String,
    },
    /// Print the greedy ordering.
    Greedy {
        /// Write `graph_<step>.dot` into this directory after every step,
        /// leaving out the items scheduled so far.
        #[clap(long)]
        dot_dir: Option<PathBuf>,
    },
    /// Print random orderings.
    Random {
        #[clap(long, default_value_t = 0)]
        seed: u64,
        #[clap(long, default_value_t = 1)]
        samples: usize,
    },
    /// Print the distinct orderings found among random draws.
    Distinct {
        #[clap(long, default_value_t = 0)]
        seed: u64,
        #[clap(long, default_value_t = 1000)]
        attempts: usize,
    },
    /// Write the constraint graph in DOT format.
    Dot {
        output: PathBuf,
        /// Item numbers to leave out of the graph.
        #[clap(long, value_delimiter = ',')]
        exclude: Vec<u32>,
    },
}

fn main() {
    pretty_env_logger::init();
    let args = Args::parse();

    let input = std::fs::read(&args.input).expect("could not read input file");
    let problem: SerializableProblem<Inst> =
        bincode::deserialize(&input).expect("could not deserialize input file");

    if args.verbose {
        println!("Input problem: {problem:?}");
    }

    let options = EngineOptions {
        recursion_limit: args.recursion_limit,
    };
    let engine = match problem.to_engine(options) {
        Ok(engine) => engine,
        Err(e) => {
            panic!("Invalid problem: {e:#?}");
        }
    };

    match args.command {
        Command::Count => {
            println!("{}", engine.count_permutations());
        }
        Command::Index {
            index,
            region,
            perms,
        } => {
            let index = match (index, region) {
                (Some(index), _) => index,
                (None, Some(region)) => {
                    let selection = PermutationSelection::parse("", &perms)
                        .unwrap_or_else(|e| panic!("Bad --perms: {e}"));
                    selection.index_for(&region)
                }
                (None, None) => 0,
            };
            match engine.get_permutation(index) {
                Some(schedule) => print_schedule(&engine, &schedule),
                None => {
                    eprintln!("permutation {index} does not exist");
                    std::process::exit(1);
                }
            }
        }
        Command::Greedy { dot_dir } => {
            let result = engine.first_permutation_with(|step, schedule| {
                if let Some(dir) = &dot_dir {
                    let path = dir.join(format!("graph_{step}.dot"));
                    engine
                        .write_dot(&path, schedule.as_slice())
                        .expect("could not write step graph");
                }
            });
            match result {
                Ok(schedule) => print_schedule(&engine, &schedule),
                Err(e) => panic!("Greedy scheduling failed: {e:#?}"),
            }
        }
        Command::Random { seed, samples } => {
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..samples {
                match engine.random_permutation(&mut rng) {
                    Ok(schedule) => print_schedule(&engine, &schedule),
                    Err(e) => panic!("Random scheduling failed: {e:#?}"),
                }
            }
        }
        Command::Distinct { seed, attempts } => {
            let mut rng = StdRng::seed_from_u64(seed);
            for schedule in engine.sample_distinct(&mut rng, attempts) {
                print_schedule(&engine, &schedule);
            }
        }
        Command::Dot { output, exclude } => {
            let exclude: Vec<Inst> = exclude.into_iter().map(Inst).collect();
            engine
                .write_dot(&output, &exclude)
                .expect("could not write output file");
        }
    }
}

fn print_schedule(engine: &PermutationEngine<Inst>, schedule: &Schedule<Inst>) {
    if let Err(e) = checker::check(engine, schedule.as_slice()) {
        panic!("Schedule checker failed: {e:#?}");
    }
    let labels: Vec<String> = schedule.as_slice().iter().map(|&i| engine.label(i)).collect();
    println!("{}", labels.join(" "));
}
