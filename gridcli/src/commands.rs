use super::*;

mod run;
pub use run::*;

mod list;
pub use list::*;

mod simulation;
pub use simulation::*;

/// All CLI commands available in this binary.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Simulate a single cascade scenario.
    #[command(alias = "s")]
    Simulate(Simulate),

    /// Run every scenario of a scenario set file.
    #[command(alias = "r")]
    Run(Run),

    /// Print the nodes with the highest cascade risk score.
    #[command(alias = "hr")]
    HighRisk(HighRisk),
}

#[derive(clap::Args, Debug)]
pub struct Simulate {
    /// Path to the JSON or YAML grid document.
    grid: PathBuf,
    /// Id of the node where the failure starts.
    patient_zero: String,
    /// Scenario name, also used for the stored scenario id.
    #[arg(short, long, default_value = "What-if scenario")]
    name: String,
    /// Ambient temperature in degrees Celsius.
    #[arg(short, long, default_value_t = 25.0, allow_negative_numbers = true)]
    temperature: f64,
    /// Grid loading relative to nominal.
    #[arg(short, long, default_value_t = 1.0)]
    load: f64,
    /// Minimum propagation probability for a neighbor to fail.
    #[arg(short = 'p', long, default_value_t = 0.3)]
    threshold: f64,
    /// Maximum number of hops from the patient zero.
    #[arg(short = 'w', long, default_value_t = 10)]
    max_waves: usize,
    /// Maximum number of failed nodes.
    #[arg(short = 'm', long, default_value_t = 500)]
    max_nodes: usize,
    /// Engine configuration file (JSON or YAML).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory where the result is stored.
    #[arg(short, long)]
    save: Option<PathBuf>,
    /// Print the result as JSON (Hint: redirect stdout)
    #[arg(short, long, default_value_t = false)]
    json: bool,
}

#[derive(clap::Args, Debug)]
pub struct Run {
    /// Path to the scenario set file.
    path: PathBuf,
    /// Directory where successful results are stored.
    #[arg(short, long)]
    save: Option<PathBuf>,
    /// Print the results as JSON (Hint: redirect stdout)
    #[arg(short, long, default_value_t = false)]
    json: bool,
}

#[derive(clap::Args, Debug)]
pub struct HighRisk {
    /// Path to the JSON or YAML grid document.
    grid: PathBuf,
    /// Number of nodes to print.
    #[arg(short, long, default_value_t = 10)]
    limit: usize,
    /// Print the nodes as JSON (Hint: redirect stdout)
    #[arg(short, long, default_value_t = false)]
    json: bool,
}

impl Command {
    pub fn run(self) {
        match self {
            Command::Simulate(args) => args.run(),
            Command::Run(args) => args.run(),
            Command::HighRisk(args) => args.run(),
        }
    }
}

/// Exit code for a failed simulation: 2 for bad input, 1 for everything else.
fn exit_code(error: &CascadeError) -> i32 {
    if error.is_validation() {
        2
    } else {
        1
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    let serialized = match serde_json::to_string_pretty(value) {
        Ok(s) => s,
        Err(e) => fatal_error!(1, "Error while serializing results: {}", e),
    };
    println!("{}", serialized);
}

fn read_config(path: Option<&Path>) -> EngineConfig {
    match path {
        Some(path) => match EngineConfig::read_from_file(path) {
            Ok(config) => config,
            Err(err) => fatal_error!(1, "Cannot read engine config: {}", err),
        },
        None => EngineConfig::default(),
    }
}

/// Print a human readable summary of a result to stderr.
fn print_result(result: &CascadeResult) {
    eprintln!("{:18}{}", "Scenario:".bold(), result.scenario_name);
    eprintln!(
        "{:18}{} ({})",
        "Patient Zero:".bold(),
        result.patient_zero,
        result.patient_zero_name()
    );
    eprintln!("{:18}{}", "Failed Nodes:".bold(), result.total_affected_nodes);
    eprintln!("{:18}{:.3}", "Capacity (MW):".bold(), result.affected_capacity_mw);
    eprintln!(
        "{:18}{}",
        "Customers:".bold(),
        result.estimated_customers_affected
    );
    eprintln!("{:18}{}", "Max Depth:".bold(), result.max_cascade_depth);
    if result.truncated {
        eprintln!(
            "{}",
            format!(
                "Stopped at the {} node limit, raise --max-nodes if more may be reachable.",
                result.parameters.max_nodes
            )
            .yellow()
        );
    }
    eprintln!(
        "{}",
        format!(
            "{:>6}{:>8}{:>14}{:>12}{:>8}{:>8}",
            "Wave", "Nodes", "Capacity MW", "Customers", "Subst", "Other"
        )
        .bold()
    );
    for wave in result.wave_breakdown.iter() {
        eprintln!(
            "{:>6}{:>8}{:>14.3}{:>12}{:>8}{:>8}",
            wave.wave_number,
            wave.nodes_failed,
            wave.capacity_lost_mw,
            wave.customers_affected,
            wave.substations,
            wave.transformers
        );
    }
}

/// Store a result, logging failures without discarding the result.
fn save_result(sink: &dyn ResultSink, result: &CascadeResult) -> Option<String> {
    match sink.store_result(result) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("{}", e);
            None
        }
    }
}
