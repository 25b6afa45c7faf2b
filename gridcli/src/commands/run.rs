/// Running scenario sets.
use super::*;

/// JSON entry for a single scenario of a set.
fn scenario_outcome(
    result: &Result<CascadeResult, CascadeError>,
    scenario_id: Option<String>,
) -> serde_json::Value {
    match result {
        Ok(result) => serde_json::json!({
            "success": result,
            "scenario_id": scenario_id,
        }),
        Err(failure) => serde_json::json!({
            "error": failure,
            "description": failure.to_string(),
        }),
    }
}

impl Run {
    pub fn run(self) {
        let Run { path, save, json } = self;

        let set = match ScenarioSet::read_from_file(&path) {
            Ok(s) => s,
            Err(err) => fatal_error!(1, "Cannot parse scenario set: {}", err),
        };
        let ScenarioSet {
            name,
            grid,
            config,
            scenarios,
        } = set;

        eprintln!(
            "{:18}{}\n",
            "Scenario Set:".bold(),
            name.as_deref().unwrap_or("-")
        );

        let sink = save.map(JsonDirSink::new);
        if let Some(sink) = &sink {
            if let Err(e) = std::fs::create_dir_all(&sink.dir) {
                fatal_error!(1, "Cannot create results directory: {e}");
            }
        }

        let store = TopologyStore::new(grid);
        let engine = CascadeEngine::new(&store, &config);
        let results = engine.simulate_batch(&scenarios);

        let total = results.len();
        let mut outcomes: Vec<serde_json::Value> = Vec::with_capacity(total);
        for (current, result) in results.iter().enumerate() {
            eprintln!(
                "{}",
                format!("Scenario {}/{}", current + 1, total).green().bold()
            );
            let scenario_id = match result {
                Ok(result) => {
                    print_result(result);
                    sink.as_ref().and_then(|sink| save_result(sink, result))
                }
                Err(failure) => {
                    eprintln!("{}", "Simulation failed!".red().bold());
                    eprintln!("{}", failure);
                    None
                }
            };
            eprintln!();
            outcomes.push(scenario_outcome(result, scenario_id));
        }

        if json {
            print_json(&outcomes);
        }

        eprintln!("{}", "Done!".green().bold());
    }
}
