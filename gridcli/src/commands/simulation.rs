/// Simulating single scenarios.
use super::*;

impl Simulate {
    pub fn run(self) {
        let Simulate {
            grid,
            patient_zero,
            name,
            temperature,
            load,
            threshold,
            max_waves,
            max_nodes,
            config,
            save,
            json,
        } = self;

        let config = read_config(config.as_deref());
        let sink = save.map(JsonDirSink::new);
        if let Some(sink) = &sink {
            if let Err(e) = std::fs::create_dir_all(&sink.dir) {
                fatal_error!(1, "Cannot create results directory: {e}");
            }
        }
        let store = TopologyStore::new(JsonFileSource::new(grid));
        let engine = CascadeEngine::new(&store, &config);

        let params = ScenarioParameters {
            patient_zero_id: patient_zero,
            scenario_name: name,
            temperature_c: temperature,
            load_multiplier: load,
            failure_threshold: threshold,
            max_waves,
            max_nodes,
        };

        let result = match engine.simulate(&params) {
            Ok(r) => r,
            Err(e) => fatal_error!(exit_code(&e), "Simulation failed: {}", e),
        };

        print_result(&result);

        if let Some(sink) = &sink {
            if let Some(id) = save_result(sink, &result) {
                eprintln!("{:18}{}", "Scenario Id:".bold(), id);
            }
        }

        if json {
            print_json(&result);
        }
    }
}
