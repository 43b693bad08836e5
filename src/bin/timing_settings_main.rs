use intersection_control::storage::settings::TimingField;
use intersection_control::{Approach, ControllerConfig, JsonFileStore, TimingPlanStore};
use std::env;
use std::process::ExitCode;

fn usage() {
    println!("Usage:");
    println!("  timing_settings_main show");
    println!("  timing_settings_main set <approach> <green|left> <seconds>");
    println!("  timing_settings_main reset");
}

fn main() -> ExitCode {
    env_logger::init();

    let config = ControllerConfig::from_env();
    let store = JsonFileStore::new(config.settings_dir);
    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    // Start from what is saved, like the settings screen does.
    let mut plan = store.load().unwrap_or_default();

    match args.as_slice() {
        [] | ["show"] => {
            println!("Traffic Light Timer Settings ({})", store.path().display());
            for (approach, timing) in plan.iter() {
                println!(
                    "{:<6} green {:>3}s  left turn {:>3}s",
                    approach, timing.green_time, timing.left_turn_time
                );
            }
            return ExitCode::SUCCESS;
        }
        ["set", approach, field, value] => {
            let approach = match approach.parse::<Approach>() {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            let field = match field.parse::<TimingField>() {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            plan.set_field(approach, field, value);
        }
        ["reset"] => plan = Default::default(),
        _ => {
            usage();
            return ExitCode::FAILURE;
        }
    }

    if store.save(&plan) {
        println!("Settings Saved: your traffic light settings have been saved successfully.");
        ExitCode::SUCCESS
    } else {
        eprintln!("Error: failed to save settings. Please try again.");
        ExitCode::FAILURE
    }
}
