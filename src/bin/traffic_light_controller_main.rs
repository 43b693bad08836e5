use intersection_control::{
    Command, ControllerConfig, IntersectionState, JsonFileStore, Mode, MovementKey,
    TrafficLightController,
};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

// One console line per snapshot: mode, sequence, then every movement's status
// with its countdown where the display shows one.
fn render(state: &IntersectionState) -> String {
    let mut line = format!("[{}]", state.mode);
    if state.mode == Mode::Automated {
        line.push_str(&format!(" {}", state.sequence_label()));
    } else if state.all_red_phase && state.active_movements().is_empty() {
        line.push_str(" ALL RED");
    }
    let timers = state.visible_countdowns();
    for (approach, dir) in state.directions.iter() {
        line.push_str(&format!(" | {}", approach));
        for movement in [MovementKey::through(approach), MovementKey::left(approach)] {
            let label = if movement.is_left() { " left" } else { "" };
            line.push_str(&format!("{} {}", label, dir.status(movement.turn)));
            if let Some((_, countdown)) = timers.iter().find(|(m, _)| *m == movement) {
                line.push_str(&format!("({})", countdown));
            }
        }
    }
    line
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = ControllerConfig::from_env();
    let store = JsonFileStore::new(config.settings_dir.clone());
    println!("Starting traffic light controller...");
    println!("Commands: auto | manual | grant <approach> [left] | timers on|off | quit");

    let handle = TrafficLightController::new(store, config).spawn();

    let mut snapshots = handle.subscribe();
    let printer = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let line = render(&snapshots.borrow_and_update());
            println!("{}", line);
        }
    });

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error reading operator input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Shutdown) => break,
            Ok(command) => {
                if !handle.send(command).await {
                    eprintln!("Controller stopped unexpectedly");
                    break;
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    if handle.shutdown().await.is_none() {
        eprintln!("Controller did not shut down cleanly");
    }
    printer.abort();
    println!("Traffic light controller stopped.");
}
