use rocket_dynamics::*;
use tracing::{info, warn};

const ASCENT_DURATION: f64 = 1.5; // s
const ASCENT_OUTPUT: f64 = 5.0; // kg/s
const DESCENT_OUTPUT: f64 = 1.2; // kg/s, slightly below hover
const TRIM_PULSE: (f64, f64) = (2.0, 2.1); // s, short left-booster burst

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading configuration");
            SimulationConfig::load(&path)?
        }
        None => SimulationConfig::default(),
    };

    let mut rocket = Rocket::from_config(&config)?;
    rocket.set_booster_outputs(0.0, 0.0, ASCENT_OUTPUT);

    let mut telemetry = Telemetry::new();
    let mut descending = false;

    let mut elapsed_time = 0.0;
    while elapsed_time < MAX_SIMULATION_TIME {
        if !descending && elapsed_time >= ASCENT_DURATION {
            descending = true;
            rocket.set_booster_outputs(0.0, 0.0, DESCENT_OUTPUT);
            info!(time = elapsed_time, "throttling down");
        }
        if elapsed_time >= TRIM_PULSE.0 && elapsed_time < TRIM_PULSE.1 {
            rocket.booster_mut(BoosterId::Left).set_output(0.5);
            rocket.activate_left_booster();
        } else {
            rocket.booster_mut(BoosterId::Left).set_output(0.0);
        }
        rocket.activate_bottom_booster();

        let event = rocket.update(TIME_STEP);
        telemetry.collect_data(&rocket);
        elapsed_time += TIME_STEP;

        if let Some(RocketEvent::Destroyed { impact_speed }) = event {
            warn!(impact_speed, "rocket destroyed. Ending simulation.");
            break;
        }
        if descending && rocket.state == RocketState::Landed {
            info!(time = elapsed_time, "rocket has landed. Ending simulation.");
            break;
        }
    }

    let transform = RenderTransform::from_rocket(&rocket, &config.render);
    info!(
        x = transform.position.x,
        y = transform.position.y,
        rotation = transform.rotation_degrees,
        "final screen transform"
    );
    println!("{}", telemetry.summary());

    Ok(())
}
