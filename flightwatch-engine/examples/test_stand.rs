//! Example: a stationary engine test stand.
//!
//! This example demonstrates the full engine loop without a host simulation:
//! a test stand vessel with two instrumented parts is ticked through a
//! simulated minute, a failure is scripted partway through, and the
//! accumulated flight data is saved and reloaded at the end.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example test_stand
//! ```

use flightwatch_engine::sim::{LinearTelemetry, SimPart, SimVessel, SimWorld};
use flightwatch_engine::{SavedState, Settings, Tracker};
use flightwatch_types::{FailureInfo, FailureSeverity, VesselClass};

fn main() {
    let mut world = SimWorld::new();
    let vessel = world.add_vessel(
        SimVessel::new("Static Test Stand", VesselClass::Ship)
            .with_part(
                SimPart::new(
                    1,
                    "liquidEngine2",
                    LinearTelemetry::new("test stand", 1.0).failing_after(
                        45.0,
                        FailureInfo::new("Turbopump seizure", FailureSeverity::Major),
                    ),
                )
                .with_title("LV-T45 Liquid Fuel Engine"),
            )
            .with_part(
                SimPart::new(2, "fuelTank", LinearTelemetry::new("test stand", 0.2))
                    .with_title("FL-T400 Fuel Tank"),
            ),
    );

    // Poll failures more often than the default so the scripted failure
    // shows up within the one-minute run.
    let settings = Settings {
        min_time_between_failure_poll: 10.0,
        ..Settings::default()
    };
    let mut tracker = Tracker::new(settings);

    println!("Running test stand for 60 seconds of simulated time\n");

    let mut t = 0.0;
    while t <= 60.0 {
        world.set_now(t);
        tracker.tick(&mut world);

        if t % 10.0 == 0.0 {
            print_status(&tracker, t);
        }
        t += 0.5;
    }

    // Repair whatever broke and show the effect on the next poll.
    if tracker
        .master_status()
        .get(vessel)
        .map(|g| g.has_failures())
        .unwrap_or(false)
    {
        println!("Attempting repair of part 1...");
        let repaired = tracker.attempt_repair(&mut world, vessel, 1);
        println!("Repair {}\n", if repaired { "succeeded" } else { "failed" });
        world.set_now(61.0);
        tracker.tick(&mut world);
        print_status(&tracker, 61.0);
    }

    // Persist, reload, and show that flight data survived.
    let path = std::env::temp_dir().join("flightwatch_test_stand.json");
    match tracker.to_saved().save(&path) {
        Ok(()) => println!("State saved to {}", path.display()),
        Err(err) => {
            eprintln!("Failed to save state: {err}");
            return;
        }
    }

    match SavedState::load(&path) {
        Ok(state) => {
            let reloaded = Tracker::from_saved(Settings::default(), state);
            println!("Reloaded {} part histories:", reloaded.history().len());
            for history in reloaded.history().iter() {
                println!("  {}", history);
            }
        }
        Err(err) => eprintln!("Failed to reload state: {err}"),
    }
}

fn print_status(tracker: &Tracker, t: f64) {
    println!("t = {t:>5.1}s");
    for group in tracker.master_status().snapshot().values() {
        println!("  {}", group.vessel_name);
        for part in &group.parts {
            let condition = match &part.active_failure {
                Some(failure) => failure.title.as_str(),
                None => "Status OK",
            };
            println!(
                "    {:<28} {:>8.2}du {:>7.2}%  {}",
                part.part_name, part.flight_data, part.reliability, condition
            );
        }
    }
    println!();
}
