use anyhow::Result;
use log::info;
use nalgebra::Vector3;

use darkflight::{
    generate_strewn_field, run_trajectory, AtmosphericProfile, DragModel, Environment,
    ExplicitEuler, RunConfig, State,
};

// ---------------------------------------------------------------------------
// Park Forest style demo: a 1000 kg fragment released at 17 km
// ---------------------------------------------------------------------------

/// Sounding for the night of the fall: altitude (m), pressure (Pa),
/// temperature (K), wind speed (m/s), wind direction (deg, direction the
/// wind blows FROM, meteorological convention).
const SOUNDING: [(f64, f64, f64, f64, f64); 12] = [
    (190.0, 99_100.0, 278.0, 4.0, 250.0),
    (1_000.0, 89_800.0, 274.2, 9.0, 265.0),
    (2_000.0, 79_500.0, 269.0, 13.0, 275.0),
    (3_000.0, 70_100.0, 262.9, 17.0, 280.0),
    (5_000.0, 54_000.0, 249.0, 24.0, 285.0),
    (7_000.0, 41_000.0, 233.7, 32.0, 290.0),
    (9_000.0, 30_700.0, 221.0, 41.0, 285.0),
    (11_000.0, 22_600.0, 217.0, 48.0, 280.0),
    (13_000.0, 16_500.0, 216.7, 38.0, 275.0),
    (15_000.0, 12_100.0, 216.7, 26.0, 270.0),
    (17_000.0, 8_850.0, 216.7, 18.0, 265.0),
    (18_000.0, 7_560.0, 216.7, 14.0, 260.0),
];

fn build_profile() -> Result<AtmosphericProfile> {
    let levels = SOUNDING.iter().map(|&(alt, pressure, temp, speed, dir_deg)| {
        let dir = dir_deg.to_radians();
        // Meteorological direction is where the wind comes from
        let u = -speed * dir.sin();
        let v = -speed * dir.cos();
        (alt, pressure, temp, u, v)
    });
    Ok(AtmosphericProfile::from_raw_levels(levels)?)
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    // -----------------------------------------------------------------------
    // Fragment and release geometry
    // -----------------------------------------------------------------------
    let mass_kg = 1000.0;
    let release_altitude = 17_000.0; // m
    let entry_speed = 3_000.0;       // m/s at the end of the luminous phase
    let entry_angle_deg: f64 = 61.0;      // below horizontal
    let azimuth_deg: f64 = 21.0;          // heading, clockwise from north

    let el = entry_angle_deg.to_radians();
    let az = azimuth_deg.to_radians();
    let horizontal = entry_speed * el.cos();
    let velocity = Vector3::new(
        horizontal * az.sin(),
        horizontal * az.cos(),
        -entry_speed * el.sin(),
    );

    // UTM zone 16N coordinates of the release point
    let initial = State {
        time: 0.0,
        pos: Vector3::new(439_000.0, 4_589_000.0, release_altitude),
        vel: velocity,
        mass: mass_kg,
    };

    info!("building atmospheric profile ({} levels)", SOUNDING.len());
    let profile = build_profile()?;
    let mut env = Environment::new(profile);
    env.fragment_density_kg_m3 = 3320.0;
    env.drag_model = DragModel::Sphere;
    env.latitude_deg = 41.5;

    // -----------------------------------------------------------------------
    // Forward simulation
    // -----------------------------------------------------------------------
    info!("running forward simulation");
    let config = RunConfig { dt: 0.1, max_steps: 100_000, ..Default::default() };
    let result = run_trajectory(&initial, &ExplicitEuler, &env, &config)?;

    println!();
    println!("====================================================================");
    println!("  DARK FLIGHT SIMULATION — Park Forest scenario");
    println!("====================================================================");
    println!();
    println!("  Fragment Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.0} kg    Bulk density: {:>8.0} kg/m^3",
        mass_kg, env.fragment_density_kg_m3
    );
    println!(
        "  Release alt:   {:>8.0} m     Entry speed:  {:>8.0} m/s",
        release_altitude, entry_speed
    );
    println!(
        "  Entry angle:   {:>8.1} deg   Azimuth:      {:>8.1} deg",
        entry_angle_deg, azimuth_deg
    );
    println!();

    println!("  Flight Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Termination:   {:?}", result.termination);
    println!("  Flight time:   {:>8.1} s", result.flight_time_s);
    println!("  Max speed:     {:>8.1} m/s", result.max_speed_mps);
    println!("  Drift:         {:>8.1} km", result.horizontal_drift_m / 1000.0);
    if let Some(impact) = &result.impact_state {
        println!(
            "  Impact (UTM):  {:>10.0} E  {:>10.0} N",
            impact.pos.x, impact.pos.y
        );
        println!("  Impact speed:  {:>8.1} m/s", result.terminal_speed_mps);
        if let Some(energy) = result.terminal_kinetic_energy_j {
            println!("  Impact energy: {:>8.1} kJ", energy / 1000.0);
        }
    }
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>8}  {:>8}",
        "t (s)", "alt (m)", "vel (m/s)", "Mach", "mass(kg)"
    );
    println!("  {}", "─".repeat(50));

    let sample_interval = (result.states.len() / 25).max(1);
    for (i, s) in result.states.iter().enumerate() {
        if i % sample_interval != 0 && i != result.states.len() - 1 {
            continue;
        }
        let speed = s.speed();
        let mach = speed / env.profile.speed_of_sound(s.pos.z.max(0.0));
        println!(
            "  {:>7.1}  {:>9.1}  {:>9.1}  {:>8.3}  {:>8.1}",
            s.time, s.pos.z, speed, mach, s.mass
        );
    }
    println!();

    // -----------------------------------------------------------------------
    // Strewn field for a suite of fragment masses
    // -----------------------------------------------------------------------
    info!("sweeping mass suite into a strewn field");
    let masses = [0.01, 0.1, 1.0, 10.0, 100.0, 1000.0];
    let field = generate_strewn_field(
        (initial.pos.x, initial.pos.y),
        release_altitude,
        velocity,
        &masses,
        &env,
    )?;

    println!("  Strewn Field");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  {:>10}  {:>12}  {:>12}", "mass (kg)", "east (UTM)", "north (UTM)");
    println!("  {}", "─".repeat(40));
    for point in &field {
        println!(
            "  {:>10.2}  {:>12.0}  {:>12.0}",
            point.mass_kg, point.impact_x_m, point.impact_y_m
        );
    }

    println!();
    println!(
        "  Simulation: {} steps, dt={} s",
        result.states.len(),
        config.dt
    );
    println!("====================================================================");
    println!();

    Ok(())
}
