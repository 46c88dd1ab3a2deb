// Simulated probe session
//
// This example runs the classifier loop against a scripted line and prints
// what the indicator shows on every cycle.

use clap::Parser;
use logicprobe_rs::{DisplayState, LogicProbe, SimFrame, SimulatedHardware};

#[derive(Parser)]
#[command(name = "simulate")]
#[command(version = "1.0")]
#[command(about = "Run the logic probe classifier against a simulated line")]
#[command(long_about = "Drives the full sampling loop (threshold selection, edge window, floating test, level and transition checks) against a scripted probe line and prints the resolved indicator state per cycle.")]
struct Args {
    /// Scenario to simulate
    #[arg(short, long, default_value = "toggle", value_parser = ["high", "low", "floating", "toggle", "burst"], help = "Line behaviour to script")]
    scenario: String,

    /// Logic family selected by the switch
    #[arg(short, long, default_value = "ttl", value_parser = ["ttl", "cmos"], help = "Threshold profile (ttl or cmos)")]
    family: String,

    /// Number of loop iterations
    #[arg(short, long, default_value_t = 60, help = "How many cycles to run")]
    cycles: usize,

    /// Enable verbose logging
    #[arg(short, long, help = "Show debug information and detailed logs")]
    verbose: bool,
}

fn script(scenario: &str, select: u16) -> Vec<SimFrame> {
    match scenario {
        "high" => vec![SimFrame::driven(select, 900, true)],
        "low" => vec![SimFrame::driven(select, 40, false)],
        "floating" => vec![SimFrame::floating(select, 300)],
        // Fast burst on an open line, then the line is left alone
        "burst" => vec![
            SimFrame::floating(select, 300).toggling(),
            SimFrame::floating(select, 300),
        ],
        _ => (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    SimFrame::driven(select, 900, true)
                } else {
                    SimFrame::driven(select, 40, false)
                }
            })
            .chain(std::iter::once(SimFrame::driven(select, 40, false)))
            .collect(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let select = if args.family == "cmos" { 100 } else { 900 };

    println!("Logic Probe Simulation");
    println!("======================");
    println!("Scenario: {}", args.scenario);
    println!("Family:   {}", args.family.to_uppercase());
    println!();

    let mut probe = LogicProbe::new(SimulatedHardware::new(script(&args.scenario, select)));
    let mut previous: Option<DisplayState> = None;

    for report in probe.run_for(args.cycles)? {
        if previous != Some(report.display) {
            println!(
                "cycle {:>4}: {:<5} (probe {:>4}, lines {:03b}, OS timer {})",
                report.iteration,
                report.display.as_str(),
                report.probe_code,
                report.display.line_pattern(),
                report.oscillation_remaining
            );
            previous = Some(report.display);
        }
    }

    let hw = probe.into_hardware();
    println!();
    println!(
        "Simulated {} us, {} edge interrupt(s)",
        hw.elapsed_us(),
        hw.edges_fired()
    );

    Ok(())
}
