// Trace export example
//
// This example records a mixed session (driven, floating and oscillating
// phases) and writes it to CSV together with a per-state summary.

use logicprobe_rs::{LogicProbe, ProbeTrace, SimFrame, SimulatedHardware};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "probe_trace.csv".to_string());

    let mut frames = Vec::new();
    frames.extend(std::iter::repeat(SimFrame::driven(900, 700, true)).take(10));
    frames.extend(std::iter::repeat(SimFrame::floating(900, 250)).take(10));
    frames.push(SimFrame::floating(900, 250).toggling());
    frames.extend(std::iter::repeat(SimFrame::floating(900, 250)).take(60));
    frames.extend(std::iter::repeat(SimFrame::driven(100, 100, false)).take(10));

    let cycles = frames.len();
    let mut probe = LogicProbe::new(SimulatedHardware::new(frames));

    let mut trace = ProbeTrace::new();
    trace.extend(probe.run_for(cycles)?);
    trace.write_csv(&path)?;

    println!("Wrote {} cycles to {}", trace.len(), path);
    println!("{}", trace.display_summary()?);

    Ok(())
}
