use std::env;
use std::process::ExitCode;

use axona::*;

fn main() -> ExitCode {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: axona <recording.set>");
        return ExitCode::FAILURE;
    };

    match summarise(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{path}: {e}");
            ExitCode::FAILURE
        }
    }
}

fn summarise(path: &str) -> Result<()> {
    let recording = AxonaFile::open(path)?;
    let header = recording.header();

    println!("{: <20} : {}", "session", recording.session());
    println!("{: <20} : {} s", "duration", header.duration());
    if let Some(start) = header.start_datetime() {
        println!("{: <20} : {}", "start", start);
    }

    for group in recording.channel_groups()? {
        let spike_train = group.spike_train();
        println!(
            "{: <20} : {: >8} spikes * {:>2} channels",
            format!("channel group {}", group.id()),
            spike_train.len(),
            spike_train.channel_count()
        );
    }

    // the optional files are reported but do not fail the summary
    match recording.cuts() {
        Ok(cuts) => {
            for cut in cuts {
                println!(
                    "{: <20} : {: >8} labels, {:>2} clusters",
                    format!("cut {}", cut.channel_group_id()),
                    cut.len(),
                    cut.cluster_count()
                );
            }
        }
        Err(e) => println!("{: <20} : {e}", "cuts"),
    }

    match recording.analog_signals() {
        Ok(signals) => {
            for signal in signals {
                println!(
                    "{: <20} : {: >8} samples at {} Hz",
                    format!("{}{}", signal.kind().extension(), signal.suffix()),
                    signal.sample_count(),
                    signal.sample_rate()
                );
            }
        }
        Err(e) => println!("{: <20} : {e}", "analog signals"),
    }

    match recording.tracking() {
        Ok(tracking) => println!("{: <20} : {: >8} samples at {} Hz", "tracking", tracking.len(), tracking.sample_rate()),
        Err(e) => println!("{: <20} : {e}", "tracking"),
    }

    match recording.inp_data() {
        Ok(events) => println!("{: <20} : {: >8} events", "inputs", events.len()),
        Err(e) => println!("{: <20} : {e}", "inputs"),
    }

    Ok(())
}
