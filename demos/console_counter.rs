//! Console Counter
//!
//! This example drives a bounded counter from the terminal, standing in
//! for the UI layer that would normally render it.
//!
//! Key concepts:
//! - Subscribing a render callback to change notifications
//! - Persisting to a JSON file so the count survives restarts
//! - Bounds clamping and the capped history log
//!
//! Commands: `+` / `-` step, `+N` / `-N` step by N, `=N` set, `r` reset,
//! `h` history, `s` stats, `c` clear history, `q` quit.
//!
//! Run with: cargo run --example console_counter -- [path/to/counter.json]

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tally::builder::CounterConfig;
use tally::counter::BoundedCounter;
use tally::events::ChangeEvent;
use tally::storage::{JsonFileMedium, PersistentStore, StorageMedium};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "counter.json".to_string());

    let config = CounterConfig::builder()
        .bounds(-99.0, 99.0)
        .max_history_length(10)
        .build()?;

    let store = PersistentStore::new(JsonFileMedium::new(&path));
    let mut counter = BoundedCounter::new(0.0, config, store);

    counter.on_change(Arc::new(|event: &ChangeEvent| {
        let arrow = if event.diff > 0.0 { "▲" } else { "▼" };
        println!("  {} {} ({}, {:+})", arrow, event.value, event.action, event.diff);
    }));

    println!("Counter at {} (persisted to {})", counter.value(), path);
    print!("> ");
    io::stdout().flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = line.trim();

        match command {
            "q" => break,
            "+" => {
                counter.step_up();
            }
            "-" => {
                counter.step_down();
            }
            "r" => {
                counter.reset_to_zero();
            }
            "h" => print_history(&counter),
            "s" => println!("{}", serde_json::to_string_pretty(&counter.stats())?),
            "c" => {
                counter.clear_history();
                println!("  history cleared");
            }
            other => apply_amount(&mut counter, other),
        }

        print!("> ");
        io::stdout().flush()?;
    }

    let usage = counter.store().usage_info();
    println!(
        "Bye. {} key(s), ~{} bytes in storage",
        usage.namespace_key_count, usage.estimated_byte_size
    );
    Ok(())
}

fn apply_amount<M: StorageMedium>(counter: &mut BoundedCounter<M>, command: &str) {
    let (op, rest) = command.split_at(command.chars().next().map_or(0, char::len_utf8));
    let Ok(amount) = rest.trim().parse::<f64>() else {
        println!("  unknown command: {}", command);
        return;
    };

    let before = counter.value();
    let after = match op {
        "+" => counter.increment(amount),
        "-" => counter.decrement(amount),
        "=" => counter.set_value(amount),
        _ => {
            println!("  unknown command: {}", command);
            return;
        }
    };

    if before == after {
        println!("  unchanged at {}", after);
    }
}

fn print_history<M: StorageMedium>(counter: &BoundedCounter<M>) {
    match counter.history() {
        Some(entries) if entries.is_empty() => println!("  (no history)"),
        Some(entries) => {
            for entry in entries {
                println!(
                    "  {}  {:<9} {} -> {}",
                    entry.timestamp.format("%H:%M:%S"),
                    entry.action,
                    entry.old_value,
                    entry.new_value
                );
            }
        }
        None => println!("  history disabled"),
    }
}
