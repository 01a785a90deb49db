//! GP-8 dump inspection utility
//! Lists the patches in a .syx dump, or shows one patch field by field

use gp8_rs::core::validation::{errors_only, warnings_only};
use gp8_rs::core::FieldId;
use gp8_rs::formats::{load_dump, PatchSummary};
use gp8_rs::memmap::DumpMap;
use gp8_rs::patch::Gp8Patch;
use std::env;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Parse command line arguments
    let mut args: Vec<String> = env::args().collect();
    let json = if let Some(pos) = args.iter().position(|a| a == "--json") {
        args.remove(pos);
        true
    } else {
        false
    };

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <dump.syx> [index] [--json]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} factory.syx          # List every patch", args[0]);
        eprintln!("  {} factory.syx 0        # Show patch #0 in detail", args[0]);
        eprintln!("  {} factory.syx --json   # Summaries as JSON", args[0]);
        std::process::exit(1);
    }

    let dump_file = &args[1];
    let dump = load_dump(dump_file)?;
    tracing::info!("Loaded {} ({} bytes)", dump_file, dump.len());

    if dump.len() % gp8_rs::RECORD_SIZE != 0 {
        tracing::warn!(
            "{} trailing bytes do not form a whole record",
            dump.len() % gp8_rs::RECORD_SIZE
        );
    }

    match args.get(2) {
        None => {
            let patches = all_patches(&dump)?;
            if json {
                let summaries: Vec<PatchSummary> =
                    patches.iter().map(PatchSummary::from_patch).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for (index, patch) in patches.iter().enumerate() {
                    print_patch_line(index, patch);
                }
            }
        }
        Some(index_str) => {
            let index: usize = index_str.parse()?;
            let patch = dump.record(index)?;
            if json {
                println!("{}", PatchSummary::from_patch(&patch).to_json_pretty()?);
            } else {
                print_patch_detail(index, &patch, &dump);
            }
        }
    }

    Ok(())
}

fn all_patches(dump: &DumpMap) -> anyhow::Result<Vec<Gp8Patch>> {
    let mut patches = Vec::with_capacity(dump.record_count());
    for index in 0..dump.record_count() {
        patches.push(dump.record(index)?);
    }
    Ok(patches)
}

fn print_patch_line(index: usize, patch: &Gp8Patch) {
    let effects: Vec<String> = patch
        .enabled_effects()
        .iter()
        .map(|e| e.to_string())
        .collect();
    println!("{:3}  {}: {}", index, patch, effects.join(", "));
}

fn print_patch_detail(index: usize, patch: &Gp8Patch, dump: &DumpMap) {
    println!("=== Patch #{} ===", index);
    println!("Address: {}", patch.address());
    println!("Name:    {}", patch.name());
    println!();

    println!("Effects:");
    for (effect, on) in patch.effects() {
        println!("  {:<16} {}", effect, if on { "On" } else { "Off" });
    }
    println!();

    println!("Fields:");
    for field in FieldId::ALL {
        let desc = field.descriptor();
        println!(
            "  {:>2}  {:<20} {:<12} {}",
            desc.position,
            field,
            desc.category,
            patch.get(field)
        );
    }
    println!();

    let messages = patch.validate();
    if messages.is_empty() {
        println!("Validation: OK");
    } else {
        for msg in errors_only(&messages) {
            println!("Error:   {}", msg);
        }
        for msg in warnings_only(&messages) {
            println!("Warning: {}", msg);
        }
    }
    println!();

    println!("Hex: {}", patch.csv_hex());
    println!();

    let start = index * gp8_rs::RECORD_SIZE;
    print!(
        "{}",
        dump.printable(Some(start), Some(start + gp8_rs::RECORD_SIZE))
    );
}
