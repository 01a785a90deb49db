//! GP-8 patch editing utility
//! Applies FIELD=VALUE edits to one patch and prints the record as comma
//! separated hex, ready to hand to a MIDI SysEx sender.

use gp8_rs::core::Effect;
use gp8_rs::formats::load_dump;
use gp8_rs::patch::value::parse_switch;
use gp8_rs::patch::{FieldValue, Gp8Patch, PatchAddress};
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
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <dump.syx|-> [index] [FIELD=VALUE ...]", args[0]);
        eprintln!("\nUse '-' to start from a blank patch instead of a dump.");
        eprintln!("Fields: any field id (EQ_LO, OD_TURBO, DELAY_TIME ...), name, group,");
        eprintln!("        bank, program, address, or an effect name with on/off.");
        eprintln!("\nExamples:");
        eprintln!("  {} factory.syx 3 name=Solo EQ_HI=70 delay=on", args[0]);
        eprintln!("  {} - address=B-2-3 OD_DRIVE=80 overdrive=on", args[0]);
        std::process::exit(1);
    }

    let source = &args[1];
    let mut rest = &args[2..];

    let mut patch = if source == "-" {
        // Index is optional for a blank patch
        if rest.first().is_some_and(|a| a.parse::<usize>().is_ok()) {
            rest = &rest[1..];
        }
        Gp8Patch::new()
    } else {
        let Some((index, edits)) = rest.split_first() else {
            anyhow::bail!("A patch index is required when reading {}", source);
        };
        rest = edits;

        let index: usize = index.parse()?;
        let dump = load_dump(source)?;
        dump.record(index)?
    };

    for assignment in rest {
        apply(&mut patch, assignment)?;
    }

    tracing::info!("{}", patch);
    for msg in patch.validate() {
        tracing::warn!("{}", msg.message());
    }

    println!("{}", patch.csv_hex());
    Ok(())
}

/// Apply one FIELD=VALUE edit
fn apply(patch: &mut Gp8Patch, assignment: &str) -> anyhow::Result<()> {
    let Some((key, value)) = assignment.split_once('=') else {
        anyhow::bail!("Expected FIELD=VALUE, got {:?}", assignment);
    };
    let key = key.trim();

    match key.to_ascii_lowercase().as_str() {
        "name" => patch.set_name(value)?,
        "group" => {
            let mut chars = value.trim().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => patch.set_group(c.to_ascii_uppercase())?,
                _ => anyhow::bail!("Group must be A or B, got {:?}", value),
            }
        }
        "bank" => patch.set_bank(value.trim().parse()?)?,
        "program" => patch.set_program(value.trim().parse()?)?,
        "address" => patch.set_address(value.parse::<PatchAddress>()?)?,
        _ => {
            if let Ok(effect) = key.parse::<Effect>() {
                let Some(on) = parse_switch(value) else {
                    anyhow::bail!("Expected on/off for {}, got {:?}", effect, value);
                };
                patch.set_effect(effect, on)?;
            } else {
                let (field, value) = FieldValue::parse_named(key, value)?;
                patch.set(field, value)?;
            }
        }
    }

    tracing::debug!("Applied {}", assignment);
    Ok(())
}
