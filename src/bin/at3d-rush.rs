// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! AT3D / Voodoo Rush trace runner
//!
//! Runs a bus-access trace script against a freshly configured device pair
//! and prints what the script read along with a summary of the final device
//! state.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use log::{error, info};

use at3d_rush::core::at3d::At3d;
use at3d_rush::core::config::DeviceConfig;
use at3d_rush::core::error::Result;
use at3d_rush::core::rush::RecordingBackend;
use at3d_rush::core::save_state::SaveState;
use at3d_rush::core::trace::{self, TraceSummary};

/// AT3D / Voodoo Rush trace runner
#[derive(Parser)]
#[command(name = "at3d-rush")]
#[command(about = "Run a bus-access trace against an AT3D / Voodoo Rush device", long_about = None)]
struct Args {
    /// Trace script to execute
    script: PathBuf,

    /// Device configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Write a save state of the coprocessor after the run
    #[arg(short = 's', long)]
    save_state: Option<PathBuf>,
}

fn main() -> Result<()> {
    // .env is optional; it usually carries RUST_LOG and AT3D_* overrides
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("at3d-rush v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            DeviceConfig::load(path)?
        }
        None => DeviceConfig::default(),
    };
    config.apply_env()?;

    let mut at3d = At3d::new(&config)?;

    let recorder = Rc::new(RefCell::new(RecordingBackend::new()));
    if let Some(rush) = at3d.rush_mut() {
        rush.attach_backend(Box::new(recorder.clone()));
    }

    info!("Running trace: {}", args.script.display());
    let source = fs::read_to_string(&args.script)?;
    let ops = trace::parse_script(&source).inspect_err(|e| error!("Invalid trace script: {}", e))?;
    let reads = trace::run_script(&mut at3d, &ops)?;

    let mut summary = TraceSummary::new(&at3d, ops.len(), reads);
    summary.triangles = recorder.borrow().triangles.len();

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize summary: {}", e),
        }
    } else {
        print_summary(&summary);
    }

    if let Some(path) = &args.save_state {
        match at3d.rush() {
            Some(rush) => {
                let description = format!("trace {}", args.script.display());
                SaveState::from_rush(rush, &description).save_to_file(path)?;
            }
            None => error!("No Voodoo Rush attached; save state not written"),
        }
    }

    Ok(())
}

fn print_summary(summary: &TraceSummary) {
    for read in &summary.reads {
        println!(
            "{:>5}: {:<6} 0x{:08X} = 0x{:08X}",
            read.line, read.op, read.addr, read.value
        );
    }

    println!("accesses:   {}", summary.accesses);
    println!("vram:       {} KB", summary.vram_bytes / 1024);

    let Some(rush) = &summary.rush else {
        println!("voodoo rush: not attached");
        return;
    };

    println!(
        "voodoo rush: {} MB PUMA, {}",
        rush.puma_mode.megabytes(),
        if rush.enabled { "enabled" } else { "disabled" }
    );
    println!("status:     0x{:08X}", rush.status);
    println!(
        "cmdfifo:    {} bottom=0x{:X} top=0x{:X} entries={} rdptr={}",
        if rush.cmdfifo.enabled { "on" } else { "off" },
        rush.cmdfifo.bottom_page,
        rush.cmdfifo.top_page,
        rush.cmdfifo.entry_count,
        rush.cmdfifo.read_ptr
    );
    println!(
        "swap:       pending={} requested={} completed={}",
        rush.swap.pending, rush.swap.requested, rush.swap.completed
    );
    println!("triangles:  {}", summary.triangles);
}
