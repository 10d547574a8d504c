// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gpupick_core::init_tracing;
use gpupick_platform::{create_probe_window, raw_handles};
use gpupick_vk::{negotiate, rank, Candidate, InstanceContext, LogicalDevice};
use tracing::{error, info};

use gpupick_platform::winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use config::{load_cfg, AppCfg};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ./gpupick.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Negotiate without a window or surface; drops the present role
    #[arg(long)]
    headless: bool,
    /// Print every candidate with its score before selecting
    #[arg(long)]
    list: bool,
}

fn print_ranking(candidates: &[Candidate]) {
    println!("{:<4} {:<40} {:<16} {:>8}  note", "#", "device", "type", "score");
    for c in candidates {
        let note = c
            .rejection
            .as_ref()
            .map_or_else(String::new, ToString::to_string);
        println!(
            "{:<4} {:<40} {:<16} {:>8}  {}",
            c.position,
            c.name,
            format!("{:?}", c.device_type),
            c.score,
            note
        );
    }
}

fn report(device: &LogicalDevice) {
    info!(
        "graphics family={:?} queue={:?}",
        device.indices.graphics,
        device.graphics_queue()
    );
    info!(
        "present family={:?} queue={:?}",
        device.indices.present,
        device.present_queue()
    );
}

fn run_negotiation(cfg: &AppCfg, window: Option<&Window>, list: bool) -> Result<()> {
    let req = match window {
        Some(_) => cfg.requirements.clone(),
        None => cfg.requirements.clone().without_present(),
    };
    let handles = window.map(raw_handles).transpose()?;

    let ctx = InstanceContext::new(&req, handles).context("instance bootstrap")?;
    let source = ctx.source();

    if list {
        let ranked = rank(&source, &req, &cfg.scoring).context("rank devices")?;
        print_ranking(&ranked);
    }

    // Declared after `ctx`, so the device is destroyed before the instance.
    let device = negotiate(&source, &req, &cfg.scoring).context("device negotiation")?;
    report(&device);
    Ok(())
}

struct App {
    cfg: AppCfg,
    list: bool,
    outcome: Option<Result<()>>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if self.outcome.is_some() {
            return;
        }

        // The window only has to outlive the surface made from it.
        let outcome = create_probe_window(event_loop, "gpupick")
            .and_then(|window| run_negotiation(&self.cfg, Some(&window), self.list));
        if let Err(e) = &outcome {
            error!("negotiation failed: {e:#}");
        }
        self.outcome = Some(outcome);
        event_loop.exit();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let cfg = load_cfg(args.config.as_deref())?;

    if args.headless {
        return run_negotiation(&cfg, None, args.list);
    }

    let event_loop: EventLoop<()> = EventLoop::new()?;
    let mut app = App {
        cfg,
        list: args.list,
        outcome: None,
    };
    event_loop.run_app(&mut app)?;

    info!("event loop finished");
    app.outcome
        .unwrap_or_else(|| Err(anyhow::anyhow!("event loop exited before negotiation")))
}
