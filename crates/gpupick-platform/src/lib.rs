// SPDX-License-Identifier: CEPL-1.0
pub use winit;

use anyhow::{anyhow, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// A small hidden window; it only exists so a surface can be created for
/// presentation support queries.
pub fn create_probe_window(event_loop: &ActiveEventLoop, title: &str) -> Result<Window> {
    let attrs = Window::default_attributes()
        .with_title(title)
        .with_inner_size(LogicalSize::new(320.0, 240.0))
        .with_visible(false);
    event_loop
        .create_window(attrs)
        .map_err(|e| anyhow!("create_window: {e}"))
}

pub fn raw_handles(window: &Window) -> Result<(RawDisplayHandle, RawWindowHandle)> {
    let dh = window
        .display_handle()
        .map_err(|e| anyhow!("display_handle: {e}"))?
        .as_raw();
    let wh = window
        .window_handle()
        .map_err(|e| anyhow!("window_handle: {e}"))?
        .as_raw();
    Ok((dh, wh))
}
