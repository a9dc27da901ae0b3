//! Offscreen runs: drive the backdrop for a fixed number of frames without a window.

use stardrift_config::Config;
use stardrift_render::{HeadlessTarget, Viewport};
use tracing::info;

use crate::backdrop::Backdrop;
use crate::host::HostRegistry;
use crate::settings::BackdropSettings;

/// Totals from a headless run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessReport {
    pub frames: u64,
    pub spawns: u64,
    pub expirations: u64,
    /// Most shooting stars active at once.
    pub peak_active: usize,
    pub final_group_z: f32,
    pub seed: u64,
}

/// Run `frames` frames against a [`HeadlessTarget`] sized like the configured window.
pub fn run_headless(config: &Config, frames: u64) -> HeadlessReport {
    let settings = BackdropSettings::from_config(config);
    let viewport = Viewport::new(
        config.window.width as f64,
        config.window.height as f64,
        1.0,
    )
    .with_pixel_ratio_cap(settings.pixel_ratio_cap);

    let mut host = HostRegistry::new();
    let mut report = HeadlessReport {
        frames: 0,
        spawns: 0,
        expirations: 0,
        peak_active: 0,
        final_group_z: 0.0,
        seed: 0,
    };
    let Some(mut backdrop) =
        Backdrop::acquire(&mut host, &settings, Some(HeadlessTarget::new(viewport)))
    else {
        return report;
    };

    while report.frames < frames {
        let Some(token) = host.dispatch_frame() else {
            break;
        };
        let Some(stats) = backdrop.on_frame(token, &mut host) else {
            break;
        };
        report.frames = stats.frame;
        report.peak_active = report.peak_active.max(stats.active_shooting_stars);
        report.final_group_z = stats.group_z;
    }

    report.spawns = backdrop.spawns();
    report.expirations = backdrop.expirations();
    report.seed = backdrop.animator().seed();
    backdrop.release(&mut host);

    info!(
        frames = report.frames,
        spawns = report.spawns,
        expirations = report.expirations,
        peak_active = report.peak_active,
        final_group_z = report.final_group_z,
        "Headless run finished"
    );
    report
}
