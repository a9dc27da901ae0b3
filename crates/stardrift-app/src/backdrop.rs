//! The backdrop effect: one activation of the animated starfield.
//!
//! A [`Backdrop`] is a scoped resource. [`Backdrop::acquire`] builds the scene,
//! uploads it to the render target, registers for resize notifications and asks
//! the host for the first frame. Each frame callback schedules the next one before
//! ticking, so the loop keeps itself alive until [`Backdrop::release`] (or a fatal
//! surface error) clears the running flag and hands every registration back.

use stardrift_render::{Camera, RenderTarget, Viewport};
use stardrift_scene::{FrameStats, SceneAnimator};
use tracing::{debug, info, trace, warn};

use crate::host::{FrameToken, Host, ListenerToken};
use crate::settings::BackdropSettings;

pub struct Backdrop<T: RenderTarget> {
    animator: SceneAnimator,
    camera: Camera,
    target: Option<T>,
    pending_frame: Option<FrameToken>,
    listener: Option<ListenerToken>,
    running: bool,
    stats_interval: u64,
    spawns: u64,
    expirations: u64,
}

impl<T: RenderTarget> Backdrop<T> {
    /// Activate the effect on `target`.
    ///
    /// Returns `None` when no target is available; the backdrop is then simply
    /// absent and nothing is registered with the host.
    pub fn acquire(
        host: &mut impl Host,
        settings: &BackdropSettings,
        target: Option<T>,
    ) -> Option<Self> {
        let Some(mut target) = target else {
            warn!("No render target available, backdrop disabled");
            return None;
        };

        let animator = SceneAnimator::new(&settings.animator);
        let camera = Camera::backdrop(target.viewport().aspect());
        target.upload(&animator);

        let listener = host.add_resize_listener();
        let pending_frame = host.request_frame();
        info!(
            seed = animator.seed(),
            spawn_chance = animator.spawn_chance(),
            "Backdrop acquired"
        );

        Some(Self {
            animator,
            camera,
            target: Some(target),
            pending_frame: Some(pending_frame),
            listener: Some(listener),
            running: true,
            stats_interval: settings.stats_interval,
            spawns: 0,
            expirations: 0,
        })
    }

    /// Run the frame callback for `token`.
    ///
    /// Tokens other than the one this backdrop is waiting on are ignored, as is
    /// any frame after the loop stopped. Returns what the tick did.
    pub fn on_frame(&mut self, token: FrameToken, host: &mut impl Host) -> Option<FrameStats> {
        if self.pending_frame != Some(token) {
            trace!(?token, "Ignoring stale frame callback");
            return None;
        }
        self.pending_frame = None;
        if !self.running {
            return None;
        }

        self.pending_frame = Some(host.request_frame());
        let stats = self.animator.tick();
        if stats.spawned.is_some() {
            self.spawns += 1;
        }
        self.expirations += stats.retired as u64;

        if let Some(target) = self.target.as_mut()
            && let Err(e) = target.submit(&self.animator, &self.camera)
        {
            if e.is_recoverable() {
                debug!("Surface {e:?}, skipping frame {}", stats.frame);
            } else {
                warn!("Surface {e:?}, stopping backdrop");
                self.stop(host);
            }
        }

        if self.stats_interval > 0 && stats.frame % self.stats_interval == 0 {
            debug!(
                frame = stats.frame,
                active = stats.active_shooting_stars,
                spawns = self.spawns,
                expirations = self.expirations,
                star_size = stats.star_size,
                group_z = stats.group_z,
                "Backdrop frame"
            );
        }

        Some(stats)
    }

    /// Follow a viewport change. Ignored once the resize listener is gone.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if self.listener.is_none() {
            return;
        }
        self.camera.aspect_ratio = viewport.aspect();
        if let Some(target) = self.target.as_mut() {
            target.resize(viewport);
        }
    }

    /// Tear the activation down: cancel the pending frame, drop the resize
    /// listener and release the target. Calling it again does nothing.
    pub fn release(&mut self, host: &mut impl Host) {
        self.stop(host);
        if let Some(listener) = self.listener.take() {
            host.remove_resize_listener(listener);
        }
        if let Some(target) = self.target.take() {
            target.release();
            info!(
                frames = self.animator.frame(),
                spawns = self.spawns,
                expirations = self.expirations,
                "Backdrop released"
            );
        }
    }

    fn stop(&mut self, host: &mut impl Host) {
        self.running = false;
        if let Some(token) = self.pending_frame.take() {
            host.cancel_frame(token);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    pub fn listener(&self) -> Option<ListenerToken> {
        self.listener
    }

    pub fn animator(&self) -> &SceneAnimator {
        &self.animator
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// Shooting stars spawned since activation.
    pub fn spawns(&self) -> u64 {
        self.spawns
    }

    /// Shooting stars retired since activation.
    pub fn expirations(&self) -> u64 {
        self.expirations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostRegistry;
    use stardrift_render::{HeadlessTarget, SurfaceError};
    use stardrift_scene::{AnimatorConfig, LayerKind, LayerSpec};

    fn settings(spawn_chance: f64) -> BackdropSettings {
        BackdropSettings {
            animator: AnimatorConfig {
                seed: Some(11),
                spawn_chance,
                layers: LayerKind::ALL
                    .into_iter()
                    .map(|k| LayerSpec::for_kind(k).with_count(8))
                    .collect(),
            },
            pixel_ratio_cap: 2.0,
            stats_interval: 0,
        }
    }

    fn target() -> HeadlessTarget {
        HeadlessTarget::new(Viewport::new(1600.0, 900.0, 1.0))
    }

    fn run_frame(backdrop: &mut Backdrop<HeadlessTarget>, host: &mut HostRegistry) -> FrameStats {
        let token = host.dispatch_frame().expect("pending frame");
        backdrop.on_frame(token, host).expect("frame ran")
    }

    #[test]
    fn test_acquire_without_target_is_absent() {
        let mut host = HostRegistry::new();
        let backdrop = Backdrop::<HeadlessTarget>::acquire(&mut host, &settings(0.0), None);
        assert!(backdrop.is_none());
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_acquire_uploads_and_registers() {
        let mut host = HostRegistry::new();
        let backdrop = Backdrop::acquire(&mut host, &settings(0.0), Some(target())).unwrap();
        assert_eq!(backdrop.target().unwrap().uploads(), 1);
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(host.listener_count(), 1);
        assert!(backdrop.is_running());
        assert!((backdrop.camera().aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_each_frame_requests_the_next() {
        let mut host = HostRegistry::new();
        let mut backdrop = Backdrop::acquire(&mut host, &settings(0.0), Some(target())).unwrap();
        for expected in 1..=5 {
            let stats = run_frame(&mut backdrop, &mut host);
            assert_eq!(stats.frame, expected);
            assert_eq!(host.pending_frames(), 1);
        }
        assert_eq!(backdrop.target().unwrap().submissions(), 5);
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut host = HostRegistry::new();
        let mut backdrop = Backdrop::acquire(&mut host, &settings(0.0), Some(target())).unwrap();
        let first = host.dispatch_frame().unwrap();
        backdrop.on_frame(first, &mut host).unwrap();

        assert!(backdrop.on_frame(first, &mut host).is_none());
        assert_eq!(backdrop.animator().frame(), 1);
        assert_eq!(host.pending_frames(), 1);
    }

    #[test]
    fn test_timeout_skips_frame_but_keeps_running() {
        let mut host = HostRegistry::new();
        let mut t = target();
        t.fail_next_submit(SurfaceError::Timeout);
        let mut backdrop = Backdrop::acquire(&mut host, &settings(0.0), Some(t)).unwrap();

        run_frame(&mut backdrop, &mut host);
        assert!(backdrop.is_running());
        assert_eq!(backdrop.target().unwrap().submissions(), 0);

        run_frame(&mut backdrop, &mut host);
        assert_eq!(backdrop.target().unwrap().submissions(), 1);
    }

    #[test]
    fn test_lost_surface_stops_the_loop() {
        let mut host = HostRegistry::new();
        let mut t = target();
        t.fail_next_submit(SurfaceError::Lost);
        let mut backdrop = Backdrop::acquire(&mut host, &settings(0.0), Some(t)).unwrap();

        run_frame(&mut backdrop, &mut host);
        assert!(!backdrop.is_running());
        assert_eq!(host.pending_frames(), 0);
        assert!(backdrop.pending_frame().is_none());
        // Still listening until released.
        assert_eq!(host.listener_count(), 1);
    }

    #[test]
    fn test_resize_updates_camera_and_target() {
        let mut host = HostRegistry::new();
        let mut backdrop = Backdrop::acquire(&mut host, &settings(0.0), Some(target())).unwrap();
        let viewport = Viewport::new(500.0, 1000.0, 3.0);
        backdrop.on_resize(viewport);

        assert_eq!(backdrop.camera().aspect_ratio, 0.5);
        assert_eq!(backdrop.target().unwrap().resizes(), &[viewport]);
    }

    #[test]
    fn test_release_hands_everything_back() {
        let mut host = HostRegistry::new();
        let t = target();
        let released = t.release_flag();
        let mut backdrop = Backdrop::acquire(&mut host, &settings(1.0), Some(t)).unwrap();
        run_frame(&mut backdrop, &mut host);

        backdrop.release(&mut host);
        assert!(released.get());
        assert!(!backdrop.is_running());
        assert!(backdrop.target().is_none());
        assert!(backdrop.listener().is_none());
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.listener_count(), 0);

        backdrop.release(&mut host);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_resize_after_release_is_ignored() {
        let mut host = HostRegistry::new();
        let mut backdrop = Backdrop::acquire(&mut host, &settings(0.0), Some(target())).unwrap();
        let before = backdrop.camera().aspect_ratio;
        backdrop.release(&mut host);
        backdrop.on_resize(Viewport::new(100.0, 400.0, 1.0));
        assert_eq!(backdrop.camera().aspect_ratio, before);
    }

    #[test]
    fn test_frame_dispatched_before_release_is_dropped() {
        let mut host = HostRegistry::new();
        let mut backdrop = Backdrop::acquire(&mut host, &settings(0.0), Some(target())).unwrap();
        let token = host.dispatch_frame().unwrap();
        backdrop.release(&mut host);
        assert!(backdrop.on_frame(token, &mut host).is_none());
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_counts_spawns_and_expirations() {
        let mut host = HostRegistry::new();
        let mut backdrop = Backdrop::acquire(&mut host, &settings(1.0), Some(target())).unwrap();
        for _ in 0..60 {
            run_frame(&mut backdrop, &mut host);
        }
        // Four slots fill on frames 1-4; slot 0 retires on frame 50 and refills on frame 51.
        assert!(backdrop.spawns() > 4);
        assert!(backdrop.expirations() > 0);
        assert_eq!(
            backdrop.spawns() - backdrop.expirations(),
            backdrop.animator().shooting_stars().active_count() as u64
        );
    }
}
