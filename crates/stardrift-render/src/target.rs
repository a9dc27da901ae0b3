//! The seam between the backdrop effect and whatever it draws into.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use stardrift_scene::SceneAnimator;

use crate::camera::Camera;
use crate::draw::DrawList;
use crate::gpu::SurfaceError;
use crate::surface::Viewport;

/// A surface the scene can be uploaded to and drawn on.
///
/// A target lives for one activation: `upload` once, then any number of `resize`
/// and `submit` calls, then `release`, which frees every GPU resource and detaches
/// the surface.
pub trait RenderTarget {
    /// Current logical viewport.
    fn viewport(&self) -> Viewport;

    /// Create the GPU resources for the scene's static content.
    fn upload(&mut self, scene: &SceneAnimator);

    /// Match the drawing buffer to a new viewport.
    fn resize(&mut self, viewport: Viewport);

    /// Draw one frame.
    fn submit(&mut self, scene: &SceneAnimator, camera: &Camera) -> Result<(), SurfaceError>;

    /// Release every resource and detach the surface.
    fn release(self)
    where
        Self: Sized;
}

/// What a [`HeadlessTarget`] saw on its most recent successful submit.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub star_size: f32,
    pub group_z: f32,
    pub aspect: f32,
    pub trail_opacities: Vec<f32>,
    pub draws: DrawList,
}

/// An offscreen target that records what it is asked to do.
#[derive(Debug)]
pub struct HeadlessTarget {
    viewport: Viewport,
    uploads: usize,
    submissions: u64,
    resizes: Vec<Viewport>,
    last_frame: Option<FrameSnapshot>,
    failures: VecDeque<SurfaceError>,
    released: Rc<Cell<bool>>,
}

impl HeadlessTarget {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            uploads: 0,
            submissions: 0,
            resizes: Vec::new(),
            last_frame: None,
            failures: VecDeque::new(),
            released: Rc::new(Cell::new(false)),
        }
    }

    /// Make an upcoming `submit` fail with `error`. Queued failures are returned in order.
    pub fn fail_next_submit(&mut self, error: SurfaceError) {
        self.failures.push_back(error);
    }

    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Successful submissions.
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    pub fn resizes(&self) -> &[Viewport] {
        &self.resizes
    }

    pub fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.last_frame.as_ref()
    }

    /// A flag that flips to `true` when this target is released.
    pub fn release_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.released)
    }
}

impl RenderTarget for HeadlessTarget {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn upload(&mut self, scene: &SceneAnimator) {
        self.uploads += 1;
        log::debug!(
            "Headless upload: {} clouds, {}x{} sprite",
            scene.clouds().len(),
            scene.sprite().size,
            scene.sprite().size
        );
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.resizes.push(viewport);
    }

    fn submit(&mut self, scene: &SceneAnimator, camera: &Camera) -> Result<(), SurfaceError> {
        if let Some(error) = self.failures.pop_front() {
            return Err(error);
        }
        let draws = DrawList::build(scene, camera);
        self.submissions += 1;
        self.last_frame = Some(FrameSnapshot {
            frame: scene.frame(),
            star_size: scene.star_size(),
            group_z: scene.group().position.z,
            aspect: camera.aspect_ratio,
            trail_opacities: draws.trails.iter().map(|t| t.opacity).collect(),
            draws,
        });
        Ok(())
    }

    fn release(self) {
        self.released.set(true);
        log::debug!("Headless target released after {} frames", self.submissions);
    }
}
