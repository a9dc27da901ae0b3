//! Viewport and surface sizing.
//!
//! The backdrop follows the window's logical size, and renders at the device pixel
//! ratio capped at [`DEFAULT_PIXEL_RATIO_CAP`]. [`SurfaceWrapper`] turns raw winit
//! resize and scale-factor events into [`Viewport`]s.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Highest pixel ratio the drawing buffer uses unless configured otherwise.
pub const DEFAULT_PIXEL_RATIO_CAP: f64 = 2.0;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

/// Logical size of the mount point plus the display's pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
    /// Physical pixels per logical pixel reported by the display.
    pub device_pixel_ratio: f64,
    /// Upper bound applied to `device_pixel_ratio` for the drawing buffer.
    pub pixel_ratio_cap: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
            pixel_ratio_cap: DEFAULT_PIXEL_RATIO_CAP,
        }
    }

    pub fn with_pixel_ratio_cap(mut self, cap: f64) -> Self {
        self.pixel_ratio_cap = cap;
        self
    }

    /// Effective pixel ratio: the device ratio, capped.
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(self.pixel_ratio_cap).max(f64::MIN_POSITIVE)
    }

    /// Size of the drawing buffer in physical pixels, never below 1×1.
    pub fn drawing_buffer_size(&self) -> PhysicalSize {
        let ratio = self.pixel_ratio();
        PhysicalSize {
            width: ((self.width * ratio).floor() as u32).max(MIN_SURFACE_DIMENSION),
            height: ((self.height * ratio).floor() as u32).max(MIN_SURFACE_DIMENSION),
        }
    }

    /// Width over height of the logical size. A collapsed viewport reports 1.0.
    pub fn aspect(&self) -> f32 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 1.0;
        }
        (self.width / self.height) as f32
    }
}

/// Event produced when the surface dimensions or scale factor change.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResizeEvent {
    /// New physical pixel dimensions reported by the window.
    pub physical: PhysicalSize,
    /// Viewport derived from the new size.
    pub viewport: Viewport,
}

/// Tracks the window's physical size and scale factor.
///
/// Zero-size surfaces (common on Wayland before the first configure) are clamped to
/// 1×1 and left unconfigured until a real size arrives.
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
    pixel_ratio_cap: f64,
    configured: bool,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        let has_valid_size = physical_width > 0 && physical_height > 0;
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
            pixel_ratio_cap: DEFAULT_PIXEL_RATIO_CAP,
            configured: has_valid_size,
        }
    }

    pub fn with_pixel_ratio_cap(mut self, cap: f64) -> Self {
        self.pixel_ratio_cap = cap;
        self
    }

    /// Handle a window resize. Returns an event only if the size actually changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);

        if width == self.physical_width && height == self.physical_height {
            return None;
        }

        self.physical_width = width;
        self.physical_height = height;
        self.configured = true;

        Some(self.event())
    }

    /// Handle a scale factor change. Always produces an event since the drawing
    /// buffer depends on the ratio even when the physical size is unchanged.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> SurfaceResizeEvent {
        self.scale_factor = new_scale_factor;
        self.handle_resize(new_physical_width, new_physical_height)
            .unwrap_or_else(|| self.event())
    }

    /// Logical viewport for the current size and scale factor.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.physical_width as f64 / self.scale_factor,
            self.physical_height as f64 / self.scale_factor,
            self.scale_factor,
        )
        .with_pixel_ratio_cap(self.pixel_ratio_cap)
    }

    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Whether the surface has been given a real (non-zero) size at least once.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    fn event(&self) -> SurfaceResizeEvent {
        SurfaceResizeEvent {
            physical: self.physical_size(),
            viewport: self.viewport(),
        }
    }
}
