//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]: it activates the
//! backdrop when the application resumes, deactivates it on suspend or close,
//! and turns redraw requests into frame callbacks from its [`HostRegistry`].

use std::sync::Arc;

use stardrift_config::Config;
use stardrift_render::{SceneRenderer, SurfaceWrapper, Viewport, init_render_context_blocking};
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::backdrop::Backdrop;
use crate::host::HostRegistry;
use crate::settings::BackdropSettings;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Application state: the window, its host registry and the active backdrop.
pub struct AppState {
    config: Config,
    settings: BackdropSettings,
    window: Option<Arc<Window>>,
    surface_wrapper: SurfaceWrapper,
    host: HostRegistry,
    backdrop: Option<Backdrop<SceneRenderer>>,
}

impl AppState {
    pub fn with_config(config: Config) -> Self {
        let settings = BackdropSettings::from_config(&config);
        let surface_wrapper =
            SurfaceWrapper::new(config.window.width, config.window.height, 1.0)
                .with_pixel_ratio_cap(settings.pixel_ratio_cap);
        Self {
            config,
            settings,
            window: None,
            surface_wrapper,
            host: HostRegistry::new(),
            backdrop: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.surface_wrapper.viewport()
    }

    pub fn is_active(&self) -> bool {
        self.backdrop.is_some()
    }

    pub fn host(&self) -> &HostRegistry {
        &self.host
    }

    fn activate(&mut self, window: Arc<Window>) {
        if self.backdrop.is_some() {
            return;
        }
        let viewport = self.surface_wrapper.viewport();
        let target = match init_render_context_blocking(
            Arc::clone(&window),
            viewport.drawing_buffer_size(),
            self.config.render.vsync,
        ) {
            Ok(context) => Some(SceneRenderer::new(context, viewport)),
            Err(e) => {
                warn!("Render target unavailable: {e}");
                None
            }
        };

        self.backdrop = Backdrop::acquire(&mut self.host, &self.settings, target);
        if self.host.has_pending_frame() {
            window.request_redraw();
        }
    }

    fn deactivate(&mut self) {
        if let Some(mut backdrop) = self.backdrop.take() {
            backdrop.release(&mut self.host);
        }
    }

    fn forward_resize(&mut self, viewport: Viewport) {
        if let Some(backdrop) = self.backdrop.as_mut()
            && backdrop
                .listener()
                .is_some_and(|listener| self.host.is_listening(listener))
        {
            backdrop.on_resize(viewport);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = window_attributes_from_config(&self.config);
            match event_loop.create_window(attrs) {
                Ok(window) => self.window = Some(Arc::new(window)),
                Err(e) => {
                    error!("Failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            }
        }
        let Some(window) = self.window.clone() else {
            return;
        };

        let scale_factor = window.scale_factor();
        let inner_size = window.inner_size();
        self.surface_wrapper = SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor)
            .with_pixel_ratio_cap(self.settings.pixel_ratio_cap);
        info!(
            "Surface initialized: {}x{} (scale: {:.2})",
            inner_size.width, inner_size.height, scale_factor
        );

        self.activate(window);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        info!("Suspended, releasing backdrop");
        self.deactivate();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.deactivate();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = self
                    .surface_wrapper
                    .handle_resize(new_size.width, new_size.height)
                {
                    self.forward_resize(resize.viewport);
                    info!(
                        "Window resized to {}x{} (pixel ratio {:.2})",
                        resize.physical.width,
                        resize.physical.height,
                        resize.viewport.pixel_ratio()
                    );
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let inner = window.inner_size();
                    let resize = self.surface_wrapper.handle_scale_factor_changed(
                        scale_factor,
                        inner.width,
                        inner.height,
                    );
                    self.forward_resize(resize.viewport);
                    info!("Scale factor changed to {scale_factor:.2}");
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(token) = self.host.dispatch_frame()
                    && let Some(backdrop) = self.backdrop.as_mut()
                {
                    backdrop.on_frame(token, &mut self.host);
                }
                if self.host.has_pending_frame()
                    && let Some(window) = &self.window
                {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the backdrop window until it is closed.
#[instrument(skip(config))]
pub fn run_with_config(config: Config) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::with_config(config);
    event_loop.run_app(&mut app)
}
