//! Stardrift application layer: host scheduling, the backdrop effect lifecycle,
//! the winit window and the headless runner.

pub mod backdrop;
pub mod headless;
pub mod host;
pub mod platform;
pub mod settings;
pub mod window;

pub use backdrop::Backdrop;
pub use headless::{HeadlessReport, run_headless};
pub use host::{FrameToken, Host, HostRegistry, ListenerToken};
pub use platform::{APP_NAME, PlatformDirs, PlatformError};
pub use settings::BackdropSettings;
