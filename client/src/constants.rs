pub const WINDOW_TITLE: &str = "Aquarium";
/// Key bindings file, stored next to the configuration file
pub const BINDS_PATH: &str = "keybindings.ron";
pub const DEFAULT_LOG_FILTER: &str = "wgpu=error,naga=warn,aquarium=info,shared=info";

/// Sun illuminance at a light intensity of 1.0
pub const BASE_ILLUMINANCE: f32 = 9_000.0;
pub const SAND_RESOLUTION: u32 = 64;
pub const GLASS_THICKNESS: f32 = 0.05;

pub const CAMERA_FOCUS: [f32; 3] = [0.0, 3.0, 0.0];
pub const CAMERA_START_RADIUS: f32 = 24.0;
pub const CAMERA_MIN_RADIUS: f32 = 6.0;
pub const CAMERA_MAX_RADIUS: f32 = 60.0;
/// Radians of orbit per pixel of mouse drag
pub const CAMERA_ROTATE_SPEED: f32 = 0.005;
/// Fraction of the radius zoomed per scroll line
pub const CAMERA_ZOOM_SPEED: f32 = 0.1;

/// Caustic overlay UV drift per second
pub const CAUSTICS_DRIFT: [f32; 2] = [0.02, 0.013];
/// Caustic pattern repeats per tank width
pub const CAUSTICS_TILING: f32 = 4.0;
