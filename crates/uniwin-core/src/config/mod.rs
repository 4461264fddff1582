mod loader;
mod template;

use serde::{Deserialize, Serialize};

use crate::api::WindowApi;
use crate::controller::WindowController;
use crate::hit_test::{DEFAULT_OPACITY_CUTOFF, DEFAULT_RAYCAST_DISTANCE, HitTestPolicy};
use crate::log::LogConfig;
use crate::native::TransparencyMode;
use crate::{Rgb, WindowError, WindowResult};

pub use loader::{config_dir, config_path, load, load_from, try_load, try_load_from};
pub use template::generate_config;

/// Top-level configuration for uniwin.
///
/// Loaded from `~/.config/uniwin/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial window behavior.
    pub window: WindowSettings,
    /// File logging.
    pub logging: LogConfig,
}

/// Window behavior applied to a controller at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Make the window background see-through.
    pub transparent: bool,
    /// "alpha" (per-pixel) or "color-key" (single key color).
    pub transparency_mode: TransparencyMode,
    /// Hex color keyed out in color-key mode (e.g. "#010001").
    pub color_key: String,
    /// Keep the window above all non-topmost windows.
    pub topmost: bool,
    pub maximized: bool,
    pub minimized: bool,
    /// Accept files dropped from the shell.
    pub file_drop: bool,
    /// Accept drops from non-elevated processes when running elevated.
    pub allow_elevated_drop_sources: bool,
    /// Move the window by dragging its content.
    pub drag_move: bool,
    /// How "over content" is decided: "none", "opacity" or "raycast".
    pub hit_test: HitTestPolicy,
    /// Alpha at or above which a pixel counts as content (0.0 to 1.0).
    pub opacity_cutoff: f32,
    /// Maximum scene raycast distance for the raycast hit test.
    pub raycast_distance: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            transparent: false,
            transparency_mode: TransparencyMode::Alpha,
            color_key: Rgb::DEFAULT_KEY.to_string(),
            topmost: false,
            maximized: false,
            minimized: false,
            file_drop: false,
            allow_elevated_drop_sources: false,
            drag_move: true,
            hit_test: HitTestPolicy::Opacity,
            opacity_cutoff: DEFAULT_OPACITY_CUTOFF,
            raycast_distance: DEFAULT_RAYCAST_DISTANCE,
        }
    }
}

impl WindowSettings {
    /// The parsed color key, or the default key if the string is invalid.
    pub fn color_key(&self) -> Rgb {
        Rgb::from_hex(&self.color_key).unwrap_or(Rgb::DEFAULT_KEY)
    }

    /// Forwards every setting to `controller`.
    ///
    /// Transparency is applied last so it picks up the configured mode
    /// and key.
    pub fn apply_to<A: WindowApi + Clone>(&self, controller: &mut WindowController<A>) {
        controller.set_transparency_mode(self.transparency_mode);
        controller.set_color_key(self.color_key());
        controller.set_hit_test_policy(self.hit_test);
        controller.set_opacity_cutoff(self.opacity_cutoff);
        controller.set_raycast_distance(self.raycast_distance);
        controller.set_drag_move(self.drag_move);
        controller.set_allow_elevated_drop_sources(self.allow_elevated_drop_sources);
        controller.set_topmost(self.topmost);
        controller.set_maximized(self.maximized);
        controller.set_minimized(self.minimized);
        controller.set_file_drop(self.file_drop);
        controller.set_transparent(self.transparent);
    }
}

impl Config {
    /// Clamps values to usable ranges and replaces an unparseable color key.
    pub fn validate(&mut self) {
        let window = &mut self.window;
        window.opacity_cutoff = if window.opacity_cutoff.is_nan() {
            DEFAULT_OPACITY_CUTOFF
        } else {
            window.opacity_cutoff.clamp(0.0, 1.0)
        };
        if !(window.raycast_distance > 0.0 && window.raycast_distance.is_finite()) {
            window.raycast_distance = DEFAULT_RAYCAST_DISTANCE;
        }
        if Rgb::from_hex(&window.color_key).is_none() {
            log::warn!("invalid color_key {:?}, using default", window.color_key);
            window.color_key = Rgb::DEFAULT_KEY.to_string();
        }
        if window.maximized && window.minimized {
            window.minimized = false;
        }
    }

    /// The commented starter file written by `uniwin init`.
    pub fn template() -> String {
        generate_config()
    }

    /// Serializes the effective configuration.
    pub fn to_toml(&self) -> WindowResult<String> {
        toml::to_string_pretty(self).map_err(|e| WindowError::Config(e.to_string()))
    }
}
