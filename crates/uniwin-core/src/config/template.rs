/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `uniwin init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# uniwin configuration
# Location: ~/.config/uniwin/config.toml

[window]
# Make the window background see-through.
transparent = false
# "alpha": per-pixel transparency through the compositor.
# "color-key": pixels matching color_key become fully transparent.
transparency_mode = "alpha"
# Key color for color-key mode.
color_key = "#010001"
# Keep the window above normal windows.
topmost = false
maximized = false
minimized = false
# Accept files dragged in from Explorer.
file_drop = false
# When running elevated, still accept drops from normal processes.
allow_elevated_drop_sources = false
# Move the window by dragging anywhere on its content.
drag_move = true
# How the pointer is judged to be over content (click-through is off there):
# "none", "opacity" (read the pixel alpha) or "raycast" (UI or scene hit).
hit_test = "opacity"
# Alpha at or above which a pixel counts as content (0.0 to 1.0).
opacity_cutoff = 0.1
# Maximum scene distance for the raycast hit test.
raycast_distance = 100.0

[logging]
# Write logs to ~/.config/uniwin/logs/uniwin.log.
enabled = false
# "debug", "info", "warn" or "error".
level = "info"
# Rotate the log file after this many megabytes (one backup is kept).
max_file_mb = 10
"##
    .to_string()
}
