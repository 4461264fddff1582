use uniwin_core::config::{self, Config};

/// Prints where the configuration lives and the values in effect.
pub fn execute(config: &Config) {
    match config::config_path() {
        Some(path) if path.exists() => println!("# {}", path.display()),
        Some(path) => println!("# {} (not found, showing defaults)", path.display()),
        None => println!("# no home directory, showing defaults"),
    }

    match config.to_toml() {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
