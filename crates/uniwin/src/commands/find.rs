use clap::Args;

/// Arguments for the `find` subcommand.
#[derive(Args)]
pub struct FindArgs {
    /// Exact window title
    #[arg(long, conflicts_with = "class", required_unless_present = "class")]
    title: Option<String>,
    /// Window class name
    #[arg(long)]
    class: Option<String>,
}

#[cfg(windows)]
pub fn execute(args: &FindArgs) {
    use uniwin_windows::Win32Api;

    let found = match (&args.title, &args.class) {
        (Some(title), _) => uniwin_core::find_window_by_title(&Win32Api, title),
        (None, Some(class)) => uniwin_core::find_window_by_class(&Win32Api, class),
        (None, None) => None,
    };

    match found {
        Some(window) => println!("{window}"),
        None => {
            eprintln!("No matching window.");
            std::process::exit(1);
        }
    }
}

#[cfg(not(windows))]
pub fn execute(_args: &FindArgs) {
    super::unsupported();
}
