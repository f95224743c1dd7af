#![allow(clippy::multiple_crate_versions)]

//! Backdrop - wallpaper, theme and automation control.
//!
//! `backdrop <image>` sets the image directly. Everything else is parsed as a
//! subcommand.

use std::path::Path;

use backdrop_lib::constants::{APP_NAME, env};
use backdrop_lib::error::BackdropError;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when neither `BACKDROP_LOG` nor `RUST_LOG` is set.
const DEFAULT_LOG_FILTER: &str = "backdrop_lib=info,backdrop=info";

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(Path::new) {
        Some(image) if args.len() == 2 && image.is_file() => set_directly(image),
        _ => backdrop_lib::cli::run(),
    };

    if let Err(err) = result {
        eprintln!("{APP_NAME}: {err}");
        std::process::exit(1);
    }
}

/// Sets `image` as the wallpaper, bypassing argument parsing.
fn set_directly(image: &Path) -> Result<(), BackdropError> {
    let engine = backdrop_lib::cli::engine();
    let report = engine.set(image)?;
    engine.run_after_set();
    println!("{}", report.wallpaper.display());
    Ok(())
}

fn init_tracing() {
    let filter = [env::LOG, "RUST_LOG"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|value| !value.trim().is_empty()))
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();
}
