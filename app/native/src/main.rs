//! Glide demo driver.
//!
//! Runs the animation engine against the in-memory scene and logs what it
//! did. See `glide --help`.

fn main() {
    if let Err(err) = glide_lib::cli::run() {
        eprintln!("glide: {err}");
        std::process::exit(1);
    }
}
