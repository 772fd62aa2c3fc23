//! Generator that scaffolds the PyInventor bindings from the Inventor headers.
//!
//! This crate drives **hdrbind → litgen** over the vcpkg-installed
//! `Inventor/actions` headers. Run it after the native dependencies are
//! installed:
//!
//! ```sh
//! cargo run -p pyinventor-gen
//! ```

use anyhow::Result;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let summary = pyinventor_gen::generate(None)?;

    println!(
        "Generated PyInventor bindings for {} headers",
        summary.headers
    );
    Ok(())
}
