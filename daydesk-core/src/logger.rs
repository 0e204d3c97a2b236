//! Process-wide logging shim.
//!
//! Thin wrappers around `tracing` so callers log the same way in every
//! crate. `error` additionally walks the error's `source()` chain and
//! emits one line per cause, which is where provider faults surface
//! their code and message.
//!
//! Subscriber installation is the binary's job (the CLI installs a
//! `tracing-subscriber` fmt layer in `main`).

pub fn info(message: &str) {
    tracing::info!("{message}");
}

pub fn warn(message: &str) {
    tracing::warn!("{message}");
}

pub fn error(message: &str, err: Option<&dyn std::error::Error>) {
    match err {
        Some(e) => {
            tracing::error!("{message}: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                tracing::error!("caused by: {cause}");
                source = cause.source();
            }
        }
        None => tracing::error!("{message}"),
    }
}
