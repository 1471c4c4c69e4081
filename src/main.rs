//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` on a local HTTP server.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::env;
    use std::process::{exit, Command, Stdio};

    use gradient_wasm::config::{DEFAULT_PORT, PORT_ENV};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port = match env::var(PORT_ENV) {
        Ok(raw) => match raw.parse::<u16>() {
            Ok(port) => port,
            Err(e) => {
                log::error!("{PORT_ENV}={raw:?} is not a port: {e}");
                exit(2);
            }
        },
        Err(_) => DEFAULT_PORT,
    };

    // Build wasm bundle
    log::info!("building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            log::error!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            exit(1);
        }
        Err(_) => {
            log::warn!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
        }
    }

    // Serve `static/` until interrupted
    log::info!("serving static/ at http://127.0.0.1:{port} …");
    let server = Command::new("python3")
        .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status();

    match server {
        Ok(st) if st.success() => {}
        Ok(st) => {
            log::error!("http server exited with {st}");
            exit(1);
        }
        Err(e) => {
            log::error!("failed to start http server: {e}");
            exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
