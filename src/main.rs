//! campusledger main entrypoint.

use campusledger::{init_tracing, run, ui::messages::error};

fn main() {
    init_tracing();

    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
