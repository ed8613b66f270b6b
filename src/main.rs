use devtask::ui::{self, Verbosity};
use std::process;

fn main() {
    if let Err(e) = devtask::cli::run() {
        ui::print_error(Verbosity::Normal, &e.to_string());
        process::exit(e.exit_code());
    }
}
