use atbuild::ui;
use std::process;

fn main() {
    match atbuild::cli::run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            println!("{}", ui::error(&e.to_string()));
            process::exit(e.exit_code());
        }
    }
}
