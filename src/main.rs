use write_cargo_toml::cli;
use write_cargo_toml::error::paint_red;
use write_cargo_toml::GenerateError;

fn main() {
    if let Err(e) = cli::run_cli() {
        if let Some(err) = e.downcast_ref::<GenerateError>() {
            eprintln!("{}", paint_red(&err.to_string()));
        } else {
            eprintln!("Error: {}", e);

            // Print the error chain
            for cause in e.chain().skip(1) {
                eprintln!("Caused by: {}", cause);
            }
        }

        std::process::exit(1);
    }
}
