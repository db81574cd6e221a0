use std::process::exit;

use wpbrute::classifier::CredentialField;

fn main() {
    match wpbrute::app::run_cli(CredentialField::Username) {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    }
}
