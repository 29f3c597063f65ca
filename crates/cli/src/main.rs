use std::process::ExitCode;

fn main() -> ExitCode {
    crossell_cli::run()
}
