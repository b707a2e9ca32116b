use std::process::ExitCode;

fn main() -> ExitCode {
    nitido_cli::run()
}
