use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match firedrill::cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
