//! srsforge CLI binary.
//!
//! All logic is in the library; main only invokes the CLI and maps the
//! returned code to the process exit status.

#[tokio::main]
async fn main() -> std::process::ExitCode {
    srsforge::cli::run().await.into()
}
