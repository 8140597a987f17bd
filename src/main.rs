// splist - SharePoint document library lister
use clap::Parser;
use splist::cli::{execute_command, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = execute_command(args).await {
        eprintln!("Error [{}]: {}", e.category(), e);
        std::process::exit(e.exit_code());
    }
}
