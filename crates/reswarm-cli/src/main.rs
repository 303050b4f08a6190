use reswarm_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    logging::init();

    if let Err(err) = cli::run_from_args().await {
        eprintln!("reswarm error: {:#}", err);
        std::process::exit(1);
    }
}
