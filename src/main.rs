use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = inference_proxy::cli::Cli::parse();
    if let Err(e) = inference_proxy::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
