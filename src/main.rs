use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = trends::cli::Cli::parse();
    trends::init_logging(cli.verbose);
    let exit_code = trends::run(cli).await;
    std::process::exit(exit_code);
}
