use clap::Parser;
use log::info;
use miniproxy::net::{run, Listener};

#[derive(Parser)]
#[clap(
    version,
    about = "A sequential forward HTTP proxy for GET requests"
)]
struct Args {
    #[clap(value_name = "PORT", help = "Port to listen on")]
    port: u16,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let listener = Listener::bind(args.port)?;
    info!("listening on {}", listener.local_addr()?);

    run(&listener)
}
