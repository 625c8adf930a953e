fn main() {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();
    tickwatch::app::logging::init();
    if let Err(err) = tickwatch::app::cli::run() {
        eprintln!("error: {}", err.message);
        std::process::exit(1);
    }
}
