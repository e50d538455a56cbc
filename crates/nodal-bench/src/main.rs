#![forbid(unsafe_code)]

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(error) = nodal_bench::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
