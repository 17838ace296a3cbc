fn main() {
    if let Err(err) = specrace_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
