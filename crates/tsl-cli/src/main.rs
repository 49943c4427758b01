fn main() {
    if let Err(e) = tsl_cli::run() {
        eprintln!("erreur: {e:#}");
        std::process::exit(1);
    }
}
