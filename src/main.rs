fn main() {
    if let Err(err) = ambient_suggest::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
