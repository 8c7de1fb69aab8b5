fn main() {
    if let Err(err) = header_wrangler::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
