fn main() {
    if let Err(err) = xtask::main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
