fn main() {
    if let Err(e) = adventure_engine::core::Engine::run() {
        eprintln!("Engine failed to start: {}", e);
        std::process::exit(1);
    }
}
