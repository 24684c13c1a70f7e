#[tokio::main]
async fn main() {
    if let Err(e) = koge_lib::run().await {
        eprintln!("koge: {}", e);
        std::process::exit(1);
    }
}
