#[tokio::main]
async fn main() {
    if let Err(e) = radassist::run().await {
        eprintln!("radassist: {e}");
        std::process::exit(1);
    }
}
