#[tokio::main]
async fn main() {
    dock_reservations::run().await;
}
