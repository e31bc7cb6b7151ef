#[tokio::main]
async fn main() {
    smartcity::start_server().await;
}
