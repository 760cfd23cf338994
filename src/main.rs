use maizuru_nav::api;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    api::serve().await;
}
