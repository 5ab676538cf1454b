#[tokio::main]
async fn main() -> anyhow::Result<()> {
    skills_quiz_server::run().await
}
