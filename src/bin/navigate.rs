use clap::Parser;

use maizuru_nav::pipeline;

#[derive(Parser, Debug)]
#[command(name = "navigate")]
struct Args {
    /// Comma-separated "key=value" OSM tags, e.g. "amenity=cafe"
    #[arg(long, default_value = "")]
    tags: String,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // logs go to stderr; stdout carries only the run report line
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();

    tracing::info!(tags = %args.tags, "selected tags string");

    match pipeline::run(args.tags.trim()).await {
        Ok(Some(report)) => match serde_json::to_string(&report) {
            Ok(line) => println!("{}", line),
            Err(err) => {
                tracing::error!(%err, "failed to serialize run report");
                std::process::exit(1);
            }
        },
        Ok(None) => {}
        Err(err) => {
            tracing::error!(code = err.code, message = %err.message, "navigation failed");
            std::process::exit(1);
        }
    }
}
