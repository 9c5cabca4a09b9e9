use clap::Parser;
use page_harvest::{Harvester, Pass};
use std::error::Error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the page to harvest
    #[arg(short, long)]
    url: String,

    /// Path to JSON configuration file
    #[arg(short, long)]
    config_file: Option<String>,

    /// Page fetch timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    let args = Args::parse();

    println!("Harvesting media and links from: {}", args.url);

    let mut harvester =
        Harvester::new(args.url).with_views(&[Pass::Images, Pass::Videos, Pass::Links]);

    if let Some(config_file) = args.config_file {
        println!("Loading configuration from file: {}", config_file);
        harvester = harvester.with_config_file(config_file)?;
    }

    if let Some(timeout) = args.timeout {
        println!("Overriding page timeout: {}s", timeout);
        harvester = harvester.with_page_timeout(timeout);
    }

    let harvest = harvester.run().await?;

    if let Some(Ok(images)) = &harvest.images {
        println!("{} images", images.len());
        for image in images {
            println!("  [{}] {} ({})", image.index, image.url, image.alt);
        }
    }

    if let Some(Ok(videos)) = &harvest.videos {
        println!("{} videos", videos.len());
        for video in videos {
            println!("  [{}] {}", video.index, video.url);
        }
    }

    if let Some(Ok(links)) = &harvest.links {
        let totals = links.totals();
        println!(
            "{} links: {} internal, {} external, {} email, {} tel, {} file, {} social",
            totals.total,
            totals.internal,
            totals.external,
            totals.email,
            totals.tel,
            totals.file,
            totals.social
        );
    }

    for failure in harvest.failures() {
        println!("Pass failed: {}", failure);
    }

    Ok(())
}
