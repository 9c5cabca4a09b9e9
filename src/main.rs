use clap::Parser;
use page_harvest::results::VideoKind;
use page_harvest::{Downloader, Harvest, HarvestConfig, Harvester, MediaKind, export};
use std::process::ExitCode;

mod args;
use args::{Args, convert_views};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    ::log::info!("Harvesting {}", args.uri);

    let config = match &args.config {
        Some(path) => match HarvestConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => HarvestConfig::default(),
    };

    let mut harvester = Harvester::new(&args.uri)
        .with_views(&convert_views(&args.view))
        .with_config(config);
    if let Some(seconds) = args.timeout {
        harvester = harvester.with_page_timeout(seconds);
    }

    let start_time = std::time::Instant::now();
    let harvest = match harvester.run().await {
        Ok(harvest) => harvest,
        Err(e) => {
            ::log::error!("Failed to harvest {}: {}", args.uri, e);
            print_json(&serde_json::json!({ "error": e.to_string() }), args.pretty);
            return ExitCode::FAILURE;
        }
    };
    ::log::info!(
        "Extraction finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    print_json(&harvest.to_json(), args.pretty);

    let mut ok = harvest.failures().is_empty();

    if let Some(dir) = &args.export {
        match &harvest.content {
            Some(Ok(content)) => {
                if let Err(e) = export::write_markdown(content, dir, chrono::Local::now()) {
                    ::log::error!("Export failed: {}", e);
                    ok = false;
                }
            }
            Some(Err(_)) => ok = false,
            None => ::log::warn!("--export needs the content view; nothing exported"),
        }
    }

    if args.download || args.cleanup {
        ok &= download_media(&harvest, harvester.config(), &args).await;
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => ::log::error!("Failed to render output: {}", e),
    }
}

/// Downloads every image and native video; embeds are player pages and are
/// skipped. Returns false if anything failed.
async fn download_media(harvest: &Harvest, config: &HarvestConfig, args: &Args) -> bool {
    let downloader = match Downloader::from_config(config) {
        Ok(downloader) => downloader,
        Err(e) => {
            ::log::error!("Failed to set up downloads: {}", e);
            return false;
        }
    };

    let mut ok = true;

    if args.cleanup {
        if let Err(e) = downloader.cleanup(config.max_file_age()).await {
            ::log::error!("Cleanup of {} failed: {}", downloader.dir().display(), e);
            ok = false;
        }
    }

    if !args.download {
        return ok;
    }

    let mut targets = Vec::new();
    if let Some(Ok(images)) = &harvest.images {
        targets.extend(
            images
                .iter()
                .map(|image| (image.url.as_str(), MediaKind::Image, image.index)),
        );
    }
    if let Some(Ok(videos)) = &harvest.videos {
        targets.extend(
            videos
                .iter()
                .filter(|video| video.kind == VideoKind::Native)
                .map(|video| (video.url.as_str(), MediaKind::Video, video.index)),
        );
    }

    for (url, kind, index) in targets {
        match downloader.download(url, kind, index).await {
            Ok(path) => ::log::info!("Saved {}", path.display()),
            Err(e) => {
                ::log::error!("Download of {} failed: {}", url, e);
                ok = false;
            }
        }
    }

    ok
}
