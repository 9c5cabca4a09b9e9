use clap::{Parser, ValueEnum};
use page_harvest::Pass;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(about = "Extracts content, images, videos and classified links from a single web page")]
#[command(version)]
pub struct Args {
    /// Absolute http(s) URL of the page
    pub uri: String,

    /// Views to extract; may be repeated
    #[arg(short, long, value_enum, default_values_t = [ViewArg::All])]
    pub view: Vec<ViewArg>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Page fetch timeout in seconds (overrides the config file)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Write the content view as a Markdown document into this directory
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Download every extracted image and video into the download directory
    #[arg(long)]
    pub download: bool,

    /// Remove downloads older than the configured age before downloading
    #[arg(long)]
    pub cleanup: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Content,
    Images,
    Videos,
    Links,
    /// Images and videos
    Media,
    All,
}

/// Convert CLI views into the passes to run, in canonical order
pub fn convert_views(views: &[ViewArg]) -> Vec<Pass> {
    let mut passes = Vec::new();
    for view in views {
        match view {
            ViewArg::Content => passes.push(Pass::Content),
            ViewArg::Images => passes.push(Pass::Images),
            ViewArg::Videos => passes.push(Pass::Videos),
            ViewArg::Links => passes.push(Pass::Links),
            ViewArg::Media => passes.extend([Pass::Images, Pass::Videos]),
            ViewArg::All => passes.extend(Pass::ALL),
        }
    }
    Pass::ALL
        .into_iter()
        .filter(|pass| passes.contains(pass))
        .collect()
}
