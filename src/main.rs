use anyhow::{Context, Result};
use banquet_guide::{
    fetch::Sheets,
    guide::{store::Snapshot, CharacterPanel, GuideView, SidebarGroup},
    Config, GuideStore, ViewRequest,
};
use clap::Parser;
use prettytable::{format, Cell, Row, Table};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "banquet-guide")]
#[command(about = "Browse the top-scoring banquet answers of each character", long_about = None)]
struct Args {
    /// Only list characters whose name contains this text
    #[arg(short, long, default_value = "")]
    search: String,

    /// Show the answer table for one character
    #[arg(short, long)]
    character: Option<String>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Read the question sheet from a local CSV export instead of fetching it
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Local image sheet export, used with --input
    #[arg(long, requires = "input")]
    images: Option<PathBuf>,
}

impl Args {
    fn request(&self) -> ViewRequest {
        ViewRequest {
            selected: self.character.clone(),
            search: self.search.clone(),
        }
    }
}

/// Build a snapshot from local exports instead of the published sheets.
fn load_local(input: &Path, images: Option<&Path>) -> Result<Snapshot> {
    let questions = fs::read_to_string(input)
        .with_context(|| format!("reading question export {}", input.display()))?;
    let images = match images {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("reading image export {}", p.display()))?,
        None => String::new(),
    };
    Snapshot::from_sheets(&Sheets { questions, images }, 1)
}

fn print_group(group: &SidebarGroup) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new(&group.category).style_spec("bFg"),
        Cell::new(group.swatch.background),
    ]));
    for entry in &group.entries {
        let name = if entry.selected {
            Cell::new(&entry.name).style_spec("bFy")
        } else {
            Cell::new(&entry.name)
        };
        let image = Cell::new(entry.image.as_deref().unwrap_or("-"));
        table.add_row(Row::new(vec![name, image]));
    }
    table.printstd();
}

fn print_panel(panel: &CharacterPanel) {
    println!(
        "\n{} [{}] {}",
        panel.name,
        panel.category.as_deref().unwrap_or("?"),
        panel.header.background
    );
    if let Some(image) = &panel.image {
        println!("{}", image);
    }
    if panel.lines.is_empty() {
        println!("No recommended answers.");
        return;
    }
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new("사도의 대사").style_spec("bFg"),
        Cell::new("추천 선택지").style_spec("bFg"),
    ]));
    for line in &panel.lines {
        table.add_row(Row::new(vec![
            Cell::new(&line.question),
            Cell::new(&line.answer).style_spec("bFg"),
        ]));
    }
    table.printstd();
}

fn print_view(view: &GuideView) {
    match &view.character {
        Some(panel) => print_panel(panel),
        None if view.groups.is_empty() => println!("No characters match."),
        None => view.groups.iter().for_each(print_group),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let snapshot: Arc<Snapshot> = match &args.input {
        Some(input) => Arc::new(load_local(input, args.images.as_deref())?),
        None => {
            let store = GuideStore::new(Config::load()?)?;
            store.refresh().await?
        }
    };
    info!(
        records = snapshot.guide.records().len(),
        categories = snapshot.guide.categories().len(),
        "guide ready"
    );

    let view = snapshot.guide.view(&args.request(), &snapshot.images);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}
