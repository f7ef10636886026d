//! Forkflow CLI Tool
//!
//! Command-line interface for inspecting workflow configurations, previewing
//! media delivery and scroll tracking, and syncing media assets.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forkflow_core::sync::{self, FolderListing, DEFAULT_BASE_PATH};
use forkflow_core::{MediaKind, MediaSet, Scenario, Stage, StageId, WorkflowConfig};
use forkflow_media::delivery::{self, ImageTransform};
use forkflow_media::{
    DeliveryUrls, Effect, MediaPresenter, PrefetchCache, PresenterOptions, PresenterView,
};
use forkflow_scroll::{
    ScenarioSwitcher, ScrollTracker, StaticLayout, TimelineView, TrackerConfig, Viewport,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "forkflow")]
#[command(about = "Forkflow - hybrid workflow showcase tooling")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show stages, fork branches and media of a workflow configuration
    Inspect {
        /// Workflow configuration file
        config: PathBuf,
    },

    /// Show the delivery URLs derived from a media URL
    Resolve {
        /// Raw media URL
        url: String,

        /// Explicit inline width
        #[arg(long)]
        width: Option<u32>,
    },

    /// Compute the scroll snapshot for a captured layout
    Track {
        /// Workflow configuration file
        config: PathBuf,

        /// Layout file with stage rectangles
        #[arg(short, long)]
        layout: PathBuf,

        /// Vertical scroll offset
        #[arg(long, default_value = "0")]
        offset: f64,

        #[arg(long, default_value = "900")]
        viewport_height: f64,

        /// Total document height; defaults to the bottom of the last stage
        #[arg(long)]
        document_height: Option<f64>,

        /// Also show the scroll target for this stage
        #[arg(long)]
        goto: Option<u32>,
    },

    /// Simulate a stage gallery in view for a number of timer ticks
    Gallery {
        /// Workflow configuration file
        config: PathBuf,

        #[arg(long)]
        stage: u32,

        /// Sub-stage ID of a fork stage, e.g. "3.1"
        #[arg(long)]
        sub_stage: Option<String>,

        #[arg(long, default_value = "A")]
        scenario: Scenario,

        #[arg(long, default_value = "5")]
        ticks: usize,
    },

    /// Apply an exported asset folder listing to a workflow configuration
    Sync {
        /// Workflow configuration file
        config: PathBuf,

        /// Folder listing JSON
        #[arg(long)]
        listing: PathBuf,

        #[arg(long, default_value = DEFAULT_BASE_PATH)]
        base_path: String,

        /// Output file; defaults to overwriting the input configuration
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Inspect { config } => inspect(config)?,

        Commands::Resolve { url, width } => resolve(&url, width),

        Commands::Track {
            config,
            layout,
            offset,
            viewport_height,
            document_height,
            goto,
        } => track(config, layout, offset, viewport_height, document_height, goto)?,

        Commands::Gallery {
            config,
            stage,
            sub_stage,
            scenario,
            ticks,
        } => gallery(config, StageId(stage), sub_stage, scenario, ticks)?,

        Commands::Sync {
            config,
            listing,
            base_path,
            output,
        } => sync_media(config, listing, &base_path, output)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: &Path) -> Result<WorkflowConfig> {
    WorkflowConfig::load(path)
        .with_context(|| format!("Failed to load workflow configuration {}", path.display()))
}

fn inspect(path: PathBuf) -> Result<()> {
    let config = load_config(&path)?;

    println!("\n=== Workflow ===");
    println!("Stages: {}", config.stages.len());
    println!("Total duration weight: {:.1}", config.total_duration());
    match config.fork_stage() {
        Some(fork) => println!("Fork stage: {} ({})", fork.id, fork.title),
        None => println!("Fork stage: none"),
    }

    println!("\n=== Stages ===");
    for stage in &config.stages {
        println!(
            "  {} {}{} [{:.1}] {}",
            stage.id.label(),
            stage.title,
            if stage.is_fork { " (fork)" } else { "" },
            stage.duration,
            describe_media(&stage.media())
        );
        if stage.is_fork {
            for scenario in [Scenario::A, Scenario::B] {
                print_branch(stage, scenario);
            }
        }
    }

    Ok(())
}

fn print_branch(stage: &Stage, scenario: Scenario) {
    let Some(branch) = stage.branch(scenario) else {
        println!("    Scenario {}: missing", scenario);
        return;
    };
    println!(
        "    Scenario {} ({}): header {}",
        scenario,
        scenario.label(),
        describe_media(&branch.header_media())
    );
    for sub in &branch.sub_stages {
        println!(
            "      {} {} {}",
            sub.id,
            sub.title,
            describe_media(&sub.media())
        );
    }
}

fn describe_media(media: &MediaSet) -> String {
    if media.is_empty() {
        return "no media".to_string();
    }
    let (images, animated, videos) = media.kind_counts();
    format!(
        "{} item(s): {} image, {} animated, {} video",
        media.len(),
        images,
        animated,
        videos
    )
}

fn resolve(url: &str, width: Option<u32>) {
    let Some(urls) = DeliveryUrls::derive(Some(url)) else {
        println!("Kind: {}", MediaKind::Placeholder);
        return;
    };

    let inline = match width {
        Some(w) if urls.kind.is_video() => delivery::optimized_video_url(url, Some(w)),
        Some(w) => delivery::optimized_image_url(url, &ImageTransform::with_width(w)),
        None => urls.inline.clone(),
    };

    println!("Kind: {}", urls.kind);
    println!("Host: {:?}", delivery::AssetHost::detect(url));
    println!("Inline: {}", inline);
    println!("Lightbox: {}", urls.lightbox);
    println!(
        "Placeholder: {}",
        urls.placeholder.as_deref().unwrap_or("none")
    );
}

fn track(
    config_path: PathBuf,
    layout_path: PathBuf,
    offset: f64,
    viewport_height: f64,
    document_height: Option<f64>,
    goto: Option<u32>,
) -> Result<()> {
    let config = load_config(&config_path)?;
    let file = File::open(&layout_path).context("Failed to open layout file")?;
    let layout: StaticLayout =
        serde_json::from_reader(BufReader::new(file)).context("Failed to parse layout file")?;

    let document_height = document_height.unwrap_or_else(|| {
        layout
            .stages
            .values()
            .map(|r| r.bottom)
            .fold(viewport_height, f64::max)
    });
    let viewport = Viewport::new(offset, viewport_height, document_height);

    tracing::debug!("Tracking {} stage(s) at offset {}", config.stages.len(), offset);
    let mut tracker = ScrollTracker::new(&config, TrackerConfig::default());
    let snapshot = tracker.recompute(&viewport, &layout);
    let timeline = TimelineView::build(&config, &snapshot);

    println!("Trigger line: {:.1}", tracker.trigger_line(&viewport));
    println!("Active stage: {} ({})", snapshot.active_stage, timeline.title);
    println!("Stage progress: {:.1}%", snapshot.stage_progress);
    println!("Global progress: {:.1}%", snapshot.global_progress);

    let mut switcher = ScenarioSwitcher::new(config.fork_stage().map(|s| s.id));
    println!(
        "Scenario switcher: {}",
        if switcher.on_scroll(&viewport, &layout) {
            "visible"
        } else {
            "hidden"
        }
    );

    println!("\n=== Timeline ===");
    for segment in &timeline.segments {
        println!(
            "  {} {:<24} width {:5.1}% fill {:5.1}%{}",
            segment.label,
            segment.title,
            segment.width_percent,
            segment.fill.percent(),
            if segment.is_fork { " (fork)" } else { "" }
        );
    }

    if let Some(id) = goto {
        match tracker.scroll_to_stage(StageId(id), &layout) {
            Some(request) => println!("\nScroll to stage {}: {:.1}", id, request.top),
            None => println!("\nStage {} is not rendered", id),
        }
    }

    Ok(())
}

fn gallery(
    config_path: PathBuf,
    stage_id: StageId,
    sub_stage: Option<String>,
    scenario: Scenario,
    ticks: usize,
) -> Result<()> {
    let config = load_config(&config_path)?;
    let stage = config.require_stage(stage_id)?;

    let (media, title) = match &sub_stage {
        Some(id) => {
            let sub = stage
                .sub_stages(scenario)
                .iter()
                .find(|s| &s.id == id)
                .with_context(|| format!("Sub-stage {} not found in scenario {}", id, scenario))?;
            (sub.media(), sub.title.clone())
        }
        None => (stage.header_media(scenario), stage.title.clone()),
    };

    let options = PresenterOptions {
        label: format!("Stage {}", stage_id),
        title: Some(title),
        poster: stage.poster_url.clone(),
        ..PresenterOptions::default()
    };
    let mut presenter = MediaPresenter::new(media, options, PrefetchCache::new());

    println!("Entering viewport");
    print_effects(&presenter.enter_viewport());
    print_view(&presenter);

    for tick in 1..=ticks {
        let effects = if let Some(token) = presenter.armed_timer() {
            presenter.timer_fired(token)
        } else if presenter.current_kind().is_video() {
            presenter.video_ended()
        } else {
            println!("Tick {}: idle", tick);
            continue;
        };
        println!("Tick {}:", tick);
        print_effects(&effects);
        print_view(&presenter);
    }

    print_effects(&presenter.unmount());
    Ok(())
}

fn print_effects(effects: &[Effect]) {
    for effect in effects {
        println!("  effect: {:?}", effect);
    }
}

fn print_view(presenter: &MediaPresenter) {
    match presenter.view() {
        PresenterView::Placeholder { label } => println!("  placeholder: {}", label),
        PresenterView::Media(view) => println!(
            "  [{} / {}] {} {}",
            view.index + 1,
            view.count,
            view.kind,
            view.source.as_deref().unwrap_or("(not requested)")
        ),
    }
}

fn sync_media(
    config_path: PathBuf,
    listing_path: PathBuf,
    base_path: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(&config_path)?;
    let file = File::open(&listing_path).context("Failed to open folder listing")?;
    let listing: FolderListing =
        serde_json::from_reader(BufReader::new(file)).context("Failed to parse folder listing")?;

    println!("Syncing assets from {}", base_path);
    tracing::info!(
        "Sync started: {} folder(s) in listing {}",
        listing.folders.len(),
        listing_path.display()
    );
    let report = sync::sync_assets(&mut config, &listing, base_path);
    tracing::info!(
        "Sync finished: {} row(s), {} asset(s)",
        report.rows.len(),
        report.total_assets()
    );

    println!("\n=== Sync Summary ===");
    for row in &report.rows {
        println!(
            "  {:<14} {:<3} {:>2} image(s) {:>2} video(s){}",
            row.folder,
            row.scenario,
            row.images,
            row.videos,
            if row.fallback { " (fallback)" } else { "" }
        );
    }
    println!("Total assets: {}", report.total_assets());

    let output = output.unwrap_or(config_path);
    config
        .save(&output)
        .context("Failed to write workflow configuration")?;
    println!("Successfully wrote {}", output.display());

    Ok(())
}
