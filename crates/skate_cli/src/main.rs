//! Skate CLI
//!
//! Drive the hero board viewer and the physics footer headless against an in-memory host.

use anyhow::Result;
use clap::{Parser, Subcommand};
use skate_animation::ParallaxLayers;
use skate_core::{
    FrameScheduler, MemoryHost, PointerButton, PointerEvent, ResizeBus, StaticMotionPreference,
};
use skate_physics::FooterSimulation;
use skate_viewer::{BoardRegion, SkateboardViewer, ViewerMount};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod content;

use config::SkateConfig;
use content::PagePayload;

/// Height of the footer element in the simulated page
const FOOTER_HEIGHT: f32 = 400.0;

#[derive(Parser)]
#[command(name = "skate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless skateboard scenes", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to ./skate.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount the hero board and click regions in order
    Hero {
        /// Page payload (JSON)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Region to click (front, middle, back); repeatable
        #[arg(short, long)]
        trick: Vec<BoardRegion>,

        /// Seconds to simulate after each click
        #[arg(long, default_value = "1.5")]
        seconds: f32,
    },

    /// Run the physics footer for a number of frames
    Footer {
        /// Page payload (JSON)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: usize,

        /// Placeholder boards when the payload lists none
        #[arg(long, default_value = "0")]
        boards: usize,

        /// Visible fraction of the footer element
        #[arg(long, default_value = "1.0")]
        visibility: f32,
    },

    /// Feed one pointer position to the parallax layers
    Parallax {
        /// Pointer x in viewport pixels
        x: f32,

        /// Pointer y in viewport pixels
        y: f32,

        /// Frames to smooth over
        #[arg(short, long, default_value = "30")]
        frames: usize,
    },

    /// Show what a page payload resolves to
    Inspect {
        /// Page payload (JSON)
        content: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = SkateConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Hero {
            content,
            trick,
            seconds,
        } => cmd_hero(&config, content.as_deref(), &trick, seconds),

        Commands::Footer {
            content,
            frames,
            boards,
            visibility,
        } => cmd_footer(&config, content.as_deref(), frames, boards, visibility),

        Commands::Parallax { x, y, frames } => cmd_parallax(&config, x, y, frames),

        Commands::Inspect { content } => cmd_inspect(&content),
    }
}

fn load_page(content: Option<&Path>) -> Result<PagePayload> {
    match content {
        Some(path) => PagePayload::load(path),
        None => Ok(PagePayload::default()),
    }
}

fn cmd_hero(
    config: &SkateConfig,
    content: Option<&Path>,
    tricks: &[BoardRegion],
    seconds: f32,
) -> Result<()> {
    if seconds <= 0.0 {
        anyhow::bail!("--seconds must be positive, got {}", seconds);
    }
    let appearance = load_page(content)?.appearance()?;
    let viewport = config.viewport.viewport();
    let delta = config.run.frame_delta();

    let host = Arc::new(MemoryHost::new(viewport.width, viewport.height));
    let frames = FrameScheduler::new();
    let bus = ResizeBus::new(viewport);

    info!(
        deck = %appearance.deck_texture_url,
        width = viewport.width,
        "mounting hero board"
    );
    let viewer =
        SkateboardViewer::new(appearance, viewport, config.viewer.clone()).with_host(host.clone());
    let mut mount = ViewerMount::mount(viewer, frames.handle(), bus.handle());
    info!(scale = mount.with_viewer(|v| v.camera().scale()), "camera framed");

    for &region in tricks {
        let Some((x, y)) = mount.with_viewer(|v| v.region_screen_position(region)) else {
            warn!(%region, "region is off screen, skipping");
            continue;
        };
        mount.pointer(&PointerEvent::Moved { x, y });
        let outcome = mount.pointer(&PointerEvent::Pressed {
            button: PointerButton::Primary,
            x,
            y,
        });
        info!(%region, x, y, ?outcome, "clicked");

        let steps = (seconds / delta).ceil() as usize;
        for _ in 0..steps {
            frames.tick(delta);
        }

        mount.with_viewer(|v| {
            if let Some(board) = v.board_transform() {
                info!(
                    x = board.position.x,
                    y = board.position.y,
                    pitch = board.rotation.x,
                    yaw = board.rotation.y,
                    roll = board.rotation.z,
                    animating = v.is_animating(),
                    "board after {:.2}s",
                    seconds
                );
            }
        });
    }

    mount.with_viewer(|v| {
        for region in BoardRegion::ALL {
            info!(%region, visible = v.hotspot_visible(region), "hotspot");
        }
    });
    debug!(cursor = ?host.cursor_history(), "cursor changes");

    mount.unmount();
    Ok(())
}

fn cmd_footer(
    config: &SkateConfig,
    content: Option<&Path>,
    frames: usize,
    boards: usize,
    visibility: f32,
) -> Result<()> {
    let mut textures = load_page(content)?.footer_textures();
    if textures.is_empty() {
        textures = (0..boards)
            .map(|i| format!("/skateboard/board-{}.png", i + 1))
            .collect();
    }

    let viewport = config.viewport.viewport();
    let delta = config.run.frame_delta();
    let host = Arc::new(
        MemoryHost::new(viewport.width, FOOTER_HEIGHT).with_pixel_ratio(viewport.device_pixel_ratio),
    );
    let scheduler = FrameScheduler::new();
    let bus = ResizeBus::new(viewport);
    let motion = Arc::new(StaticMotionPreference::new(config.run.reduced_motion));

    let mut footer = FooterSimulation::mount(
        host.clone(),
        scheduler.handle(),
        bus.handle(),
        motion,
        config.footer.clone(),
    )?;
    if let Some(seed) = config.run.seed {
        footer = footer.with_seed(seed);
    }
    footer.set_textures(textures);
    let transition = footer.set_intersection(visibility);
    info!(
        ?transition,
        running = footer.is_running(),
        mobile = viewport.is_mobile(),
        "footer mounted"
    );

    let report_every = config.run.fps.max(1) as usize;
    for frame in 1..=frames {
        scheduler.tick(delta);
        if frame % report_every == 0 {
            let stats = footer.stats();
            info!(frame, bodies = stats.bodies, steps = stats.steps, "footer running");
        }
    }

    for sprite in footer.sprites() {
        info!(
            url = %sprite.url,
            x = sprite.pose.position.x,
            y = sprite.pose.position.y,
            angle = sprite.pose.angle.to_degrees(),
            "board"
        );
    }
    let stats = footer.stats();
    info!(
        boards = stats.boards,
        walls = stats.walls,
        textures = stats.textures_loaded,
        "footer stats"
    );

    footer.unmount();
    debug!(surfaces = host.surface_count(), "host after unmount");
    Ok(())
}

fn cmd_parallax(config: &SkateConfig, x: f32, y: f32, frames: usize) -> Result<()> {
    let viewport = config.viewport.viewport();
    let scheduler = FrameScheduler::new();
    let mut layers = ParallaxLayers::mount(scheduler.handle());

    layers.pointer(&PointerEvent::Moved { x, y }, &viewport);
    for _ in 0..frames {
        scheduler.tick(config.run.frame_delta());
    }

    let offsets = layers.offsets();
    info!(
        background_x = offsets.background.x,
        background_y = offsets.background.y,
        foreground_x = offsets.foreground.x,
        foreground_y = offsets.foreground.y,
        "parallax after {} frames",
        frames
    );
    layers.unmount();
    Ok(())
}

fn cmd_inspect(content: &Path) -> Result<()> {
    let page = PagePayload::load(content)?;
    let appearance = page.appearance()?;

    println!("Page: {}", content.display());
    println!();
    println!("Slices:");
    for slice in &page.slices {
        println!("  - {}", slice.kind());
    }
    println!();
    println!("Hero board:");
    println!("  deck:  {}", appearance.deck_texture_url);
    println!("  wheel: {}", appearance.wheel_texture_url);
    println!("  truck: {}", appearance.truck_color.to_hex_string());
    println!("  bolt:  {}", appearance.bolt_color.to_hex_string());
    println!();
    let textures = page.footer_textures();
    println!("Footer boards ({}):", textures.len());
    for url in &textures {
        println!("  - {}", url);
    }

    Ok(())
}
