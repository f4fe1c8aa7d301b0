use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use raylib::prelude::*;
use tracing_subscriber::EnvFilter;

mod ambience;
mod app;
mod clock;
mod config;
mod constants;
mod decoder;
mod dialog;
mod error;
mod input;
mod loader;
mod noise;
mod presenter;
mod rasterizer;
mod session;
mod slide;
mod source;
mod state;
mod texture_loader;
mod timer;
mod transition;

use crate::ambience::Ambience;
use crate::app::App;
use crate::config::Config;
use crate::constants::*;
use crate::decoder::TextureDecoder;
use crate::input::InputRouter;
use crate::session::SessionStore;
use crate::slide::Slide;

/// Rehearse a talk: full-window slides from a PDF or a folder of images.
#[derive(Parser, Debug)]
#[command(name = "slide-presenter", version)]
struct Cli {
    /// PDF file or folder of slide images to open at startup
    source: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, default_value = "slide-presenter.json")]
    config: PathBuf,

    /// Log filter such as `debug` or `slide_presenter=trace` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    // --- Command Line, Logging, Configuration ---
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = Config::load(&cli.config)?;
    let router = InputRouter::from_config(&config.controls)?;
    let session = SessionStore::open(config.session_path.clone());

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Slide Presenter")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    // Escape belongs to the source prompt, not to window closing
    rl.set_exit_key(None);

    // --- Audience Noise ---
    let audio = match RaylibAudio::init_audio_device() {
        Ok(audio) => Some(audio),
        Err(e) => {
            tracing::warn!("audio device unavailable, audience noise disabled: {:?}", e);
            None
        }
    };
    let mut ambience = audio.as_ref().map(|audio| Ambience::new(audio, &config.environment));
    if let Some(ambience) = &ambience {
        ambience.start();
    }

    let mut app: App<Slide> = App::new(&config, session);
    app.initialize(cli.source);

    let mut pointer_captured = false;

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        // 1. Advance loading, transitions, timer and noise schedule
        let due = {
            let mut decoder = TextureDecoder::new(&mut rl, &thread);
            app.tick(dt, &mut decoder)
        };
        if let Some(ambience) = ambience.as_mut() {
            ambience.update(app.clock().audio_paused(), &due);
        }

        // 2. Input: the prompt owns the keyboard while it is open.
        // Runs after the tick so a confirmed PDF gets one busy frame before converting.
        if app.prompt().is_open() {
            if router.dialog_cancel_pressed(&rl) {
                app.cancel_dialog();
            } else {
                handle_prompt_keys(&mut rl, &mut app);
            }
        } else {
            for action in router.poll(&rl) {
                app.handle(action);
            }
        }

        if app.clock().pointer_captured() != pointer_captured {
            pointer_captured = app.clock().pointer_captured();
            if pointer_captured {
                rl.disable_cursor();
            } else {
                rl.enable_cursor();
            }
        }

        // 3. Render
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);

        if let Some((slide, brightness)) = app.presenter().displayed() {
            slide.draw(&mut d, brightness);
        }
        draw_status(&mut d, &app);
        if app.prompt().is_open() {
            draw_prompt(&mut d, &app);
        }
    }

    Ok(())
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn handle_prompt_keys(rl: &mut RaylibHandle, app: &mut App<Slide>) {
    while let Some(c) = rl.get_char_pressed() {
        app.prompt_mut().push(c);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
        app.prompt_mut().backspace();
    }
    if rl.is_key_pressed(KeyboardKey::KEY_ENTER) || rl.is_key_pressed(KeyboardKey::KEY_KP_ENTER) {
        app.confirm_dialog();
    } else if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
        app.cancel_dialog();
    }
}

fn draw_status(d: &mut RaylibDrawHandle, app: &App<Slide>) {
    let sw = d.get_screen_width();
    let sh = d.get_screen_height();
    let presenter = app.presenter();

    // Timer, top right
    let timer_color = if app.timer().is_running() { Color::WHITE } else { Color::GRAY };
    d.draw_text(&app.timer().label(), sw - 110, 16, 30, timer_color);

    if app.is_converting() {
        d.draw_text("Converting PDF...", 20, sh - 40, 24, Color::YELLOW);
    } else if let Some((done, total)) = presenter.loading_progress() {
        d.draw_text(&format!("Loading slides {}/{}", done, total), 20, sh - 40, 24, Color::YELLOW);
    } else if presenter.is_loading() {
        d.draw_text("Waiting for converted pages...", 20, sh - 40, 24, Color::YELLOW);
    } else if presenter.deck().is_empty() {
        d.draw_text("Press Enter to open a PDF or a folder of slides", 20, 20, 24, Color::LIGHTGRAY);
    } else {
        let counter = format!("{} / {}", presenter.position() + 1, presenter.deck().len());
        d.draw_text(&counter, 20, sh - 40, 24, Color::GRAY);
    }
}

fn draw_prompt(d: &mut RaylibDrawHandle, app: &App<Slide>) {
    let sw = d.get_screen_width();
    let sh = d.get_screen_height();

    d.draw_rectangle(0, 0, sw, sh, Color::new(0, 0, 0, 180));

    let box_x = sw / 10;
    let box_y = sh / 2 - 70;
    let box_w = sw * 8 / 10;
    d.draw_rectangle(box_x, box_y, box_w, 140, Color::new(30, 30, 30, 255));
    d.draw_rectangle_lines(box_x, box_y, box_w, 140, Color::LIGHTGRAY);

    d.draw_text("Open slides: PDF file or image folder", box_x + 20, box_y + 16, 22, Color::WHITE);
    d.draw_text(&format!("{}_", app.prompt().text()), box_x + 20, box_y + 56, 22, Color::YELLOW);
    d.draw_text("Enter to open, Esc to cancel", box_x + 20, box_y + 100, 18, Color::GRAY);
}
