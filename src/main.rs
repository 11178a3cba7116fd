//! Egg Herder entry point
//!
//! In the browser this hosts the game on a 2D canvas. Natively it runs a
//! headless match with an autopilot and prints a summary.

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent,
    };

    use egg_herder::Settings;
    use egg_herder::render::{Canvas, Rect, Rgba, SpriteImage, TextAlign, TextStyle};
    use egg_herder::sim::{GameState, HostRequest, InputEvent, frame, handle_input};

    /// Canvas capability on a browser 2D context
    struct CanvasHost {
        ctx: CanvasRenderingContext2d,
        images: HashMap<SpriteImage, HtmlImageElement>,
    }

    impl Canvas for CanvasHost {
        fn clear(&mut self, width: f64, height: f64) {
            self.ctx.clear_rect(0.0, 0.0, width, height);
        }

        fn draw_sprite(&mut self, image: SpriteImage, src: Rect, dst: Rect) {
            // Sheets that failed to load are skipped
            let Some(img) = self.images.get(&image) else {
                return;
            };
            let _ = self
                .ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    img, src.x, src.y, src.w, src.h, dst.x, dst.y, dst.w, dst.h,
                );
        }

        fn draw_circle(&mut self, center: DVec2, radius: f64, fill: Rgba) {
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU);
            self.ctx.set_fill_style_str(&fill.to_css());
            self.ctx.fill();
            self.ctx.stroke();
        }

        fn draw_line(&mut self, from: DVec2, to: DVec2) {
            self.ctx.begin_path();
            self.ctx.move_to(from.x, from.y);
            self.ctx.line_to(to.x, to.y);
            self.ctx.stroke();
        }

        fn draw_text(&mut self, text: &str, pos: DVec2, style: TextStyle) {
            self.ctx.set_font(&format!("{}px Bangers", style.size));
            self.ctx.set_text_align(match style.align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
            });
            self.ctx.set_fill_style_str(&Rgba::WHITE.to_css());
            let _ = self.ctx.fill_text(text, pos.x, pos.y);
        }

        fn fill_rect(&mut self, rect: Rect, fill: Rgba) {
            self.ctx.set_fill_style_str(&fill.to_css());
            self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
        }
    }

    struct Game {
        state: GameState,
        host: CanvasHost,
    }

    fn js_error(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|err| js_error(&err.to_string()))?;

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_error("no #canvas element"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(Settings::default(), seed);
        canvas.set_width(state.bounds.width as u32);
        canvas.set_height(state.bounds.height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| js_error("2d context unavailable"))?
            .dyn_into()?;
        ctx.set_stroke_style_str(&Rgba::WHITE.to_css());
        ctx.set_line_width(3.0);

        let mut images = HashMap::new();
        for image in SpriteImage::ALL {
            let element = document
                .get_element_by_id(image.asset_id())
                .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
            match element {
                Some(img) => {
                    images.insert(image, img);
                }
                None => log::warn!("Missing sprite sheet <img id=\"{}\">", image.asset_id()),
            }
        }

        let game = Rc::new(RefCell::new(Game {
            state,
            host: CanvasHost { ctx, images },
        }));
        setup_input_handlers(&canvas, game.clone())?;
        request_frame(game);

        log::info!("Egg Herder running with seed {}", seed);
        Ok(())
    }

    fn request_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            let Game { state, host } = &mut *g;
            frame(state, time, host).keep_running
        };

        if keep_running {
            request_frame(game);
        } else {
            log::info!("Frame loop stopped; press R to play again");
        }
    }

    fn toggle_full_screen(canvas: &HtmlCanvasElement) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if document.fullscreen_element().is_some() {
            document.exit_fullscreen();
        } else if let Err(err) = canvas.request_fullscreen() {
            log::warn!("Fullscreen request failed: {:?}", err);
        }
    }

    fn pointer_pos(event: &MouseEvent) -> DVec2 {
        DVec2::new(event.offset_x() as f64, event.offset_y() as f64)
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Pointer
        let pointer_events: [(&str, fn(DVec2) -> InputEvent); 3] = [
            ("mousedown", InputEvent::PointerDown),
            ("mouseup", InputEvent::PointerUp),
            ("mousemove", InputEvent::PointerMove),
        ];
        for (name, to_input) in pointer_events {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                handle_input(&mut game.borrow_mut().state, to_input(pointer_pos(&event)));
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let input = match event.key().as_str() {
                    "d" | "D" => InputEvent::ToggleDebug,
                    "r" | "R" => InputEvent::Restart,
                    "c" | "C" => InputEvent::ToggleFullScreen,
                    _ => return,
                };
                let request = handle_input(&mut game.borrow_mut().state, input);
                match request {
                    Some(HostRequest::ResumeFrames) => request_frame(game.clone()),
                    Some(HostRequest::ToggleFullScreen) => toggle_full_screen(&canvas_clone),
                    None => {}
                }
            });
            let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), wasm_bindgen::JsValue> {
    web::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use glam::DVec2;

    use egg_herder::render::HeadlessCanvas;
    use egg_herder::sim::{GameEvent, GameState, InputEvent, frame, handle_input};
    use egg_herder::{Settings, SettingsError};

    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// JSON settings file (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed; overrides the settings file
        #[arg(short, long)]
        seed: Option<u64>,

        /// Simulated seconds before the run is cut off
        #[arg(long, default_value_t = 180.0)]
        seconds: f64,

        /// Milliseconds between host frames
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f64,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    }

    fn load_settings(args: &Args) -> Result<Settings, SettingsError> {
        let settings = match &args.config {
            Some(path) => Settings::load_from_path(path)?,
            None => Settings::default(),
        };
        if !(args.frame_ms > 0.0) {
            return Err(SettingsError::Invalid {
                field: "frame_ms",
                reason: "must be positive",
            });
        }
        Ok(settings)
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// Steer toward the lowest egg and shove it up past the margin
    fn autopilot_target(state: &GameState) -> DVec2 {
        let Some(egg) = state
            .eggs
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        else {
            return state.bounds.center();
        };
        let player = state.player.pos;
        let lined_up = (player.x - egg.pos.x).abs() < egg.radius * 0.5;
        if lined_up && player.y > egg.pos.y {
            DVec2::new(egg.pos.x, 0.0)
        } else {
            egg.pos + DVec2::new(0.0, egg.radius + state.player.radius + 20.0)
        }
    }

    pub fn run() -> ExitCode {
        let args = Args::parse();
        let settings = match load_settings(&args) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{}", err);
                return ExitCode::FAILURE;
            }
        };
        let seed = args.seed.or(settings.seed).unwrap_or_else(clock_seed);

        let mut state = GameState::new(settings, seed);
        let mut canvas = HeadlessCanvas::new();
        let budget_ms = args.seconds * 1000.0;
        let mut timestamp = 0.0;
        let mut pressed = false;

        while state.elapsed_ms < budget_ms {
            let target = autopilot_target(&state);
            let input = if pressed {
                InputEvent::PointerMove(target)
            } else {
                pressed = true;
                InputEvent::PointerDown(target)
            };
            handle_input(&mut state, input);

            canvas.reset();
            let result = frame(&mut state, timestamp, &mut canvas);
            for event in &result.events {
                match event {
                    GameEvent::Rescued { counted: true, .. } => {
                        log::info!("Rescued a hatchling (score {})", state.score());
                    }
                    GameEvent::Captured { counted: true, .. } => {
                        log::info!("Lost a hatchling ({} lost)", state.lost_hatchlings());
                    }
                    GameEvent::MatchWon {
                        score,
                        lost_hatchlings,
                    } => {
                        log::info!("Won with {} rescued, {} lost", score, lost_hatchlings);
                    }
                    other => log::trace!("{:?}", other),
                }
            }
            if !result.keep_running {
                break;
            }
            timestamp += args.frame_ms;
        }

        let summary = state.summary();
        if args.json {
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{}", json),
                Err(err) => {
                    log::error!("Failed to encode summary: {}", err);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!(
                "seed {}: {:?} after {:.1}s, score {}, lost {}, {} obstacles, {} passes",
                summary.seed,
                summary.phase,
                summary.elapsed_ms / 1000.0,
                summary.score,
                summary.lost_hatchlings,
                summary.obstacles_placed,
                summary.passes
            );
        }
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run()
}
