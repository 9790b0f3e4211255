//! Eggfall entry point
//!
//! Handles platform-specific initialization and runs the game loop. All
//! gameplay decisions live in `eggfall::sim`; this file only adapts browser
//! events to input events and draws snapshots onto a 2D canvas.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use eggfall::consts::{FIELD_HEIGHT, FIELD_WIDTH};
    use eggfall::sim::{
        handle_input, tick, CatcherPos, Direction, GameEvent, GamePhase, GameState, InputEvent,
        Snapshot, LANES,
    };
    use eggfall::{HighScores, Settings};

    /// LocalStorage key for the paused-run save
    const SAVE_KEY: &str = "eggfall_save";

    /// Game instance holding simulation state and presentation bookkeeping
    struct Game {
        state: GameState,
        ctx: CanvasRenderingContext2d,
        settings: Settings,
        highscores: HighScores,
        /// Miss flash overlay alpha, decays per frame
        flash_alpha: f64,
        /// Phase seen last frame, for save/leaderboard transitions
        last_phase: GamePhase,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(state: GameState, ctx: CanvasRenderingContext2d) -> Self {
            let last_phase = state.phase;
            Self {
                state,
                ctx,
                settings: Settings::load(),
                highscores: HighScores::load(),
                flash_alpha: 0.0,
                last_phase,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance the simulation and react to what it reported
        fn update(&mut self, time: f64) {
            tick(&mut self.state, time);

            for event in self.state.take_events() {
                match event {
                    GameEvent::MissFlash => {
                        if self.settings.effective_flash() {
                            self.flash_alpha = 0.6;
                        }
                    }
                    GameEvent::GameOver => {
                        let score = self.state.score;
                        if let Some(rank) = self.highscores.add_score(score, js_sys::Date::now())
                        {
                            log::info!("Run ended with score {} (rank {})", score, rank);
                            self.highscores.save();
                        }
                        clear_saved_game();
                    }
                    GameEvent::Caught => {}
                }
            }

            // Save on pause so a closed tab can continue later
            let phase = self.state.phase;
            if phase != self.last_phase {
                if phase == GamePhase::Paused {
                    self.save_game();
                }
                self.last_phase = phase;
            }

            // FPS over the last 60 frames
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 && time > oldest {
                self.fps = (60_000.0 / (time - oldest)).round() as u32;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let snap = self.state.snapshot();
            if let Err(e) = draw_frame(&self.ctx, &snap, self.flash_alpha) {
                log::warn!("Render error: {:?}", e);
            }
            self.flash_alpha = (self.flash_alpha - 0.02).max(0.0);
        }

        /// Update HUD elements in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let snap = self.state.snapshot();
            if let Some(el) = document.get_element_by_id("status") {
                let hearts = "\u{2764}".repeat(snap.lives as usize);
                el.set_text_content(Some(&format!("{:06} | {}", snap.score, hearts)));
            }

            if let Some(el) = document.get_element_by_id("best") {
                if let Some(best) = self.highscores.top_score() {
                    el.set_text_content(Some(&format!("Best: {:06}", best)));
                }
            }

            if let Some(el) = document.get_element_by_id("fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    el.set_text_content(None);
                }
            }
        }

        /// Save game state to LocalStorage
        fn save_game(&self) {
            if let Ok(json) = serde_json::to_string(&self.state) {
                if let Some(storage) = web_sys::window()
                    .and_then(|w| w.local_storage().ok())
                    .flatten()
                {
                    let _ = storage.set_item(SAVE_KEY, &json);
                    log::info!("Game saved (score {})", self.state.score);
                }
            }
        }
    }

    /// Load saved game from LocalStorage
    fn load_saved_game() -> Option<GameState> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let json = storage.get_item(SAVE_KEY).ok()??;
        serde_json::from_str(&json).ok()
    }

    /// Clear saved game from LocalStorage
    fn clear_saved_game() {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.remove_item(SAVE_KEY);
        }
    }

    // --- Canvas drawing ------------------------------------------------------

    fn draw_frame(
        ctx: &CanvasRenderingContext2d,
        snap: &Snapshot,
        flash_alpha: f64,
    ) -> Result<(), JsValue> {
        let (w, h) = (FIELD_WIDTH as f64, FIELD_HEIGHT as f64);
        ctx.clear_rect(0.0, 0.0, w, h);

        draw_lanes(ctx);
        draw_eggs(ctx, snap)?;
        draw_catcher(ctx, snap.catcher)?;

        if flash_alpha > 0.0 {
            ctx.save();
            ctx.set_global_alpha(flash_alpha);
            ctx.set_fill_style_str("rgb(220, 20, 20)");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.restore();
        }

        if snap.paused {
            draw_overlay(ctx, snap.game_over)?;
        }
        Ok(())
    }

    fn draw_lanes(ctx: &CanvasRenderingContext2d) {
        ctx.save();
        ctx.set_stroke_style_str("rgba(30, 50, 32, 0.9)");
        ctx.set_line_width(6.0);
        for lane in &LANES {
            ctx.begin_path();
            ctx.move_to(lane.start.x as f64, lane.start.y as f64);
            ctx.line_to(lane.end.x as f64, lane.end.y as f64);
            ctx.stroke();
        }
        ctx.restore();
    }

    fn draw_eggs(ctx: &CanvasRenderingContext2d, snap: &Snapshot) -> Result<(), JsValue> {
        ctx.save();
        for egg in &snap.eggs {
            // Clamped lookup at the rendering boundary
            let lane = LANES[egg.lane.min(LANES.len() - 1)];
            let p = lane.point_at(egg.progress as f32);
            let tilt = if egg.lane < 2 { -0.35 } else { 0.35 };

            ctx.translate(p.x as f64, p.y as f64)?;
            ctx.rotate(tilt)?;
            ctx.set_fill_style_str("#fff8d9");
            ctx.set_stroke_style_str("#a48e3b");
            ctx.set_line_width(2.0);
            ctx.begin_path();
            ctx.ellipse(0.0, 0.0, 14.0, 18.0, 0.0, 0.0, TAU)?;
            ctx.fill();
            ctx.stroke();
            ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        }
        ctx.restore();
        Ok(())
    }

    fn draw_catcher(ctx: &CanvasRenderingContext2d, pos: CatcherPos) -> Result<(), JsValue> {
        let paw = LANES[pos.lane()].end;
        let body_x = if pos.is_left() { 300.0 } else { 420.0 };
        let body_y = if pos.is_top() { 310.0 } else { 330.0 };

        ctx.save();
        ctx.set_fill_style_str("#6f6f6f");
        ctx.set_stroke_style_str("#3c3c3c");
        ctx.set_line_width(3.0);

        // Torso and head
        ctx.fill_rect(body_x - 28.0, body_y - 40.0, 56.0, 80.0);
        ctx.stroke_rect(body_x - 28.0, body_y - 40.0, 56.0, 80.0);
        ctx.fill_rect(body_x - 22.0, body_y - 78.0, 44.0, 36.0);
        ctx.stroke_rect(body_x - 22.0, body_y - 78.0, 44.0, 36.0);

        // Arm toward the guarded lane, paw at the catch point
        ctx.set_stroke_style_str("#777");
        ctx.set_line_width(12.0);
        ctx.begin_path();
        ctx.move_to(body_x, body_y - 20.0);
        ctx.line_to(paw.x as f64, paw.y as f64);
        ctx.stroke();

        ctx.set_fill_style_str("#888");
        ctx.begin_path();
        ctx.arc(paw.x as f64, paw.y as f64, 14.0, 0.0, TAU)?;
        ctx.fill();

        ctx.restore();
        Ok(())
    }

    fn draw_overlay(ctx: &CanvasRenderingContext2d, game_over: bool) -> Result<(), JsValue> {
        let (w, h) = (FIELD_WIDTH as f64, FIELD_HEIGHT as f64);
        let (title, hint) = if game_over {
            ("Game Over", "Press R to reset")
        } else {
            ("Paused", "Press P to resume")
        };

        ctx.save();
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.35)");
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str("#9fd2ff");
        ctx.set_font("bold 28px system-ui, sans-serif");
        ctx.set_text_align("center");
        ctx.fill_text(title, w / 2.0, h / 2.0 - 6.0)?;

        ctx.set_fill_style_str("#bfe6ff");
        ctx.set_font("16px system-ui, sans-serif");
        ctx.fill_text(hint, w / 2.0, h / 2.0 + 22.0)?;
        ctx.restore();
        Ok(())
    }

    // --- Startup and event wiring --------------------------------------------

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Eggfall starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .ok_or_else(|| JsValue::from_str("no #game canvas"))?
            .dyn_into()?;
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        // Continue a paused run if one was saved, otherwise start fresh
        let state = match load_saved_game() {
            Some(saved) => {
                log::info!("Continuing saved run (score {})", saved.score);
                saved
            }
            None => {
                let seed = js_sys::Date::now() as u64;
                log::info!("New run with seed {}", seed);
                GameState::new(seed)
            }
        };

        let game = Rc::new(RefCell::new(Game::new(state, ctx)));

        setup_input_handlers(game.clone());
        if game.borrow().settings.auto_pause_on_blur {
            setup_auto_pause(game.clone());
        }

        request_animation_frame(game);

        log::info!("Eggfall running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            // Shell-level preference toggle, not a sim input
            if matches!(event.key().as_str(), "f" | "F") {
                let mut g = game.borrow_mut();
                g.settings.show_fps = !g.settings.show_fps;
                g.settings.save();
                log::info!("FPS counter: {}", g.settings.show_fps);
                return;
            }

            let input = match event.key().as_str() {
                "ArrowUp" | "w" | "W" => Some(InputEvent::Move(Direction::Up)),
                "ArrowDown" | "s" | "S" => Some(InputEvent::Move(Direction::Down)),
                "ArrowLeft" | "a" | "A" => Some(InputEvent::Move(Direction::Left)),
                "ArrowRight" | "d" | "D" => Some(InputEvent::Move(Direction::Right)),
                "p" | "P" | "Escape" => Some(InputEvent::PauseToggle),
                "r" | "R" => Some(InputEvent::Reset),
                _ => None,
            };
            if let Some(input) = input {
                event.prevent_default();
                handle_input(&mut game.borrow_mut().state, input);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        handle_input(&mut g.state, InputEvent::PauseToggle);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    handle_input(&mut g.state, InputEvent::PauseToggle);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();
    log::info!("Eggfall (native) starting headless demo...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    run_demo(seed);
}

/// Headless autoplay: the catcher chases the most advanced egg. Exercises
/// the full simulation without a browser.
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(seed: u64) {
    use eggfall::sim::{handle_input, tick, GamePhase, GameState, InputEvent};

    const FRAME_MS: f64 = 16.0;
    const DEMO_LIMIT_MS: f64 = 120_000.0;

    let mut state = GameState::new(seed);
    let mut now = 0.0;

    while state.phase != GamePhase::GameOver && now < DEMO_LIMIT_MS {
        if let Some(dir) = chase_direction(&state) {
            handle_input(&mut state, InputEvent::Move(dir));
        }
        tick(&mut state, now);
        now += FRAME_MS;
    }

    println!(
        "Demo over: seed {} score {} lives {} after {:.1}s ({} ticks)",
        seed,
        state.score,
        state.lives,
        now / 1000.0,
        state.time_ticks
    );
}

/// Direction of the single step that brings the catcher closer to the lane
/// of the most advanced egg, if any.
#[cfg(not(target_arch = "wasm32"))]
fn chase_direction(state: &eggfall::sim::GameState) -> Option<eggfall::sim::Direction> {
    use eggfall::sim::{CatcherPos, Direction};

    let target = state
        .eggs
        .iter()
        .max_by(|a, b| {
            a.progress
                .partial_cmp(&b.progress)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| CatcherPos::from_lane(e.lane))?;

    if target == state.catcher {
        return None;
    }
    if target.is_left() != state.catcher.is_left() {
        Some(if target.is_left() {
            Direction::Left
        } else {
            Direction::Right
        })
    } else if target.is_top() {
        Some(Direction::Up)
    } else {
        Some(Direction::Down)
    }
}
