use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;

use super::fetcher::{Arrival, Fetcher};
use super::model::Model;
use super::update::{Message, update};
use super::App;
use crate::image::ThumbCache;
use crate::remote::{DEFAULT_ENDPOINT, PixabayClient};

impl App {
    /// Run the application: set up the terminal, wire up the fetcher, and
    /// drive the event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        // Query the terminal for its graphics protocol before ratatui takes
        // over raw mode; the query reads from stdin.
        let picker = if self.images_enabled {
            crate::image::create_picker(self.force_half_cell)
        } else {
            None
        };

        let endpoint = self
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let mut client = PixabayClient::with_endpoint(self.api_key.clone(), endpoint);
        if let Some(per_page) = self.per_page {
            client = client.with_per_page(per_page);
        }
        let fetcher = Fetcher::new(Arc::new(client));
        let cache = ThumbCache::default();

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal (pixseek needs an interactive terminal)")?;
        let size = terminal.size().context("Failed to query terminal size")?;

        let mut model = Model::new((size.width, size.height)).with_picker(picker);
        model.images_enabled = self.images_enabled;
        model.config_global_path = self.config_global_path.clone();
        model.config_local_path = self.config_local_path.clone();

        if let Some(query) = self.initial_query.take() {
            model.input = query;
            model = update(model, Message::SubmitQuery);
            Self::handle_message_side_effects(&mut model, &fetcher, &Message::SubmitQuery);
        }

        let result = Self::event_loop(&mut terminal, &mut model, &fetcher, &cache);
        ratatui::restore();
        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        fetcher: &Fetcher,
        cache: &ThumbCache,
    ) -> Result<()> {
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            // Apply fetch completions before taking new input so the user
            // never navigates a gallery the session has already replaced.
            while let Some(arrival) = fetcher.try_recv() {
                match arrival {
                    Arrival::Page {
                        generation,
                        page,
                        outcome,
                    } => {
                        crate::perf::log_event(
                            "fetch.page.arrived",
                            format!("generation={generation} page={page} ok={}", outcome.is_ok()),
                        );
                        let msg = Message::PageArrived {
                            generation,
                            outcome,
                        };
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        Self::handle_message_side_effects(model, fetcher, &side_msg);
                    }
                    Arrival::Thumbnail { url, outcome } => {
                        model.thumbs_pending.remove(&url);
                        match outcome {
                            Ok(bytes) => {
                                if let Some(decoded) = crate::image::decode_thumbnail(&bytes) {
                                    cache.insert(url, decoded);
                                } else {
                                    crate::perf::log_event("thumb.decode.failed", &url);
                                }
                            }
                            Err(err) => {
                                crate::perf::log_event(
                                    "thumb.fetch.failed",
                                    format!("url={url} err={err}"),
                                );
                            }
                        }
                    }
                }
                needs_render = true;
            }

            // Poll adaptively: spin fast while work is in flight, otherwise
            // sleep long enough to keep the process quiet.
            let poll_ms = if needs_render {
                0
            } else if model.session.is_loading() || !model.thumbs_pending.is_empty() {
                30
            } else {
                250
            };

            if event::poll(Duration::from_millis(poll_ms))? {
                if let Some(msg) = Self::handle_event(&event::read()?, model) {
                    crate::perf::log_event("event.message", format!("frame={frame_idx} {msg:?}"));
                    let side_msg = msg.clone();
                    *model = update(std::mem::take(model), msg);
                    Self::handle_message_side_effects(model, fetcher, &side_msg);
                    needs_render = true;
                }
                // Coalesce key-repeat bursts into a single render.
                while event::poll(Duration::ZERO)? {
                    if let Some(msg) = Self::handle_event(&event::read()?, model) {
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        Self::handle_message_side_effects(model, fetcher, &side_msg);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                frame_idx += 1;
                model.load_visible_thumbs(cache, fetcher);
                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={frame_idx} draw_ms={:.3}",
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
