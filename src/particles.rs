//! Canvas-2D particle background.

use crate::constants::PARTICLES_CANVAS_ID;
use crate::dom;
use crate::frame::{self, InstantClock};
use showcase_core::constants::RESIZE_THROTTLE_MS;
use showcase_core::particles::ParticleField;
use showcase_core::throttle;
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

struct ParticleCanvas {
    ctx: web::CanvasRenderingContext2d,
    field: ParticleField,
}

impl ParticleCanvas {
    fn draw_frame(&mut self) {
        let (w, h) = (self.field.width(), self.field.height());
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.field.step();
        for p in self.field.particles() {
            self.ctx.begin_path();
            _ = self
                .ctx
                .arc(p.position.x, p.position.y, p.radius, 0.0, TAU);
            self.ctx.set_fill_style_str(&p.fill_style());
            self.ctx.fill();
        }
    }
}

fn fit_to_viewport(canvas: &web::HtmlCanvasElement) -> (f64, f64) {
    let (w, h) = dom::viewport_size();
    canvas.set_width(w.max(0.0) as u32);
    canvas.set_height(h.max(0.0) as u32);
    (w, h)
}

pub fn init(document: &web::Document) -> anyhow::Result<()> {
    let Some(el) = document.get_element_by_id(PARTICLES_CANVAS_ID) else {
        log::debug!("[particles] no #{}, skipping", PARTICLES_CANVAS_ID);
        return Ok(());
    };
    let canvas: web::HtmlCanvasElement = el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let Some(ctx) = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok())
    else {
        log::debug!("[particles] no 2d context, skipping");
        return Ok(());
    };

    let (w, h) = fit_to_viewport(&canvas);
    let field = ParticleField::new(w, h, &mut rand::thread_rng());
    log::info!("[particles] {} particles on {}x{}", field.len(), w, h);
    let state = Rc::new(RefCell::new(ParticleCanvas { ctx, field }));

    let on_resize = {
        let state = state.clone();
        let canvas = canvas.clone();
        throttle(
            InstantClock::new(),
            RESIZE_THROTTLE_MS,
            move |_: web::Event| {
                let (w, h) = fit_to_viewport(&canvas);
                state.borrow_mut().field.resize(w, h);
            },
        )
    };
    if let Some(window) = web::window() {
        dom::listen(&window, "resize", on_resize);
    }

    frame::start_loop(move |_dt| state.borrow_mut().draw_frame());
    Ok(())
}
