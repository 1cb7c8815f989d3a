#![cfg(target_arch = "wasm32")]
use animator::Animator;
use viewer::ViewerSlot;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod animator;
mod constants;
mod dom;
mod frame;
mod magnetic;
mod material;
mod particles;
mod reveal;
mod slider;
mod viewer;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("showcase-web starting");

    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if document.ready_state() == "loading" {
        let closure = Closure::once(run);
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            closure.as_ref().unchecked_ref(),
        )?;
        closure.forget();
    } else {
        run();
    }
    Ok(())
}

fn run() {
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let animator = Animator::new();
    animator.start();
    let viewer_slot = ViewerSlot::new();

    // each effect stands alone; one failing leaves the rest running
    if let Err(e) = particles::init(&document) {
        log::warn!("[particles] {:?}", e);
    }
    if let Err(e) = reveal::init(&document, &animator) {
        log::warn!("[reveal] {:?}", e);
    }
    if let Err(e) = magnetic::init(&document, &animator) {
        log::warn!("[magnetic] {:?}", e);
    }
    if let Err(e) = slider::init(&document, &animator) {
        log::warn!("[slider] {:?}", e);
    }
    if let Err(e) = material::init(&document, &animator, viewer_slot.clone()) {
        log::warn!("[material] {:?}", e);
    }

    if let Err(e) = viewer::init(document.clone(), viewer_slot).await {
        log::error!("[viewer] {:?}", e);
        viewer::show_fallback(&document);
    }
    Ok(())
}
