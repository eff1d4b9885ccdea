pub mod app;
mod bridge;
mod diag;
pub mod input;
pub mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use arcade_core::config::ArcadeConfig;
use arcade_games::config::GamesConfig;

use app::App;
use storage::LocalStorageStore;

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_family = "wasm")]
    console_error_panic_hook::set_once();

    let config = ArcadeConfig::load();
    let games = GamesConfig::load();
    let store = LocalStorageStore::new(config.storage_key.clone());
    let app = Rc::new(RefCell::new(App::from_config(
        &config,
        games,
        Box::new(store),
        browser_seed(),
    )));

    bridge::attach_ui_callbacks(&app);
    bridge::attach_key_listener(&app);
    bridge::push_ui_state(&mut app.borrow_mut());
    bridge::start_frame_loop(&app);
}

fn browser_seed() -> u64 {
    let high = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let low = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (high << 32) | low
}

#[cfg(test)]
mod tests {
    const PAGE: &str = include_str!("../../../web/index.html");

    #[test]
    fn backdrop_click_closes_the_modal() {
        assert!(PAGE.contains(
            r#"<div id="modal" onclick="if (event.target.id === 'modal') window._arcadeClose()">"#
        ));
    }

    #[test]
    fn enter_submits_the_guess() {
        assert!(
            PAGE.contains(r#"onkeydown="if (event.key === 'Enter') window._arcadeSubmit(this.value)""#)
        );
    }

    #[test]
    fn page_calls_only_exposed_callbacks() {
        let exposed = [
            "_arcadeOpen",
            "_arcadeClose",
            "_arcadeRestart",
            "_arcadeSearch",
            "_arcadeCategory",
            "_arcadeSelect",
            "_arcadeAnswer",
            "_arcadeSubmit",
            "_arcadePress",
        ];
        for call in PAGE.split("window._arcade").skip(1) {
            let name: String = call.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
            let name = format!("_arcade{name}");
            assert!(name == "_arcadeUpdate" || exposed.contains(&name.as_str()), "{name}");
        }
    }
}
