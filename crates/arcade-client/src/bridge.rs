use crate::app::App;

#[cfg(target_family = "wasm")]
use wasm_bindgen::JsCast;

/// Push the UI state to `window._arcadeUpdate` when it changed since the last
/// push.
pub fn push_ui_state(app: &mut App) {
    let Some(json_str) = app.ui_update() else {
        return;
    };
    #[cfg(target_family = "wasm")]
    call_window_fn("_arcadeUpdate", &json_str);
    #[cfg(not(target_family = "wasm"))]
    let _ = json_str;
}

#[cfg(target_family = "wasm")]
fn call_window_fn(name: &str, json_arg: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(val) = js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str(name)) else {
        return;
    };
    if !val.is_function() {
        return;
    }
    let func: js_sys::Function = val.unchecked_into();
    let result = match js_sys::JSON::parse(json_arg) {
        Ok(parsed) => func.call1(&wasm_bindgen::JsValue::NULL, &parsed),
        Err(e) => {
            crate::diag::console_warn!("JSON parse failed for {name}: {e:?}");
            return;
        },
    };
    if let Err(e) = result {
        crate::diag::console_warn!("JS bridge {name} failed: {e:?}");
    }
}

/// Publish `closure` as `window[name]` for the page's event handlers.
#[cfg(target_family = "wasm")]
fn expose<T>(window: &web_sys::Window, name: &str, closure: wasm_bindgen::closure::Closure<T>)
where
    T: ?Sized + wasm_bindgen::closure::WasmClosure,
{
    if let Err(e) = js_sys::Reflect::set(window, &name.into(), closure.as_ref().unchecked_ref()) {
        crate::diag::console_warn!("Could not expose {name}: {e:?}");
    }
    closure.forget();
}

/// Register the `window._arcade*` callbacks the page calls into. Each one
/// mutates the app and pushes the new state back.
#[cfg(target_family = "wasm")]
pub fn attach_ui_callbacks(app: &std::rc::Rc<std::cell::RefCell<App>>) {
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;

    use arcade_core::game_trait::GameInput;

    let Some(window) = web_sys::window() else {
        return;
    };

    // _arcadeOpen(id)
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(u32)>::new(move |id: u32| {
            let mut app = app.borrow_mut();
            app.open(id);
            push_ui_state(&mut app);
        });
        expose(&window, "_arcadeOpen", closure);
    }

    // _arcadeClose()
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut app = app.borrow_mut();
            app.close();
            push_ui_state(&mut app);
        });
        expose(&window, "_arcadeClose", closure);
    }

    // _arcadeRestart()
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut app = app.borrow_mut();
            app.restart();
            push_ui_state(&mut app);
        });
        expose(&window, "_arcadeRestart", closure);
    }

    // _arcadeSearch(text)
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(String)>::new(move |text: String| {
            let mut app = app.borrow_mut();
            app.search(&text);
            push_ui_state(&mut app);
        });
        expose(&window, "_arcadeSearch", closure);
    }

    // _arcadeCategory(value)
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(String)>::new(move |value: String| {
            let mut app = app.borrow_mut();
            if let Err(e) = app.set_category(&value) {
                crate::diag::console_warn!("{e}");
                return;
            }
            push_ui_state(&mut app);
        });
        expose(&window, "_arcadeCategory", closure);
    }

    // _arcadeSelect(index)
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(u32)>::new(move |index: u32| {
            let mut app = app.borrow_mut();
            app.input(&GameInput::Select(index as usize));
            push_ui_state(&mut app);
        });
        expose(&window, "_arcadeSelect", closure);
    }

    // _arcadeAnswer(yes)
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(bool)>::new(move |yes: bool| {
            let mut app = app.borrow_mut();
            app.input(&GameInput::Answer(yes));
            push_ui_state(&mut app);
        });
        expose(&window, "_arcadeAnswer", closure);
    }

    // _arcadeSubmit(text)
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut(String)>::new(move |text: String| {
            let mut app = app.borrow_mut();
            app.input(&GameInput::Submit(text));
            push_ui_state(&mut app);
        });
        expose(&window, "_arcadeSubmit", closure);
    }

    // _arcadePress()
    {
        let app = Rc::clone(app);
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut app = app.borrow_mut();
            app.input(&GameInput::Press);
            push_ui_state(&mut app);
        });
        expose(&window, "_arcadePress", closure);
    }
}

#[cfg(not(target_family = "wasm"))]
pub fn attach_ui_callbacks(_app: &std::rc::Rc<std::cell::RefCell<App>>) {}

/// Route document key presses to the app: Escape closes the modal, arrows go
/// to the running game.
#[cfg(target_family = "wasm")]
pub fn attach_key_listener(app: &std::rc::Rc<std::cell::RefCell<App>>) {
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let app = Rc::clone(app);
    let closure =
        Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |evt: web_sys::KeyboardEvent| {
            let mut app = app.borrow_mut();
            if app.on_key(&evt.key()) {
                evt.prevent_default();
                push_ui_state(&mut app);
            }
        });
    let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}

#[cfg(not(target_family = "wasm"))]
pub fn attach_key_listener(_app: &std::rc::Rc<std::cell::RefCell<App>>) {}

/// Drive game time from `requestAnimationFrame`, pushing state while a game
/// is open.
#[cfg(target_family = "wasm")]
pub fn start_frame_loop(app: &std::rc::Rc<std::cell::RefCell<App>>) {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;

    type FrameCallback = Closure<dyn FnMut(f64)>;

    let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&slot);
    let app = Rc::clone(app);

    *slot.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |ts: f64| {
        {
            let mut app = app.borrow_mut();
            if app.frame(ts) {
                push_ui_state(&mut app);
            }
        }
        if let Some(window) = web_sys::window()
            && let Some(cb) = next.borrow().as_ref()
        {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }));

    if let Some(window) = web_sys::window()
        && let Some(cb) = slot.borrow().as_ref()
    {
        let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

#[cfg(not(target_family = "wasm"))]
pub fn start_frame_loop(_app: &std::rc::Rc<std::cell::RefCell<App>>) {}
