#[cfg(target_arch = "wasm32")]
use desktop_app_contract::window_primary_input_dom_id;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

use crate::model::{Viewport, WindowId};

const MIN_VIEWPORT_WIDTH: i32 = 320;
const MIN_VIEWPORT_HEIGHT: i32 = 220;

pub(super) fn focus_window_input(window_id: WindowId) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let dom_id = window_primary_input_dom_id(window_id.as_str());
        let Some(element) = document.get_element_by_id(&dom_id) else {
            return;
        };
        let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() else {
            return;
        };
        let callback = Closure::once_into_js(move || {
            let _ = element.focus();
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = window_id;
}

pub(super) fn desktop_viewport() -> Viewport {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let width = window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(crate::model::DEFAULT_VIEWPORT_WIDTH);
            let height = window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(crate::model::DEFAULT_VIEWPORT_HEIGHT + crate::model::TASKBAR_HEIGHT);

            return clamp_viewport(width, height - crate::model::TASKBAR_HEIGHT);
        }
    }

    Viewport::default()
}

fn clamp_viewport(width: i32, height: i32) -> Viewport {
    Viewport {
        width: width.max(MIN_VIEWPORT_WIDTH),
        height: height.max(MIN_VIEWPORT_HEIGHT),
    }
}
