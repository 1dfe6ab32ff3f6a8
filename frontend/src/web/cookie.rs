use maestro_shared::cookie::find_cookie;
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

/// 读取当前文档中名为 `name` 的 cookie
pub fn get_cookie(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let cookies = document.dyn_into::<HtmlDocument>().ok()?.cookie().ok()?;
    find_cookie(&cookies, name)
}
