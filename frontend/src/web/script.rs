//! 浏览器脚本注入
//!
//! 为地图加载器提供真实 DOM 实现：创建 `<script>` 标签并等待 onload/onerror。

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlScriptElement};

use crate::config::AppConfig;
use crate::map_loader::{MapLoadError, MapLoader, ScriptHost, ScriptTag};

/// `window.AMap` 全局对象
#[derive(Debug, Clone)]
pub struct AmapHandle(JsValue);

impl AmapHandle {
    pub fn as_js(&self) -> &JsValue {
        &self.0
    }
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScriptHost;

type LoadSignal = Rc<RefCell<Option<oneshot::Sender<Result<(), String>>>>>;

impl BrowserScriptHost {
    fn append_script(tag: &ScriptTag) -> Result<oneshot::Receiver<Result<(), String>>, String> {
        let document = document().ok_or("document unavailable")?;
        let script: HtmlScriptElement = document
            .create_element("script")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| "created element is not a <script>".to_string())?;

        script.set_id(&tag.id);
        script.set_type("text/javascript");
        script.set_async(true);
        script.set_defer(true);
        script.set_src(&tag.src);

        let (tx, rx) = oneshot::channel();
        let signal: LoadSignal = Rc::new(RefCell::new(Some(tx)));

        let on_load = {
            let signal = signal.clone();
            Closure::<dyn FnMut()>::new(move || {
                if let Some(tx) = signal.borrow_mut().take() {
                    let _ = tx.send(Ok(()));
                }
            })
        };
        let src = tag.src.clone();
        let on_error = Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = signal.borrow_mut().take() {
                let _ = tx.send(Err(format!("failed to load {src}")));
            }
        });

        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        script.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        // 脚本标签存活期间回调必须有效
        on_load.forget();
        on_error.forget();

        let head = document.head().ok_or("document has no <head>")?;
        head.append_child(&script).map_err(js_err)?;

        Ok(rx)
    }
}

impl ScriptHost for BrowserScriptHost {
    type Sdk = AmapHandle;

    fn in_browser(&self) -> bool {
        document().is_some()
    }

    fn sdk(&self) -> Option<AmapHandle> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str("AMap")).ok()?;
        if value.is_undefined() || value.is_null() {
            None
        } else {
            Some(AmapHandle(value))
        }
    }

    fn has_script(&self, id: &str) -> bool {
        document()
            .and_then(|d| d.get_element_by_id(id))
            .is_some()
    }

    fn inject(&self, tag: &ScriptTag) -> LocalBoxFuture<'static, Result<(), String>> {
        match Self::append_script(tag) {
            Ok(rx) => async move {
                rx.await
                    .unwrap_or_else(|_| Err("script listener dropped".to_string()))
            }
            .boxed_local(),
            Err(e) => future::ready(Err(e)).boxed_local(),
        }
    }
}

thread_local! {
    static AMAP_LOADER: MapLoader<BrowserScriptHost> =
        MapLoader::new(BrowserScriptHost, AppConfig::from_env().map_api_key);
}

/// 加载高德地图 SDK（全局只注入一次）
pub async fn load_amap() -> Result<AmapHandle, MapLoadError> {
    AMAP_LOADER.with(MapLoader::load).await
}
