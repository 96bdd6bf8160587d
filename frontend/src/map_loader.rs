//! 高德地图 SDK 加载器
//!
//! 同一进程内最多注入一次脚本：并发的 `load()` 共享同一个加载任务，
//! 失败结果同样被缓存，不会自动重试。DOM 操作经由 [`ScriptHost`] 完成，
//! 非浏览器环境（测试）可替换为 mock。

use std::cell::RefCell;

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

pub const AMAP_SCRIPT_ID: &str = "amap-sdk";
const AMAP_SCRIPT_BASE: &str = "https://webapi.amap.com/maps";
const AMAP_PLUGINS: &str = "AMap.Geocoder";

/// 与 `encodeURIComponent` 相同的保留字符
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapLoadError {
    #[error("Map SDK 只能在浏览器环境中加载。")]
    NotBrowser,
    #[error("缺少 TRAVEL_MAP_API_KEY，无法加载高德地图。")]
    MissingApiKey,
    #[error("高德地图脚本加载失败，请检查网络或 API Key。({0})")]
    ScriptLoadFailed(String),
    #[error("高德地图未正确加载，请稍后重试。")]
    SdkUnavailable,
}

/// 待注入的 `<script>` 标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub id: String,
    pub src: String,
}

impl ScriptTag {
    pub fn amap(api_key: &str) -> Self {
        let key = utf8_percent_encode(api_key, URI_COMPONENT);
        Self {
            id: AMAP_SCRIPT_ID.to_string(),
            src: format!("{AMAP_SCRIPT_BASE}?v=2.0&key={key}&plugin={AMAP_PLUGINS}"),
        }
    }
}

/// 宿主环境抽象（浏览器 DOM 或测试替身）
pub trait ScriptHost: Clone + 'static {
    /// SDK 全局对象的句柄
    type Sdk: Clone + 'static;

    fn in_browser(&self) -> bool;

    /// 读取已加载的 SDK 全局对象
    fn sdk(&self) -> Option<Self::Sdk>;

    fn has_script(&self, id: &str) -> bool;

    /// 注入脚本，脚本 onload 时完成，onerror 时返回错误描述
    fn inject(&self, tag: &ScriptTag) -> LocalBoxFuture<'static, Result<(), String>>;
}

type LoadFuture<T> = LocalBoxFuture<'static, Result<T, MapLoadError>>;

pub struct MapLoader<H: ScriptHost> {
    host: H,
    api_key: Option<String>,
    pending: RefCell<Option<Shared<LoadFuture<H::Sdk>>>>,
}

impl<H: ScriptHost> MapLoader<H> {
    pub fn new(host: H, api_key: Option<String>) -> Self {
        Self {
            host,
            api_key,
            pending: RefCell::new(None),
        }
    }

    /// 获取 SDK 句柄
    ///
    /// SDK 已存在时立即返回；否则返回共享的加载任务。
    pub fn load(&self) -> LoadFuture<H::Sdk> {
        if let Some(sdk) = self.host.sdk() {
            return future::ready(Ok(sdk)).boxed_local();
        }

        let shared = self
            .pending
            .borrow_mut()
            .get_or_insert_with(|| self.start().shared())
            .clone();
        shared.boxed_local()
    }

    fn start(&self) -> LoadFuture<H::Sdk> {
        let host = self.host.clone();
        let api_key = self.api_key.clone();

        async move {
            let result = Self::inject_and_read(&host, api_key).await;
            match &result {
                Ok(_) => log_info!("[Map] AMap SDK loaded"),
                Err(e) => log_error!("[Map] {}", e),
            }
            result
        }
        .boxed_local()
    }

    async fn inject_and_read(host: &H, api_key: Option<String>) -> Result<H::Sdk, MapLoadError> {
        if !host.in_browser() {
            return Err(MapLoadError::NotBrowser);
        }
        let key = api_key
            .filter(|k| !k.is_empty())
            .ok_or(MapLoadError::MissingApiKey)?;

        // 已有同 id 标签视为已加载
        if !host.has_script(AMAP_SCRIPT_ID) {
            host.inject(&ScriptTag::amap(&key))
                .await
                .map_err(MapLoadError::ScriptLoadFailed)?;
        }

        host.sdk().ok_or(MapLoadError::SdkUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::rc::Rc;

    type Sdk = Rc<String>;

    #[derive(Default)]
    struct HostState {
        not_browser: Cell<bool>,
        sdk: RefCell<Option<Sdk>>,
        scripts: RefCell<HashSet<String>>,
        injected: RefCell<Vec<ScriptTag>>,
        waiting: RefCell<Vec<oneshot::Sender<Result<(), String>>>>,
    }

    #[derive(Clone, Default)]
    struct MockScriptHost(Rc<HostState>);

    impl MockScriptHost {
        fn injected(&self) -> Vec<ScriptTag> {
            self.0.injected.borrow().clone()
        }

        /// 模拟脚本加载完成；`sdk` 为 None 表示脚本执行后没有挂载全局对象
        fn finish(&self, sdk: Option<&str>) {
            *self.0.sdk.borrow_mut() = sdk.map(|s| Rc::new(s.to_string()));
            for tx in self.0.waiting.borrow_mut().drain(..) {
                let _ = tx.send(Ok(()));
            }
        }

        fn fail(&self, reason: &str) {
            for tx in self.0.waiting.borrow_mut().drain(..) {
                let _ = tx.send(Err(reason.to_string()));
            }
        }
    }

    impl ScriptHost for MockScriptHost {
        type Sdk = Sdk;

        fn in_browser(&self) -> bool {
            !self.0.not_browser.get()
        }

        fn sdk(&self) -> Option<Sdk> {
            self.0.sdk.borrow().clone()
        }

        fn has_script(&self, id: &str) -> bool {
            self.0.scripts.borrow().contains(id)
        }

        fn inject(&self, tag: &ScriptTag) -> LocalBoxFuture<'static, Result<(), String>> {
            let (tx, rx) = oneshot::channel();
            self.0.waiting.borrow_mut().push(tx);
            self.0.scripts.borrow_mut().insert(tag.id.clone());
            self.0.injected.borrow_mut().push(tag.clone());
            async move { rx.await.unwrap_or_else(|_| Err("dropped".to_string())) }.boxed_local()
        }
    }

    fn loader(host: &MockScriptHost) -> MapLoader<MockScriptHost> {
        MapLoader::new(host.clone(), Some("my key".to_string()))
    }

    #[test]
    fn test_script_tag_url() {
        let tag = ScriptTag::amap("a&b c");
        assert_eq!(tag.id, "amap-sdk");
        assert_eq!(
            tag.src,
            "https://webapi.amap.com/maps?v=2.0&key=a%26b%20c&plugin=AMap.Geocoder"
        );
    }

    #[test]
    fn test_script_key_encoded_as_uri_component() {
        assert_eq!(
            ScriptTag::amap("ab cd").src,
            "https://webapi.amap.com/maps?v=2.0&key=ab%20cd&plugin=AMap.Geocoder"
        );
        // encodeURIComponent 保留的字符原样输出
        assert!(ScriptTag::amap("k-_.!~*'()9").src.contains("key=k-_.!~*'()9&"));
        assert!(ScriptTag::amap("a+b/c=").src.contains("key=a%2Bb%2Fc%3D&"));
    }

    #[tokio::test]
    async fn test_overlapping_loads_share_one_injection() {
        let host = MockScriptHost::default();
        let loader = loader(&host);

        let first = loader.load();
        let second = loader.load();
        let (a, b, _) = futures::join!(first, second, async { host.finish(Some("AMap")) });

        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(host.injected().len(), 1);

        // 已加载后直接返回全局对象
        let third = loader.load().await.unwrap();
        assert!(Rc::ptr_eq(&a, &third));
        assert_eq!(host.injected().len(), 1);
    }

    #[tokio::test]
    async fn test_sdk_already_present_skips_injection() {
        let host = MockScriptHost::default();
        *host.0.sdk.borrow_mut() = Some(Rc::new("AMap".to_string()));

        let sdk = loader(&host).load().await.unwrap();

        assert_eq!(sdk.as_str(), "AMap");
        assert!(host.injected().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_rejects_without_injection() {
        let host = MockScriptHost::default();

        for key in [None, Some(String::new())] {
            let err = MapLoader::new(host.clone(), key).load().await.unwrap_err();
            assert_eq!(err, MapLoadError::MissingApiKey);
        }
        assert!(host.injected().is_empty());
    }

    #[tokio::test]
    async fn test_not_browser_rejects() {
        let host = MockScriptHost::default();
        host.0.not_browser.set(true);

        let err = loader(&host).load().await.unwrap_err();

        assert_eq!(err, MapLoadError::NotBrowser);
    }

    #[tokio::test]
    async fn test_failed_load_is_memoized() {
        let host = MockScriptHost::default();
        let loader = loader(&host);

        let (err, _) = futures::join!(loader.load(), async { host.fail("net::ERR_FAILED") });
        assert_eq!(
            err.unwrap_err(),
            MapLoadError::ScriptLoadFailed("net::ERR_FAILED".to_string())
        );

        let again = loader.load().await.unwrap_err();
        assert!(matches!(again, MapLoadError::ScriptLoadFailed(_)));
        assert_eq!(host.injected().len(), 1);
    }

    #[tokio::test]
    async fn test_loaded_script_without_global_rejects() {
        let host = MockScriptHost::default();
        let loader = loader(&host);

        let (result, _) = futures::join!(loader.load(), async { host.finish(None) });

        assert_eq!(result.unwrap_err(), MapLoadError::SdkUnavailable);
    }

    #[tokio::test]
    async fn test_existing_tag_counts_as_loaded() {
        let host = MockScriptHost::default();
        host.0.scripts.borrow_mut().insert(AMAP_SCRIPT_ID.to_string());

        let err = loader(&host).load().await.unwrap_err();

        assert_eq!(err, MapLoadError::SdkUnavailable);
        assert!(host.injected().is_empty());
    }
}
