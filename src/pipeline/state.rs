//! 帖子状态缓存
//!
//! 状态直接以属性形式挂在帖子节点上（`class` 中的隐藏标记加两个 data 属性），
//! 节点被页面移除时状态随之消失，查询状态不会延长节点的生命周期。

use markup5ever_rcdom::Handle;

use crate::config::constants;
use crate::parsers::html::{
    find_elements, get_node_attr, has_class, remove_class, set_node_attr, toggle_class,
};

/// 单个帖子的记忆状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostState {
    pub processed: bool,
    /// 分类时引擎的启用状态；为 None 表示从未记录
    pub classified_under_enabled: Option<bool>,
    pub hidden: bool,
}

impl PostState {
    /// 记忆结果在当前启用状态下是否仍然有效
    pub fn is_fresh(&self, engine_enabled: bool) -> bool {
        self.processed && self.classified_under_enabled == Some(engine_enabled)
    }
}

/// 节点属性上的状态读写器
#[derive(Debug, Clone)]
pub struct PostStateCache {
    hidden_class: String,
    processed_attr: String,
    enabled_attr: String,
}

impl Default for PostStateCache {
    fn default() -> Self {
        Self {
            hidden_class: constants::HIDDEN_CLASS.to_string(),
            processed_attr: constants::PROCESSED_ATTR.to_string(),
            enabled_attr: constants::ENABLED_ATTR.to_string(),
        }
    }
}

fn flag(value: bool) -> Option<String> {
    Some(if value { "true" } else { "false" }.to_string())
}

impl PostStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hidden_class(&self) -> &str {
        &self.hidden_class
    }

    /// 读取节点上的状态
    pub fn read(&self, post: &Handle) -> PostState {
        let processed = get_node_attr(post, &self.processed_attr).as_deref() == Some("true");
        let classified_under_enabled = match get_node_attr(post, &self.enabled_attr).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        PostState {
            processed,
            classified_under_enabled,
            hidden: self.is_hidden(post),
        }
    }

    /// 是否可以跳过重新分类
    pub fn should_skip(&self, post: &Handle, engine_enabled: bool) -> bool {
        self.read(post).is_fresh(engine_enabled)
    }

    pub fn is_hidden(&self, post: &Handle) -> bool {
        has_class(post, &self.hidden_class)
    }

    /// 切换隐藏标记，返回是否发生变化
    pub fn set_hidden(&self, post: &Handle, hidden: bool) -> bool {
        toggle_class(post, &self.hidden_class, hidden)
    }

    /// 记录分类结果，返回节点是否发生变化
    pub fn record(&self, post: &Handle, hidden: bool, engine_enabled: bool) -> bool {
        let mut changed = self.set_hidden(post, hidden);
        changed |= set_node_attr(post, &self.processed_attr, flag(true));
        changed |= set_node_attr(post, &self.enabled_attr, flag(engine_enabled));
        changed
    }

    /// 清除隐藏标记和已处理标记
    pub fn reset(&self, post: &Handle) -> bool {
        let mut changed = remove_class(post, &self.hidden_class);
        changed |= set_node_attr(post, &self.processed_attr, flag(false));
        changed
    }

    /// 树中仍带有隐藏标记的所有元素
    pub fn hidden_elements(&self, root: &Handle) -> Vec<Handle> {
        find_elements(root, |node| has_class(node, &self.hidden_class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{first_element_by_name, html_to_dom};

    fn post() -> (markup5ever_rcdom::RcDom, Handle) {
        let dom = html_to_dom(b"<article class=\"feed\">text</article>", "utf-8").unwrap();
        let article = first_element_by_name(&dom.document, "article").unwrap();
        (dom, article)
    }

    #[test]
    fn test_unprocessed_post_is_not_skipped() {
        let (_dom, post) = post();
        let cache = PostStateCache::new();
        assert_eq!(cache.read(&post), PostState::default());
        assert!(!cache.should_skip(&post, true));
    }

    #[test]
    fn test_skip_only_under_same_enabled_flag() {
        let (_dom, post) = post();
        let cache = PostStateCache::new();

        assert!(cache.record(&post, true, true));
        assert!(cache.should_skip(&post, true));
        assert!(!cache.should_skip(&post, false));
        assert!(cache.is_hidden(&post));
        assert_eq!(get_node_attr(&post, "class").as_deref(), Some("feed feedfilter-hidden"));
    }

    #[test]
    fn test_record_twice_is_not_a_change() {
        let (_dom, post) = post();
        let cache = PostStateCache::new();

        assert!(cache.record(&post, false, true));
        assert!(!cache.record(&post, false, true));
    }

    #[test]
    fn test_reset_clears_hidden_and_processed() {
        let (_dom, post) = post();
        let cache = PostStateCache::new();
        cache.record(&post, true, true);

        assert!(cache.reset(&post));
        let state = cache.read(&post);
        assert!(!state.processed);
        assert!(!state.hidden);
        assert!(!cache.should_skip(&post, true));
    }

    #[test]
    fn test_hidden_elements_scan() {
        let dom = html_to_dom(
            b"<div class=\"feedfilter-hidden\"></div><div></div><p class=\"a feedfilter-hidden\"></p>",
            "utf-8",
        )
        .unwrap();
        let cache = PostStateCache::new();
        assert_eq!(cache.hidden_elements(&dom.document).len(), 2);
    }
}
