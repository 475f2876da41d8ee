//! 帖子结构定位器
//!
//! 信息流页面的样式类名是哈希生成的，随时会变，不能拿来识别帖子。
//! 这里按优先级依次尝试四种结构推断策略，前一种一无所获时才尝试下一种：
//!
//! 1. **语义标识**：带有 activity URN 形态标识属性的元素
//! 2. **互动按钮上溯**：从每个 "React" 按钮向上走，保留满足帖子形态的最大祖先
//! 3. **头像上溯**：从每张头像图片向上走，取第一个看起来像单个帖子的祖先
//! 4. **区域扫描**：扫描主内容区中全部候选容器，按文本长度升序收录
//!
//! 所有策略的结果都经过 [`PostSet::add_unique`] 去重：与已收录元素存在祖先/后代
//! 关系的元素一律丢弃，先收录者胜出。因此同一次定位结果里任意两个帖子互不包含。

use markup5ever_rcdom::Handle;
use std::rc::Rc;

use crate::config::LocatorConfig;
use crate::parsers::html::{
    contains, count_descendants, find_elements, find_in_region, first_element_by_name,
    get_node_attr, get_parent_element, has_descendant, is_element_named, text_content,
};

/// 定位策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    PrimarySelector,
    ReactionAnchor,
    ImageAnchor,
    RegionScan,
}

/// 策略尝试顺序
pub const STRATEGY_ORDER: [Strategy; 4] = [
    Strategy::PrimarySelector,
    Strategy::ReactionAnchor,
    Strategy::ImageAnchor,
    Strategy::RegionScan,
];

/// 按收录顺序保存、互不包含的帖子集合
#[derive(Debug, Default)]
pub struct PostSet {
    posts: Vec<Handle>,
}

impl PostSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 收录元素；与已收录元素重复或存在包含关系时拒绝
    pub fn add_unique(&mut self, el: &Handle) -> bool {
        for existing in &self.posts {
            if Rc::ptr_eq(existing, el) || contains(existing, el) || contains(el, existing) {
                return false;
            }
        }
        self.posts.push(el.clone());
        true
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn as_slice(&self) -> &[Handle] {
        &self.posts
    }

    pub fn into_vec(self) -> Vec<Handle> {
        self.posts
    }
}

/// 一次定位的结果
#[derive(Debug, Default)]
pub struct Location {
    /// 产出结果的策略；全部落空时为 None
    pub strategy: Option<Strategy>,
    pub posts: Vec<Handle>,
}

/// 结构定位器
#[derive(Debug, Clone, Default)]
pub struct Locator {
    config: LocatorConfig,
}

impl Locator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// 定位当前树中的全部帖子
    pub fn locate(&self, root: &Handle) -> Vec<Handle> {
        self.locate_detailed(root).posts
    }

    /// 定位并报告命中的策略
    pub fn locate_detailed(&self, root: &Handle) -> Location {
        for strategy in STRATEGY_ORDER {
            let posts = self.run_strategy(strategy, root);
            if !posts.is_empty() {
                tracing::debug!(?strategy, found = posts.len(), "定位到帖子");
                return Location {
                    strategy: Some(strategy),
                    posts,
                };
            }
        }

        tracing::debug!("所有定位策略均未找到帖子");
        Location::default()
    }

    /// 单独运行某一种策略
    pub fn run_strategy(&self, strategy: Strategy, root: &Handle) -> Vec<Handle> {
        match strategy {
            Strategy::PrimarySelector => self.primary_selector(root),
            Strategy::ReactionAnchor => self.reaction_anchor_walk(root),
            Strategy::ImageAnchor => self.image_anchor_walk(root),
            Strategy::RegionScan => self.region_scan(root),
        }
    }

    /// 策略一：语义标识属性
    pub fn primary_selector(&self, root: &Handle) -> Vec<Handle> {
        let mut posts = PostSet::new();
        for el in find_elements(root, |node| self.is_post_identifier(node)) {
            posts.add_unique(&el);
        }
        posts.into_vec()
    }

    /// 策略二：从互动按钮向上寻找最大的合格容器
    pub fn reaction_anchor_walk(&self, root: &Handle) -> Vec<Handle> {
        let cfg = &self.config;
        let mut posts = PostSet::new();

        let buttons = find_in_region(root, &cfg.region_tag, |node| self.is_reaction_control(node));
        for button in buttons {
            let mut container = get_parent_element(&button);
            let mut best_candidate: Option<Handle> = None;

            for _ in 0..cfg.reaction_walk_depth {
                let Some(current) = container else {
                    break;
                };

                let len = text_content(&current).chars().count();
                // 再往上只会是更大的容器
                if len > cfg.max_text_len {
                    break;
                }

                if len > cfg.min_text_len
                    && has_descendant(&current, |n| self.is_profile_link(n))
                    && has_descendant(&current, |n| is_element_named(n, "img"))
                    && self.reaction_count(&current) == 1
                {
                    best_candidate = Some(current.clone());
                }

                container = get_parent_element(&current);
            }

            if let Some(candidate) = best_candidate {
                posts.add_unique(&candidate);
            }
        }

        posts.into_vec()
    }

    /// 策略三：从头像图片向上寻找第一个像单个帖子的容器
    pub fn image_anchor_walk(&self, root: &Handle) -> Vec<Handle> {
        let cfg = &self.config;
        let mut posts = PostSet::new();

        let images = find_in_region(root, &cfg.region_tag, |node| self.is_profile_image(node));
        for image in images {
            let mut container = get_parent_element(&image);

            for _ in 0..cfg.image_walk_depth {
                let Some(current) = container else {
                    break;
                };

                if self.looks_like_single_post(&current) {
                    posts.add_unique(&current);
                    break;
                }

                container = get_parent_element(&current);
            }
        }

        posts.into_vec()
    }

    /// 策略四：扫描第一个主内容区内的候选容器，短文本优先收录
    pub fn region_scan(&self, root: &Handle) -> Vec<Handle> {
        let cfg = &self.config;
        let mut posts = PostSet::new();

        let Some(region) = first_element_by_name(root, &cfg.region_tag) else {
            return posts.into_vec();
        };

        let mut candidates: Vec<(Handle, usize)> = Vec::new();
        for el in find_elements(&region, |node| is_element_named(node, &cfg.scan_tag)) {
            let text = text_content(&el);
            let len = text.chars().count();
            if len <= cfg.min_text_len || len >= cfg.max_scan_text_len {
                continue;
            }
            if self.is_compose_area(&text) {
                continue;
            }

            let images = count_descendants(&el, |n| is_element_named(n, "img"));
            let links = count_descendants(&el, |n| self.is_profile_link(n));
            if self.reaction_count(&el) == 1 && images >= 1 && links >= 1 {
                candidates.push((el, len));
            }
        }

        candidates.sort_by_key(|(_, len)| *len);
        for (el, _) in candidates {
            posts.add_unique(&el);
        }

        posts.into_vec()
    }

    /// 单个帖子形态判断（策略三使用）
    pub fn looks_like_single_post(&self, el: &Handle) -> bool {
        let cfg = &self.config;
        let text = text_content(el);
        let len = text.chars().count();

        if len <= cfg.min_text_len || len > cfg.max_text_len {
            return false;
        }
        if self.is_compose_area(&text) {
            return false;
        }

        let links = count_descendants(el, |n| self.is_profile_link(n));
        (1..=cfg.max_profile_links).contains(&links) && self.reaction_count(el) == 1
    }

    /// 同时含有发帖入口和排序控件的文本属于工具栏容器，不是单个帖子
    pub fn is_compose_area(&self, text: &str) -> bool {
        text.contains(&self.config.compose_marker) && text.contains(&self.config.sort_marker)
    }

    fn reaction_count(&self, el: &Handle) -> usize {
        count_descendants(el, |n| self.is_reaction_control(n))
    }

    fn is_post_identifier(&self, node: &Handle) -> bool {
        self.config.post_id_attrs.iter().any(|matcher| {
            get_node_attr(node, &matcher.attr)
                .map(|value| matcher.matches(&value))
                .unwrap_or(false)
        })
    }

    fn is_reaction_control(&self, node: &Handle) -> bool {
        is_element_named(node, "button")
            && get_node_attr(node, "aria-label")
                .map(|label| label.contains(&self.config.reaction_marker))
                .unwrap_or(false)
    }

    fn is_profile_link(&self, node: &Handle) -> bool {
        is_element_named(node, "a")
            && get_node_attr(node, "href")
                .map(|href| href.contains(&self.config.profile_link_marker))
                .unwrap_or(false)
    }

    fn is_profile_image(&self, node: &Handle) -> bool {
        is_element_named(node, "img")
            && get_node_attr(node, "src")
                .map(|src| src.contains(&self.config.profile_image_marker))
                .unwrap_or(false)
    }
}
