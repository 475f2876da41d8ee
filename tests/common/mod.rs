// 集成测试公共模块
//
// 信息流页面夹具：生成结构上像帖子、但不带语义标识的容器，
// 让结构推断策略真正参与定位。

use markup5ever_rcdom::{Handle, RcDom};

use feedfilter::parsers::html::{find_elements, get_node_attr, has_class, html_to_dom};
use feedfilter::pipeline::{FilterController, Locator, NoopReporter};

/// 隐藏标记
pub const HIDDEN_CLASS: &str = "feedfilter-hidden";

/// 单个帖子夹具
#[derive(Debug, Clone)]
pub struct PostFixture {
    pub id: String,
    pub body: String,
    /// 为 true 时带上 activity URN 标识
    pub with_urn: bool,
}

impl PostFixture {
    pub fn new(id: &str, body: &str) -> Self {
        Self {
            id: id.to_string(),
            body: body.to_string(),
            with_urn: false,
        }
    }

    pub fn with_urn(mut self) -> Self {
        self.with_urn = true;
        self
    }

    pub fn to_html(&self) -> String {
        let urn = if self.with_urn {
            format!(" data-urn=\"urn:li:activity:{}\"", self.id)
        } else {
            String::new()
        };

        format!(
            "<div class=\"x1a2b\" id=\"{id}\"{urn}>\
               <div class=\"x9f8e\">\
                 <a href=\"https://www.linkedin.com/in/{id}-author/\">\
                   <img src=\"https://media.licdn.com/dms/image/{id}/profile.jpg\" alt=\"\">\
                 </a>\
                 <span>Author</span>\
               </div>\
               <div class=\"x7c6d\"><p>{body}</p></div>\
               <div class=\"x5e4f\">\
                 <button aria-label=\"React Like\">Like</button>\
                 <button aria-label=\"Comment\">Comment</button>\
               </div>\
             </div>",
            id = self.id,
            urn = urn,
            body = self.body,
        )
    }
}

/// 信息流页面构建器
#[derive(Debug, Default)]
pub struct FeedBuilder {
    posts: Vec<PostFixture>,
    compose_box: bool,
}

impl FeedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(mut self, id: &str, body: &str) -> Self {
        self.posts.push(PostFixture::new(id, body));
        self
    }

    pub fn post_with_urn(mut self, id: &str, body: &str) -> Self {
        self.posts.push(PostFixture::new(id, body).with_urn());
        self
    }

    /// 在帖子上方加上发帖入口和排序控件
    pub fn compose_box(mut self) -> Self {
        self.compose_box = true;
        self
    }

    pub fn html(&self) -> String {
        let compose = if self.compose_box {
            "<div id=\"compose\"><button>Start a post</button><span>Sort by: Top</span></div>"
        } else {
            ""
        };
        let posts: String = self.posts.iter().map(PostFixture::to_html).collect();

        format!(
            "<!DOCTYPE html><html><head><title>Feed</title></head><body>\
             <header><a href=\"/feed/\">Home</a></header>\
             <main><div id=\"feed\">{}{}</div></main>\
             </body></html>",
            compose, posts
        )
    }

    pub fn build(&self) -> RcDom {
        html_to_dom(self.html().as_bytes(), "utf-8").expect("fixture must parse")
    }
}

/// 生成恰好 `len` 个字符的正文，以 `lead` 开头，用中性填充词补齐
pub fn body_of_len(lead: &str, len: usize) -> String {
    let mut body = String::from(lead);
    let filler = " lorem ipsum dolor";
    while body.chars().count() < len {
        body.push_str(filler);
    }
    body.chars().take(len).collect()
}

/// 控制器，不向外报告
pub fn controller(dom: &RcDom) -> FilterController {
    FilterController::new(dom.document.clone(), Locator::default(), Box::new(NoopReporter))
}

/// 按 id 查找元素
pub fn element_by_id(dom: &RcDom, id: &str) -> Handle {
    find_elements(&dom.document, |node| get_node_attr(node, "id").as_deref() == Some(id))
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no element with id {}", id))
}

/// 当前带隐藏标记的元素 id（文档顺序）
pub fn hidden_ids(dom: &RcDom) -> Vec<String> {
    find_elements(&dom.document, |node| has_class(node, HIDDEN_CLASS))
        .iter()
        .filter_map(|node| get_node_attr(node, "id"))
        .collect()
}

/// 元素 id 列表
pub fn ids(nodes: &[Handle]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|node| get_node_attr(node, "id"))
        .collect()
}
