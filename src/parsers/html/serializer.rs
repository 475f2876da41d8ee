use encoding_rs::Encoding;
use html5ever::interface::QualName;
use html5ever::interface::TreeSink;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::format_tendril;
use html5ever::tree_builder::{create_element, NodeOrText};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{RcDom, SerializableHandle};

use crate::error::FilterResult;

use super::dom::{get_child_node_by_name, prepend_child};

/// 序列化选项
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// 注入隐藏样式，使保存下来的快照中被隐藏的帖子保持不可见
    pub inject_hidden_style: bool,
    pub hidden_class: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            inject_hidden_style: true,
            hidden_class: crate::config::constants::HIDDEN_CLASS.to_string(),
        }
    }
}

/// 生成隐藏规则
pub fn compose_hidden_style(hidden_class: &str) -> String {
    format!(".{}{{display:none !important}}", hidden_class)
}

/// 序列化文档
pub fn serialize_document(
    dom: &RcDom,
    document_encoding: &str,
    options: &OutputOptions,
) -> FilterResult<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();

    if options.inject_hidden_style {
        if let Some(html) = get_child_node_by_name(&dom.document, "html") {
            if let Some(head) = get_child_node_by_name(&html, "head") {
                let style = create_element(
                    dom,
                    QualName::new(None, ns!(html), LocalName::from("style")),
                    vec![],
                );
                dom.append(
                    &style,
                    NodeOrText::AppendText(format_tendril!(
                        "{}",
                        compose_hidden_style(&options.hidden_class)
                    )),
                );
                prepend_child(&head, style);
            }
        }
    }

    let serializable: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &serializable, SerializeOpts::default())?;

    if !document_encoding.is_empty() {
        if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
            let s: &str = &String::from_utf8_lossy(&buf);
            let (data, _, _) = encoding.encode(s);
            buf = data.to_vec();
        }
    }

    Ok(buf)
}
