use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::{FilterError, FilterResult};

/// 将 HTML 字节转换为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> FilterResult<RcDom> {
    let s: String = if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        string.to_string()
    } else {
        String::from_utf8_lossy(data).to_string()
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .map_err(|e| FilterError::ParseError(format!("无法解析HTML: {}", e)))
}

/// 解析 HTML 片段，返回从临时文档 body 中摘下的顶层节点
pub fn parse_fragment(html: &str) -> FilterResult<Vec<Handle>> {
    let markup = format!("<!DOCTYPE html><html><head></head><body>{}</body></html>", html);
    let dom = html_to_dom(markup.as_bytes(), "utf-8")?;

    let body = first_element_by_name(&dom.document, "body")
        .ok_or_else(|| FilterError::ParseError("片段缺少 body".to_string()))?;

    let nodes: Vec<Handle> = body.children.borrow_mut().drain(..).collect();
    for node in &nodes {
        node.parent.set(None);
    }

    Ok(nodes)
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 判断是否为指定名称的元素
pub fn is_element_named(node: &Handle, node_name: &str) -> bool {
    get_node_name(node) == Some(node_name)
}

/// 获取父元素；文档根节点和游离节点返回 None
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    child.parent.set(weak.clone());
    weak.and_then(|node| node.upgrade())
}

/// 获取父元素（跳过 Document 节点）
pub fn get_parent_element(child: &Handle) -> Option<Handle> {
    get_parent_node(child).filter(|parent| matches!(parent.data, NodeData::Element { .. }))
}

/// 设置节点属性，返回属性是否发生变化
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) -> bool {
    use html5ever::interface::{Attribute, QualName};
    use html5ever::tendril::format_tendril;
    use html5ever::{namespace_url, ns, LocalName};

    let mut changed = false;

    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.as_deref() {
                    if &*attrs_mut[i].value != attr_value {
                        attrs_mut[i].value.clear();
                        attrs_mut[i].value.push_slice(attr_value);
                        changed = true;
                    }
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    changed = true;
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                let name = LocalName::from(attr_name);

                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), name),
                    value: format_tendril!("{}", attr_value),
                });
                changed = true;
            }
        }
    };

    changed
}

/// 收集节点的全部文本（等价于 DOM 的 textContent）
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    let mut stack = vec![node.clone()];

    while let Some(current) = stack.pop() {
        if let NodeData::Text { contents } = &current.data {
            text.push_str(&contents.borrow());
        }
        // 逆序压栈以保持文档顺序
        for child in current.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }

    text
}

/// 文本长度（按字符计）
pub fn text_len(node: &Handle) -> usize {
    text_content(node).chars().count()
}

/// `ancestor` 是否包含 `node`（包含自身，与 DOM 的 contains 一致）
pub fn contains(ancestor: &Handle, node: &Handle) -> bool {
    let mut current = Some(node.clone());
    while let Some(candidate) = current {
        if Rc::ptr_eq(&candidate, ancestor) {
            return true;
        }
        current = get_parent_node(&candidate);
    }
    false
}

/// 按文档顺序收集满足条件的后代元素（不含自身）
pub fn find_elements<F>(root: &Handle, predicate: F) -> Vec<Handle>
where
    F: Fn(&Handle) -> bool,
{
    let mut found = Vec::new();
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();

    while let Some(current) = stack.pop() {
        if matches!(current.data, NodeData::Element { .. }) && predicate(&current) {
            found.push(current.clone());
        }
        for child in current.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }

    found
}

/// 按文档顺序收集位于 `region_tag` 元素内部且满足条件的元素（等价于 `main x` 后代选择器）
pub fn find_in_region<F>(root: &Handle, region_tag: &str, predicate: F) -> Vec<Handle>
where
    F: Fn(&Handle) -> bool,
{
    let mut found = Vec::new();
    let mut stack: Vec<(Handle, bool)> = root
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| (child.clone(), false))
        .collect();

    while let Some((current, inside_region)) = stack.pop() {
        if inside_region && matches!(current.data, NodeData::Element { .. }) && predicate(&current)
        {
            found.push(current.clone());
        }
        let child_inside = inside_region || is_element_named(&current, region_tag);
        for child in current.children.borrow().iter().rev() {
            stack.push((child.clone(), child_inside));
        }
    }

    found
}

/// 按文档顺序查找第一个指定名称的元素
pub fn first_element_by_name(root: &Handle, node_name: &str) -> Option<Handle> {
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();

    while let Some(current) = stack.pop() {
        if is_element_named(&current, node_name) {
            return Some(current);
        }
        for child in current.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }

    None
}

/// 统计满足条件的后代元素数量
pub fn count_descendants<F>(node: &Handle, predicate: F) -> usize
where
    F: Fn(&Handle) -> bool,
{
    find_elements(node, predicate).len()
}

/// 是否存在满足条件的后代元素
pub fn has_descendant<F>(node: &Handle, predicate: F) -> bool
where
    F: Fn(&Handle) -> bool,
{
    let mut stack: Vec<Handle> = node.children.borrow().iter().cloned().collect();

    while let Some(current) = stack.pop() {
        if matches!(current.data, NodeData::Element { .. }) && predicate(&current) {
            return true;
        }
        stack.extend(current.children.borrow().iter().cloned());
    }

    false
}

/// 追加子节点
pub fn append_child(parent: &Handle, child: Handle) {
    detach(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// 在最前面插入子节点
pub fn prepend_child(parent: &Handle, child: Handle) {
    detach(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().insert(0, child);
}

/// 将节点从父节点上摘下
pub fn detach(node: &Handle) {
    if let Some(parent) = get_parent_node(node) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
    node.parent.set(None);
}
