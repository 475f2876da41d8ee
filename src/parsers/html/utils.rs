use markup5ever_rcdom::Handle;

use super::dom::{get_node_attr, set_node_attr};

/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 检查元素 class 列表中是否含有指定类名
pub fn has_class(node: &Handle, class_name: &str) -> bool {
    get_node_attr(node, "class")
        .map(|classes| classes.split(WHITESPACES).any(|c| c == class_name))
        .unwrap_or(false)
}

/// 向 class 列表添加类名，返回是否发生变化
pub fn add_class(node: &Handle, class_name: &str) -> bool {
    if has_class(node, class_name) {
        return false;
    }

    let classes = get_node_attr(node, "class").unwrap_or_default();
    let value = if classes.trim_matches(WHITESPACES).is_empty() {
        class_name.to_string()
    } else {
        format!("{} {}", classes.trim_end_matches(WHITESPACES), class_name)
    };

    set_node_attr(node, "class", Some(value))
}

/// 从 class 列表移除类名，返回是否发生变化
pub fn remove_class(node: &Handle, class_name: &str) -> bool {
    if !has_class(node, class_name) {
        return false;
    }

    let classes = get_node_attr(node, "class").unwrap_or_default();
    let remaining: Vec<&str> = classes
        .split(WHITESPACES)
        .filter(|c| !c.is_empty() && *c != class_name)
        .collect();

    if remaining.is_empty() {
        set_node_attr(node, "class", None)
    } else {
        set_node_attr(node, "class", Some(remaining.join(" ")))
    }
}

/// 根据布尔值切换类名，返回是否发生变化
pub fn toggle_class(node: &Handle, class_name: &str, present: bool) -> bool {
    if present {
        add_class(node, class_name)
    } else {
        remove_class(node, class_name)
    }
}
