//! HTML解析和处理模块
//!
//! - `dom`: 基础DOM操作（解析、查询、文本聚合、节点增删）
//! - `utils`: class 列表等小工具
//! - `serializer`: 序列化功能

pub mod dom;
pub mod serializer;
pub mod utils;

// 重新导出主要的公共 API
pub use dom::{
    append_child, contains, count_descendants, detach, find_elements, find_in_region,
    first_element_by_name, get_child_node_by_name, get_node_attr, get_node_name,
    get_parent_element, get_parent_node, has_descendant, html_to_dom, is_element_named,
    parse_fragment, prepend_child, set_node_attr, text_content, text_len,
};
pub use serializer::{compose_hidden_style, serialize_document, OutputOptions};
pub use utils::{add_class, has_class, remove_class, toggle_class, WHITESPACES};
