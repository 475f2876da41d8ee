//! 关键词分类器
//!
//! 不区分大小写的子串匹配：任意一个关键词出现在帖子文本中即为命中。

use serde::{Deserialize, Serialize};

use crate::config::default_keywords;
use crate::error::{FilterError, FilterResult};

/// 关键词集合
///
/// 保留用户给出的原始顺序（用于回显和持久化），匹配时只用小写副本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    keywords: Vec<String>,
    lowered: Vec<String>,
}

impl KeywordSet {
    pub fn new(keywords: Vec<String>) -> Self {
        let lowered = keywords.iter().map(|k| k.to_lowercase()).collect();
        Self { keywords, lowered }
    }

    /// 内置默认关键词
    pub fn defaults() -> Self {
        Self::new(default_keywords())
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    /// 文本是否命中任一关键词；空集合不命中任何文本
    pub fn matches(&self, text: &str) -> bool {
        let lower_text = text.to_lowercase();
        self.lowered
            .iter()
            .any(|keyword| lower_text.contains(keyword.as_str()))
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.keywords
    }
}

/// 分类入口
pub fn matches(text: &str, keywords: &KeywordSet) -> bool {
    keywords.matches(text)
}

/// 解析多行关键词输入：按行切分、去除首尾空白、丢弃空行
pub fn parse_keywords(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| k.to_string())
        .collect()
}

/// 关键词列表格式化为多行文本
pub fn format_keywords(keywords: &[String]) -> String {
    keywords.join("\n")
}

/// 设置入口的前置校验：拒绝空列表
pub fn validate_keywords(keywords: &[String]) -> FilterResult<()> {
    if keywords.is_empty() {
        return Err(FilterError::EmptyKeywords);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> KeywordSet {
        KeywordSet::new(words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_case_insensitive_substring() {
        let keywords = set(&["hiring"]);
        assert!(matches("We are HIRING now!", &keywords));
        assert!(!matches("hirin", &keywords));
    }

    #[test]
    fn test_uppercase_keyword_matches_lowercase_text() {
        let keywords = set(&["Join Our Team"]);
        assert!(keywords.matches("come join our team today"));
    }

    #[test]
    fn test_single_hit_is_enough() {
        let keywords = set(&["rust", "golang", "#hiring"]);
        assert!(keywords.matches("Big news #Hiring"));
        assert!(!keywords.matches("Vacation photos from Italy"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let keywords = set(&[]);
        assert!(!keywords.matches("we're hiring"));
        assert!(!keywords.matches(""));
    }

    #[test]
    fn test_default_list() {
        let keywords = KeywordSet::defaults();
        assert_eq!(keywords.len(), 23);
        assert!(keywords.matches("Excited to announce we're hiring a backend engineer"));
        assert!(!keywords.matches("Check out my vacation photos from Italy"));
    }

    #[test]
    fn test_parse_and_format_keywords() {
        let parsed = parse_keywords("  hiring \n\n#jobs\r\n   \nopen role");
        assert_eq!(parsed, vec!["hiring", "#jobs", "open role"]);
        assert_eq!(format_keywords(&parsed), "hiring\n#jobs\nopen role");
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(validate_keywords(&[]), Err(FilterError::EmptyKeywords)));
        assert!(validate_keywords(&["hiring".to_string()]).is_ok());
    }

    #[test]
    fn test_serde_as_plain_list() {
        let keywords: KeywordSet = serde_json::from_str(r#"["Hiring","open role"]"#).unwrap();
        assert!(keywords.matches("HIRING"));
        assert_eq!(serde_json::to_string(&keywords).unwrap(), r#"["Hiring","open role"]"#);
    }
}
