use serde::{Deserialize, Serialize};

/// 매크로 키워드 등록부 (중복 제거, 등록 순서 유지)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeywordRegistry {
    keywords: Vec<String>,
}

impl KeywordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        registry.extend(keywords);
        registry
    }

    /// 키워드 추가. 새로 추가되었으면 true
    pub fn add(&mut self, keyword: impl Into<String>) -> bool {
        let keyword = keyword.into();
        let keyword = keyword.trim();
        if keyword.is_empty() || self.contains(keyword) {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }

    /// 새로 추가된 키워드 수를 반환
    pub fn extend<I, S>(&mut self, keywords: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for keyword in keywords {
            if self.add(keyword) {
                added += 1;
            }
        }
        added
    }

    pub fn remove(&mut self, keyword: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        self.keywords.len() != before
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn all(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
