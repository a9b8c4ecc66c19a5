//! Process definitions, articles and their ordered process flows

use serde::{Deserialize, Serialize};

/// A reusable production step such as "Tanning"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Process {
    pub process_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A product specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub article_id: i64,
    pub article_code: String,
    pub description: Option<String>,
}

/// One step of an article's recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowStep {
    pub apf_id: i64,
    pub article_id: i64,
    pub process_id: i64,
    pub process_name: String,
    pub sequence_order: i64,
}

/// An article together with its steps, ordered by `sequence_order`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleFlow {
    pub article: Article,
    pub steps: Vec<FlowStep>,
}

impl ArticleFlow {
    /// Process names in execution order
    pub fn process_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.process_name.as_str()).collect()
    }
}
