//! 徽章目录实体

use serde::{Deserialize, Serialize};

use crate::criteria::ParsedCriteria;

/// 徽章定义
///
/// 由管理员或种子数据维护，评估过程中只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    /// 徽章名称
    pub name: String,
    /// 徽章描述
    #[sqlx(default)]
    pub description: Option<String>,
    /// 图片资源引用
    #[sqlx(default)]
    pub image_url: Option<String>,
    /// 获取条件（如 "read_10"），格式见 [`crate::criteria`]
    pub criteria: String,
    /// 是否参与评估
    pub is_active: bool,
    /// 排序权重，数值越小越靠前
    pub sort_order: i32,
}

impl Badge {
    pub fn new(id: impl Into<String>, name: impl Into<String>, criteria: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            image_url: None,
            criteria: criteria.into(),
            is_active: true,
            sort_order: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// 按严格语法解析获取条件
    pub fn parsed_criteria(&self) -> Option<ParsedCriteria> {
        ParsedCriteria::parse(&self.criteria)
    }
}
