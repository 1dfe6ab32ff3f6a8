use serde::{Deserialize, Serialize};

/// 状态未知时徽标使用的颜色
pub const FALLBACK_STATUS_COLOR: &str = "#6C757D";
/// 状态未知时徽标显示的文字
pub const FALLBACK_STATUS_LABEL: &str = "...";

/// 状态字典条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color_code: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub type_status: String,
}

/// 在状态列表中查找
pub fn find_status<'a>(statuses: &'a [Status], id: &str) -> Option<&'a Status> {
    statuses.iter().find(|s| s.id == id)
}

/// 徽标的 (文字, 颜色)
pub fn badge_for(status: Option<&Status>) -> (String, String) {
    match status {
        Some(s) => (s.name.clone(), s.color_code.clone()),
        None => (
            FALLBACK_STATUS_LABEL.to_string(),
            FALLBACK_STATUS_COLOR.to_string(),
        ),
    }
}
