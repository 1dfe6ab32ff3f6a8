//! 会话模型
//!
//! `Session` 是客户端持有的已认证用户记录，整体替换、从不局部修改。

use serde::{Deserialize, Serialize};

use crate::permissions::ALL_PERMISSIONS;
use crate::serde_helper::{null_as_default, string_or_number};

/// 未登录时导航栏显示的名称
pub const ANONYMOUS_DISPLAY_NAME: &str = "Acceso";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dni: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: bool,
}

impl UserInfo {
    /// 名 + 姓，任一为空时只返回另一个
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// 服务端下发的菜单节点
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    pub label: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub children: Vec<MenuItem>,
}

/// 前端权限引用：服务端既可能下发纯字符串，也可能下发对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionRef {
    Code(String),
    Named {
        code: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl PermissionRef {
    pub fn code(&self) -> &str {
        match self {
            PermissionRef::Code(code) => code,
            PermissionRef::Named { code, .. } => code,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_info: UserInfo,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub permisos_front: Vec<PermissionRef>,
    #[serde(default)]
    pub permisos_back: Vec<String>,
}

impl Session {
    pub fn from_payload(payload: SessionPayload) -> Self {
        let SessionPayload { user_info } = payload;
        Self {
            user_info: user_info.info,
            menu: user_info.menu,
            permisos_front: user_info.permisos_front,
            permisos_back: user_info.permisos_back,
        }
    }

    /// 通配权限或精确匹配
    pub fn can(&self, permission: &str) -> bool {
        self.permisos_back
            .iter()
            .any(|p| p == ALL_PERMISSIONS || p == permission)
    }

    pub fn is_authenticated(&self) -> bool {
        !self.user_info.username.is_empty()
    }
}

/// 对可能不存在的会话做权限判断
pub fn can(session: Option<&Session>, permission: &str) -> bool {
    session.is_some_and(|s| s.can(permission))
}

pub fn is_logged_in(session: Option<&Session>) -> bool {
    session.is_some_and(Session::is_authenticated)
}

pub fn display_name(session: Option<&Session>) -> String {
    session
        .map(|s| s.user_info.username.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| ANONYMOUS_DISPLAY_NAME.to_string())
}

// =========================================================
// 登录 / 会话校验响应中的 data 字段
// =========================================================

/// 菜单与权限列表嵌套在 `user_info` 内部下发
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionPayload {
    #[serde(default)]
    pub user_info: UserInfoPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInfoPayload {
    #[serde(flatten)]
    pub info: UserInfo,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub permisos_front: Vec<PermissionRef>,
    #[serde(default)]
    pub permisos_back: Vec<String>,
}
