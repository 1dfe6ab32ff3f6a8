//! Maestro 共享模型
//!
//! 前端与服务端契约中与平台无关的部分：
//! - 会话、权限、状态字典、主数据等领域模型
//! - `protocol`: API 请求描述与响应信封
//! - 纯逻辑的小型状态机（主题、通知连接）

pub mod cookie;
pub mod excel;
pub mod master;
pub mod notification;
pub mod permissions;
pub mod protocol;
pub mod serde_helper;
pub mod session;
pub mod status;
pub mod theme;

pub use excel::{ImportRow, ValidationSummary};
pub use master::{Country, Department, MasterDraft, MasterEntity, MasterResource};
pub use notification::{ConnectionState, Notification, ReconnectPolicy};
pub use permissions::{ALL_PERMISSIONS, ResourcePermissions};
pub use protocol::{ApiEnvelope, ApiRequest, HttpMethod};
pub use session::{MenuItem, PermissionRef, Session, SessionPayload, UserInfo};
pub use status::Status;
pub use theme::Theme;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_CSRF_TOKEN: &str = "X-CSRFToken";
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// LocalStorage 键
pub const STORAGE_SESSION_KEY: &str = "auth-session";
/// 旧版本遗留的用户键，注销时一并清除
pub const STORAGE_LEGACY_USER_KEY: &str = "auth-user";
pub const STORAGE_VERIFY_EMAIL_KEY: &str = "verify_email";
pub const STORAGE_THEME_KEY: &str = "theme";

pub const WS_NOTIFICATIONS_PATH: &str = "/ws/notifications/";
