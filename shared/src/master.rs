//! 主数据模型（国家、省/部门）
//!
//! 两个资源共用同一套页面与接口形态，差异由 `MasterResource` 描述。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::permissions::{COUNTRY_PERMISSIONS, DEPARTMENT_PERMISSIONS, ResourcePermissions};

/// 主数据资源描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterResource {
    /// 资源键，用于文件名
    pub key: &'static str,
    /// 页面标题（复数）
    pub title: &'static str,
    /// 单数名称，用于表单标题
    pub singular: &'static str,
    /// 接口根路径，不带结尾斜杠
    pub base_path: &'static str,
    /// 前端路由
    pub route: &'static str,
    pub permissions: ResourcePermissions,
    /// 记录是否挂在某个国家下（表单需要选择国家，列表显示所属国家列）
    pub requires_parent: bool,
}

impl MasterResource {
    pub fn collection_path(&self) -> String {
        format!("{}/", self.base_path)
    }

    pub fn record_path(&self, id: &str) -> String {
        format!("{}/{}/", self.base_path, id)
    }

    pub fn import_path(&self) -> String {
        format!("{}/import/", self.base_path)
    }

    pub fn export_path(&self) -> String {
        format!("{}/export/", self.base_path)
    }

    pub fn template_path(&self) -> String {
        format!("{}/template/", self.base_path)
    }

    pub fn export_filename(&self) -> String {
        format!("{}.xlsx", self.key)
    }

    pub fn template_filename(&self) -> String {
        format!("plantilla_{}.xlsx", self.key)
    }
}

pub const COUNTRY_RESOURCE: MasterResource = MasterResource {
    key: "country",
    title: "Países",
    singular: "País",
    base_path: "/config/master/country",
    route: "/config/master/country",
    permissions: COUNTRY_PERMISSIONS,
    requires_parent: false,
};

pub const DEPARTMENT_RESOURCE: MasterResource = MasterResource {
    key: "department",
    title: "Departamentos",
    singular: "Departamento",
    base_path: "/config/master/department",
    route: "/config/master/department",
    permissions: DEPARTMENT_PERMISSIONS,
    requires_parent: true,
};

/// 主数据实体的公共能力
pub trait MasterEntity:
    Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static
{
    const RESOURCE: MasterResource;

    fn id(&self) -> &str;
    fn code(&self) -> &str;
    fn name(&self) -> &str;
    fn status_id(&self) -> Option<&str>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// 附加列（如所属国家），没有则为 None
    fn parent_label(&self) -> Option<&str> {
        None
    }

    /// 编辑表单的初始值
    fn to_draft(&self) -> MasterDraft;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub status_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MasterEntity for Country {
    const RESOURCE: MasterResource = COUNTRY_RESOURCE;

    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn status_id(&self) -> Option<&str> {
        self.status_id.as_deref()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    fn to_draft(&self) -> MasterDraft {
        MasterDraft {
            code: self.code.clone(),
            name: self.name.clone(),
            country_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub country_id: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub status_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MasterEntity for Department {
    const RESOURCE: MasterResource = DEPARTMENT_RESOURCE;

    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn status_id(&self) -> Option<&str> {
        self.status_id.as_deref()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    fn parent_label(&self) -> Option<&str> {
        self.country_name.as_deref()
    }

    fn to_draft(&self) -> MasterDraft {
        MasterDraft {
            code: self.code.clone(),
            name: self.name.clone(),
            country_id: self.country_id.clone(),
        }
    }
}

/// 新建/更新请求体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterDraft {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
}

impl MasterDraft {
    /// 返回第一条校验错误
    pub fn validate(&self, requires_country: bool) -> Result<(), &'static str> {
        if self.code.trim().is_empty() {
            return Err("El código es obligatorio");
        }
        if self.name.trim().is_empty() {
            return Err("El nombre es obligatorio");
        }
        if requires_country && self.country_id.as_deref().is_none_or(|c| c.trim().is_empty()) {
            return Err("Seleccione un país");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_paths_and_filenames() {
        assert_eq!(COUNTRY_RESOURCE.import_path(), "/config/master/country/import/");
        assert_eq!(DEPARTMENT_RESOURCE.export_path(), "/config/master/department/export/");
        assert_eq!(COUNTRY_RESOURCE.template_filename(), "plantilla_country.xlsx");
        assert_eq!(DEPARTMENT_RESOURCE.export_filename(), "department.xlsx");
    }

    #[test]
    fn test_only_department_requires_parent() {
        assert!(!Country::RESOURCE.requires_parent);
        assert!(Department::RESOURCE.requires_parent);
    }

    #[test]
    fn test_department_parses_optional_fields() {
        let dept: Department = serde_json::from_value(json!({
            "id": "d1",
            "code": "LIM",
            "name": "Lima",
            "country_name": "Perú",
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(dept.parent_label(), Some("Perú"));
        assert!(dept.status_id().is_none());
        assert!(dept.updated_at().is_some());
    }

    #[test]
    fn test_updated_at_falls_back_to_created_at() {
        let country: Country = serde_json::from_value(json!({
            "id": "c1", "code": "PE", "name": "Perú",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(country.updated_at(), country.created_at);
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = MasterDraft::default();
        assert!(draft.validate(false).is_err());
        draft.code = "LIM".into();
        draft.name = "Lima".into();
        assert!(draft.validate(false).is_ok());
        assert_eq!(draft.validate(true), Err("Seleccione un país"));
        draft.country_id = Some("c1".into());
        assert!(draft.validate(true).is_ok());
    }
}
