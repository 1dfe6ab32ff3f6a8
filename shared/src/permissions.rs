//! 权限常量
//!
//! 每个主数据资源都有一组固定命名的后端权限：
//! `general_master_<resource>_<action>`。

/// 通配权限：拥有它即拥有全部能力
pub const ALL_PERMISSIONS: &str = "ALL_PERMISSIONS";

/// 单个资源的权限集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePermissions {
    pub get: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub inactivate: &'static str,
    pub restore: &'static str,
    pub annul: &'static str,
    pub import: &'static str,
    pub export: &'static str,
    pub template: &'static str,
    pub log: &'static str,
    pub log_detail: &'static str,
}

pub const COUNTRY_PERMISSIONS: ResourcePermissions = ResourcePermissions {
    get: "general_master_country_get",
    create: "general_master_country_create",
    update: "general_master_country_update",
    inactivate: "general_master_country_inactivate",
    restore: "general_master_country_restore",
    annul: "general_master_country_annul",
    import: "general_master_country_import",
    export: "general_master_country_export",
    template: "general_master_country_template",
    log: "general_master_country_log",
    log_detail: "general_master_country_log_detail",
};

pub const DEPARTMENT_PERMISSIONS: ResourcePermissions = ResourcePermissions {
    get: "general_master_department_get",
    create: "general_master_department_create",
    update: "general_master_department_update",
    inactivate: "general_master_department_inactivate",
    restore: "general_master_department_restore",
    annul: "general_master_department_annul",
    import: "general_master_department_import",
    export: "general_master_department_export",
    template: "general_master_department_template",
    log: "general_master_department_log",
    log_detail: "general_master_department_log_detail",
};
