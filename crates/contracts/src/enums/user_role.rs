use serde::{Deserialize, Serialize};

/// Роли пользователей админ-панели.
/// Числовой код роли передаётся в токене как claim `role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Developer,
    PlatformAdmin,
    OperationsAdmin,
    Retailer,
    Merchant,
    Supplier,
    Courier,
    Customer,
}

impl UserRole {
    /// Числовой код роли
    pub fn code(&self) -> i64 {
        match self {
            UserRole::Developer => 1,
            UserRole::PlatformAdmin => 2,
            UserRole::OperationsAdmin => 3,
            UserRole::Retailer => 4,
            UserRole::Merchant => 5,
            UserRole::Supplier => 6,
            UserRole::Courier => 7,
            UserRole::Customer => 8,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Developer => "Developer",
            UserRole::PlatformAdmin => "Platform admin",
            UserRole::OperationsAdmin => "Operations admin",
            UserRole::Retailer => "Retailer",
            UserRole::Merchant => "Merchant",
            UserRole::Supplier => "Supplier",
            UserRole::Courier => "Courier",
            UserRole::Customer => "Customer",
        }
    }

    /// Home section of the role in the UI shell
    pub fn home_prefix(&self) -> &'static str {
        match self {
            UserRole::Developer => "/dashboard/developer",
            UserRole::PlatformAdmin => "/dashboard/platform-admin",
            UserRole::OperationsAdmin => "/dashboard/operations-admin",
            UserRole::Retailer => "/dashboard/retailer",
            UserRole::Merchant => "/dashboard/merchant",
            UserRole::Supplier => "/dashboard/supplier",
            UserRole::Courier => "/dashboard/courier",
            UserRole::Customer => "/customer",
        }
    }

    pub fn all() -> Vec<UserRole> {
        vec![
            UserRole::Developer,
            UserRole::PlatformAdmin,
            UserRole::OperationsAdmin,
            UserRole::Retailer,
            UserRole::Merchant,
            UserRole::Supplier,
            UserRole::Courier,
            UserRole::Customer,
        ]
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(UserRole::Developer),
            2 => Some(UserRole::PlatformAdmin),
            3 => Some(UserRole::OperationsAdmin),
            4 => Some(UserRole::Retailer),
            5 => Some(UserRole::Merchant),
            6 => Some(UserRole::Supplier),
            7 => Some(UserRole::Courier),
            8 => Some(UserRole::Customer),
            _ => None,
        }
    }
}
