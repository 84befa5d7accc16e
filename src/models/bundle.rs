use serde::{Deserialize, Serialize};

use super::package::Package;

/// 套餐与套题的关联
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlePackage {
    pub package: Package,
}

/// 套餐(打包优惠售卖的一组套题)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 套餐售价
    pub price: f64,
    /// 相对单买的折扣(百分比)，仅用于展示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub bundle_packages: Vec<BundlePackage>,
}

impl Bundle {
    /// 套餐内套题的单买总价
    pub fn list_price(&self) -> f64 {
        self.bundle_packages.iter().map(|bp| bp.package.price).sum()
    }

    /// 相对单买省下的金额
    pub fn savings(&self) -> f64 {
        (self.list_price() - self.price).max(0.0)
    }
}
