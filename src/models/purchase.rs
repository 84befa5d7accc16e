use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 购买对象: 套餐或单个套题，二选一
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseItem {
    Bundle { bundle_id: String },
    Package { package_id: String },
}

impl PurchaseItem {
    pub fn id(&self) -> &str {
        match self {
            PurchaseItem::Bundle { bundle_id } => bundle_id,
            PurchaseItem::Package { package_id } => package_id,
        }
    }

    /// 展示用类型名
    pub fn kind(&self) -> &'static str {
        match self {
            PurchaseItem::Bundle { .. } => "套餐",
            PurchaseItem::Package { .. } => "套题",
        }
    }
}

/// 购买记录
///
/// 服务端以 bundleId / packageId 两个可空外键表达购买对象，
/// 解析时收敛成 `PurchaseItem`，恰好一个非空才算合法记录。
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawPurchase")]
pub struct Purchase {
    pub id: String,
    pub item: PurchaseItem,
    pub price_paid: f64,
    pub purchased_at: DateTime<Utc>,
    /// 管理员是否已确认到账
    pub approved: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPurchase {
    id: String,
    bundle_id: Option<String>,
    package_id: Option<String>,
    price_paid: f64,
    purchased_at: DateTime<Utc>,
    #[serde(default)]
    approved: bool,
}

impl TryFrom<RawPurchase> for Purchase {
    type Error = String;

    fn try_from(raw: RawPurchase) -> Result<Self, Self::Error> {
        let item = match (raw.bundle_id, raw.package_id) {
            (Some(bundle_id), None) => PurchaseItem::Bundle { bundle_id },
            (None, Some(package_id)) => PurchaseItem::Package { package_id },
            (Some(_), Some(_)) => {
                return Err(format!("购买记录 {} 同时关联了套餐和套题", raw.id));
            }
            (None, None) => {
                return Err(format!("购买记录 {} 没有关联任何商品", raw.id));
            }
        };
        Ok(Purchase {
            id: raw.id,
            item,
            price_paid: raw.price_paid,
            purchased_at: raw.purchased_at,
            approved: raw.approved,
        })
    }
}
