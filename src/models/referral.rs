use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 推荐码
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralCode {
    pub id: String,
    pub code: String,
    /// 折扣(百分比，0-100)
    pub discount_percent: f64,
    /// 最大使用次数，None 表示不限次
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default)]
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ReferralCode {
    /// 指定时刻能否使用(启用、未过期、次数未用完)
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(expires_at) = self.expires_at {
            if now > expires_at {
                return false;
            }
        }
        match self.max_uses {
            Some(max) => self.used_count < max,
            None => true,
        }
    }

    /// 按折扣计算到手价
    pub fn apply_discount(&self, price: f64) -> f64 {
        (price * (100.0 - self.discount_percent) / 100.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_code() -> ReferralCode {
        ReferralCode {
            id: "ref_1".to_string(),
            code: "WELCOME20".to_string(),
            discount_percent: 20.0,
            max_uses: Some(3),
            used_count: 0,
            is_active: true,
            expires_at: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_usable_within_limits() {
        let code = make_code();
        let now = Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap();
        assert!(code.is_usable_at(now));
    }

    #[test]
    fn test_exhausted_or_expired_not_usable() {
        let now = Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap();

        let mut exhausted = make_code();
        exhausted.used_count = 3;
        assert!(!exhausted.is_usable_at(now));

        let expired = make_code();
        let late = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        assert!(!expired.is_usable_at(late));

        let mut disabled = make_code();
        disabled.is_active = false;
        assert!(!disabled.is_usable_at(now));
    }

    #[test]
    fn test_unlimited_uses() {
        let mut code = make_code();
        code.max_uses = None;
        code.used_count = 9999;
        let now = Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap();
        assert!(code.is_usable_at(now));
    }

    #[test]
    fn test_discounted_price() {
        let code = make_code();
        assert!((code.apply_discount(100.0) - 80.0).abs() < f64::EPSILON);
    }
}
