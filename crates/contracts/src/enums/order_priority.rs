use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPriority {
    Low,
    Medium,
    High,
}

impl OrderPriority {
    pub fn code(&self) -> &'static str {
        match self {
            OrderPriority::Low => "low",
            OrderPriority::Medium => "medium",
            OrderPriority::High => "high",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderPriority::Low => "Low",
            OrderPriority::Medium => "Medium",
            OrderPriority::High => "High",
        }
    }

    pub fn all() -> Vec<OrderPriority> {
        vec![OrderPriority::Low, OrderPriority::Medium, OrderPriority::High]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "low" => Some(OrderPriority::Low),
            "medium" => Some(OrderPriority::Medium),
            "high" => Some(OrderPriority::High),
            _ => None,
        }
    }
}

impl Default for OrderPriority {
    fn default() -> Self {
        OrderPriority::Medium
    }
}

impl std::fmt::Display for OrderPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
