use serde::{Deserialize, Serialize};

/// Product stock availability, derived from the stock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl Availability {
    pub fn code(&self) -> &'static str {
        match self {
            Availability::InStock => "In Stock",
            Availability::LowStock => "Low Stock",
            Availability::OutOfStock => "Out of Stock",
        }
    }

    pub fn all() -> Vec<Availability> {
        vec![
            Availability::InStock,
            Availability::LowStock,
            Availability::OutOfStock,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "In Stock" => Some(Availability::InStock),
            "Low Stock" => Some(Availability::LowStock),
            "Out of Stock" => Some(Availability::OutOfStock),
            _ => None,
        }
    }

    /// Empty stock is out of stock; anything under the threshold is low
    pub fn from_stock(stock_level: u32, low_stock_threshold: u32) -> Self {
        if stock_level == 0 {
            Availability::OutOfStock
        } else if stock_level < low_stock_threshold {
            Availability::LowStock
        } else {
            Availability::InStock
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stock() {
        assert_eq!(Availability::from_stock(0, 100), Availability::OutOfStock);
        assert_eq!(Availability::from_stock(1, 100), Availability::LowStock);
        assert_eq!(Availability::from_stock(99, 100), Availability::LowStock);
        assert_eq!(Availability::from_stock(100, 100), Availability::InStock);
    }
}
