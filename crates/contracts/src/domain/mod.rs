pub mod common;

pub mod a001_order {
    pub mod aggregate;
}

pub mod a002_customer {
    pub mod aggregate;
}

pub mod a003_product {
    pub mod aggregate;
}

pub mod a004_production_stage {
    pub mod aggregate;
}
