pub mod a001_order {
    pub mod repository;
    pub mod service;
}
pub mod a002_customer {
    pub mod repository;
    pub mod service;
}
pub mod a003_product {
    pub mod repository;
    pub mod service;
}
pub mod a004_production_stage {
    pub mod repository;
    pub mod service;
}
