/// Root of an entity aggregate
///
/// Instance accessors plus the static names used for store tables,
/// log lines and export file names.
pub trait AggregateRoot {
    // ============================================================================
    // Instance data
    // ============================================================================

    /// Display identifier of the record (order number, SKU-based id, ...)
    fn id(&self) -> String;

    /// Short human-readable description of the record
    fn description(&self) -> String;

    // ============================================================================
    // Aggregate class metadata
    // ============================================================================

    /// Aggregate index in the system (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Remote store table (e.g. "orders")
    fn collection_name() -> &'static str;

    /// Singular UI name (e.g. "Order")
    fn element_name() -> &'static str;

    /// Plural UI name (e.g. "Orders")
    fn list_name() -> &'static str;

    /// `a001_orders`
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
