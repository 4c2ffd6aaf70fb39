/// Fields the status routes (booking, ordering, advertising) may change.
pub const STATUS_FIELDS: &[&str] = &["status"];

pub const STATUS_ADVERTISED: &str = "Advertised";
