use chrono::Local;

/// Source of business codes for newly created products
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Local wall-clock time down to the microsecond, e.g. `20240101120000123456`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampCodeGenerator;

impl CodeGenerator for TimestampCodeGenerator {
    fn generate(&self) -> String {
        Local::now().format("%Y%m%d%H%M%S%6f").to_string()
    }
}
