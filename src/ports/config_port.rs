//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// `Ok(None)` when the key is absent, `Err` when it does not parse.
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
