use std::collections::HashMap;
use std::env;

/// Settings key for the backend database address.
pub const KEY_ADDR: &str = "objdb.addr";
/// Settings key for the database username.
pub const KEY_USERNAME: &str = "objdb.username";
/// Settings key for the database password.
pub const KEY_PASSWORD: &str = "objdb.password";

/// Immutable flat string-keyed configuration, built once at startup.
///
/// The connection layer never reads the environment directly; everything it
/// needs arrives through this map. Tests build it from literal pairs.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Build settings from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Build settings from environment variables.
    ///
    /// Environment variables must be set by the runtime environment
    /// (docker env_file, or sourced env files for local dev). Absent
    /// variables simply leave their key unset; validation happens when the
    /// registry is built, not here.
    pub fn from_env() -> Self {
        let mut values = HashMap::new();
        for (var, key) in [
            ("OBJDB_ADDR", KEY_ADDR),
            ("OBJDB_USERNAME", KEY_USERNAME),
            ("OBJDB_PASSWORD", KEY_PASSWORD),
        ] {
            if let Ok(val) = env::var(var) {
                values.insert(key.to_string(), val);
            }
        }
        Self { values }
    }

    /// Raw lookup of an arbitrary settings key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn addr(&self) -> Option<&str> {
        self.get(KEY_ADDR)
    }

    pub fn username(&self) -> Option<&str> {
        self.get(KEY_USERNAME)
    }

    pub fn password(&self) -> Option<&str> {
        self.get(KEY_PASSWORD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_lookup() {
        let settings = Settings::from_pairs([
            (KEY_ADDR, "localhost:8001"),
            (KEY_USERNAME, "root"),
        ]);
        assert_eq!(settings.addr(), Some("localhost:8001"));
        assert_eq!(settings.username(), Some("root"));
        assert_eq!(settings.password(), None);
    }

    #[test]
    fn test_unknown_key_is_absent() {
        let settings = Settings::from_pairs([(KEY_ADDR, "localhost:8001")]);
        assert_eq!(settings.get("objdb.pool_size"), None);
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_reads_objdb_vars() {
        env::set_var("OBJDB_ADDR", "db.internal:8001");
        env::set_var("OBJDB_USERNAME", "svc");
        env::remove_var("OBJDB_PASSWORD");

        let settings = Settings::from_env();
        assert_eq!(settings.addr(), Some("db.internal:8001"));
        assert_eq!(settings.username(), Some("svc"));
        assert_eq!(settings.password(), None);

        env::remove_var("OBJDB_ADDR");
        env::remove_var("OBJDB_USERNAME");
    }
}
