use std::path::Path;

use confique::Config as DeriveConfig;

#[derive(Debug, DeriveConfig)]
pub struct Config {
    /// Number of spaces per nesting level when printing elements. `0` prints minified JSON.
    #[config(env = "JOHN_INDENT", default = 2)]
    pub indent: usize,

    /// Whether diagnostics should be colored.
    #[config(env = "JOHN_COLOR", default = true)]
    pub color: bool,
}

impl Config {
    /// Loads the configuration from the environment, then from `file` if one is given. Values
    /// from the environment take precedence.
    pub fn load(file: Option<&Path>) -> Result<Self, confique::Error> {
        let mut builder = Config::builder().env();
        if let Some(file) = file {
            builder = builder.file(file);
        }
        builder.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let config = Config::builder().load().unwrap();
        assert_eq!(config.indent, 2);
        assert!(config.color);
    }

    #[test]
    fn reads_toml_file() {
        let dir = std::env::temp_dir().join(format!("john-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("john.toml");
        std::fs::write(&file, "indent = 4\ncolor = false\n").unwrap();

        let config = Config::builder().file(&file).load().unwrap();
        assert_eq!(config.indent, 4);
        assert!(!config.color);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
