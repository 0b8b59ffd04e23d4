use dupescan::config::{Config, ConfigError, ConfigOverrides};
use dupescan::duplicates::{DuplicateFinder, FinderConfig};
use dupescan::scanner::FileCategory;
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_load_explicit_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "dupescan.toml",
            r#"
category = "documents"
min_file_size = 10
exclude = ["drafts"]
"#,
        )?;

        let config = Config::load(Some(Path::new("dupescan.toml")), &ConfigOverrides::default())
            .map_err(|e| e.to_string())?;

        assert_eq!(config.category, FileCategory::Documents);
        assert_eq!(config.min_file_size, 10);
        assert_eq!(config.exclude, vec!["drafts".to_string()]);
        Ok(())
    });
}

#[test]
fn test_malformed_toml_is_invalid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "min_file_size = = 3").unwrap();

    let result = Config::load(Some(&path), &ConfigOverrides::default());

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_figment_jail_env_layer() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("dupescan.toml", "min_file_size = 2048\ncategory = \"audio\"\n")?;
        jail.set_env("DUPESCAN_MIN_FILE_SIZE", "4096");

        let overrides = ConfigOverrides {
            category: Some(FileCategory::Videos),
            ..Default::default()
        };
        let config: Config = Config::figment(Some(Path::new("dupescan.toml")), &overrides)
            .map_err(|e| e.to_string())?
            .extract()?;

        assert_eq!(config.min_file_size, 4096);
        assert_eq!(config.category, FileCategory::Videos);
        Ok(())
    });
}

#[test]
fn test_config_drives_scan() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("a.txt"), vec![1u8; 600]).unwrap();
    fs::write(data.path().join("b.txt"), vec![1u8; 600]).unwrap();
    fs::create_dir(data.path().join("drafts")).unwrap();
    fs::write(data.path().join("drafts/c.txt"), vec![1u8; 600]).unwrap();

    let cfg_dir = tempdir().unwrap();
    let cfg_path = cfg_dir.path().join("config.toml");
    fs::write(&cfg_path, "min_file_size = 512\nexclude = [\"drafts\"]\n").unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&cfg_path))
        .merge(Serialized::defaults(ConfigOverrides {
            roots: vec![data.path().to_path_buf()],
            ..Default::default()
        }))
        .extract()
        .unwrap();

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(config.walker_config())
            .with_exclude_patterns(config.exclude.clone()),
    );
    let result = finder.find_duplicates(&config.scan_options()).unwrap();

    assert_eq!(result.summary.total_files, 2);
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].count(), 2);
}
