use invenio_config::{
    ConfigError, ConfigLoader, ConfigMap, ConfigProvider, ConfigSource, ConfigValues,
    DEFAULT_SECRET_KEY, Environment, FileProvider, StaticProvider, apply_instance_folder,
};
use invenio_test_support::fixtures::ScratchPrefix;
use serde_json::json;

#[test]
fn instance_file_is_optional() -> anyhow::Result<()> {
    let prefix = ScratchPrefix::new()?;
    let mut config = ConfigMap::new();
    let loaded = apply_instance_folder(&mut config, &prefix.child("instance"))?;
    assert!(loaded.is_none());
    assert!(config.is_empty());
    Ok(())
}

#[test]
fn instance_file_contributes_upper_case_settings() -> anyhow::Result<()> {
    let prefix = ScratchPrefix::new()?;
    let instance = prefix.child("instance");
    prefix.write_instance_config(
        &instance,
        "SITE_NAME = \"Zenodo\"\nRECORDS_PER_PAGE = 20\nhelper = \"skip\"\n\n[THEME]\nlogo = \"logo.svg\"\n",
    )?;

    let mut config = ConfigMap::new();
    let loaded = apply_instance_folder(&mut config, &instance)?;
    assert_eq!(loaded, Some(instance.join("invenio.cfg")));
    assert_eq!(config.get_str("SITE_NAME"), Some("Zenodo"));
    assert_eq!(config.get("RECORDS_PER_PAGE"), Some(&json!(20)));
    assert_eq!(config.get("THEME"), Some(&json!({"logo": "logo.svg"})));
    assert!(!config.contains_key("helper"));
    Ok(())
}

#[test]
fn malformed_instance_file_is_an_error() -> anyhow::Result<()> {
    let prefix = ScratchPrefix::new()?;
    let instance = prefix.child("instance");
    prefix.write_instance_config(&instance, "SITE_NAME = \n")?;

    let result = apply_instance_folder(&mut ConfigMap::new(), &instance);
    assert!(matches!(result, Err(ConfigError::FileParse { .. })));
    Ok(())
}

#[test]
fn file_provider_reads_package_settings() -> anyhow::Result<()> {
    let prefix = ScratchPrefix::new()?;
    let path = prefix.write_file("pkg/config.toml", "SEARCH_HOSTS = [\"localhost:9200\"]\n")?;
    let provider = FileProvider::new("search", &path);
    assert_eq!(provider.name(), "search");
    let values = provider.load()?;
    assert_eq!(values.get("SEARCH_HOSTS"), Some(&json!(["localhost:9200"])));

    let missing = FileProvider::new("gone", prefix.child("missing.toml"));
    assert!(matches!(missing.load(), Err(ConfigError::FileRead { .. })));
    Ok(())
}

#[test]
fn full_load_follows_stage_precedence() -> anyhow::Result<()> {
    let prefix = ScratchPrefix::new()?;
    let instance = prefix.child("instance");
    prefix.write_instance_config(
        &instance,
        "FROM_MODULE_THEN_FILE = \"file\"\nFILE_THEN_ENV = \"file\"\n",
    )?;
    let providers: Vec<Box<dyn ConfigProvider>> = vec![Box::new(
        StaticProvider::new("base")
            .with("FROM_MODULE_THEN_FILE", json!("module"))
            .with("MODULE_ONLY", json!("module")),
    )];
    let env = Environment::empty()
        .with("INVENIO_FILE_THEN_ENV", "env")
        .with("INVENIO_ENV_THEN_OVERRIDE", "env");
    let overrides = ConfigValues::from([("ENV_THEN_OVERRIDE".to_string(), json!("override"))]);

    let mut config = ConfigMap::new();
    ConfigLoader::new(&providers, &instance, &env).load_into(&mut config, overrides)?;

    let source = |key: &str| config.entry(key).map(|entry| entry.source.clone());
    assert_eq!(config.get_str("MODULE_ONLY"), Some("module"));
    assert_eq!(source("MODULE_ONLY"), Some(ConfigSource::Module("base".to_string())));
    assert_eq!(config.get_str("FROM_MODULE_THEN_FILE"), Some("file"));
    assert_eq!(source("FROM_MODULE_THEN_FILE"), Some(ConfigSource::InstanceFile));
    assert_eq!(config.get_str("FILE_THEN_ENV"), Some("env"));
    assert_eq!(source("FILE_THEN_ENV"), Some(ConfigSource::Environment));
    assert_eq!(config.get_str("ENV_THEN_OVERRIDE"), Some("override"));
    assert_eq!(source("ENV_THEN_OVERRIDE"), Some(ConfigSource::Override));
    assert_eq!(config.get_str("SECRET_KEY"), Some(DEFAULT_SECRET_KEY));
    assert_eq!(source("SECRET_KEY"), Some(ConfigSource::Default));
    Ok(())
}
