//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use crate::SchemaPartArg;
use serde_json::{Map, Value};
use std::path::Path;
use textop_ml::config::{self, TextOpConfig};
use textop_ml::data::load_table;
use textop_ml::text::text_transformer_schemas;
use textop_ml::{SchemaPart, Table, TextTransformer, TextTransformerParams};

/// Load configuration from an explicit file, or from the usual layers.
pub fn load_effective_config(
    workspace: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<TextOpConfig> {
    let config = match config_file {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Some(workspace)),
    };
    config.map_err(|e| anyhow::anyhow!("Configuration error: {}", e))
}

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    config: &TextOpConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Schema { part } => {
            println!("{}", serde_json::to_string_pretty(schema_document(part))?);
            Ok(())
        }
        Commands::Defaults => {
            let defaults = text_transformer_schemas().hyperparam_defaults();
            println!("{}", serde_json::to_string_pretty(&defaults)?);
            Ok(())
        }
        Commands::Validate { params } => {
            let raw = read_json(&params).await?;
            resolve_params(raw, config, true)?;
            println!("{}: valid", params.display());
            Ok(())
        }
        Commands::Run {
            data,
            fit_data,
            params,
            output,
        } => {
            let raw = match params {
                Some(path) => read_json(&path).await?,
                None => Value::Object(Map::new()),
            };
            let table = run(raw, &data, fit_data.as_deref(), config).await?;
            let rendered = serde_json::to_string_pretty(&table)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, rendered).await?;
                    tracing::info!(path = %path.display(), rows = table.row_count(), "Wrote features");
                }
                None => println!("{}", rendered),
            }
            Ok(())
        }
        Commands::Config { action } => handle_config(action, workspace, config),
    }
}

fn schema_document(part: SchemaPartArg) -> &'static Value {
    let schemas = text_transformer_schemas();
    match part {
        SchemaPartArg::Combined => schemas.combined(),
        SchemaPartArg::Hyperparams => schemas.part(SchemaPart::Hyperparams),
        SchemaPartArg::InputFit => schemas.part(SchemaPart::InputFit),
        SchemaPartArg::InputTransform => schemas.part(SchemaPart::InputTransform),
        SchemaPartArg::OutputTransform => schemas.part(SchemaPart::OutputTransform),
    }
}

async fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid JSON in {}: {}", path.display(), e))
}

/// Fill a user hyperparameter object with the schema defaults and the
/// configured word2vec options, and optionally schema-check the result.
fn resolve_params(
    raw: Value,
    config: &TextOpConfig,
    validate: bool,
) -> anyhow::Result<TextTransformerParams> {
    if !raw.is_object() {
        anyhow::bail!("Hyperparameters must be a JSON object");
    }
    let schemas = text_transformer_schemas();
    let mut merged = schemas.with_hyperparam_defaults(&raw);

    if let Some(Value::Object(options)) = merged.get_mut("text_processing_options") {
        config.apply_word2vec_defaults(options);
    }

    if validate {
        schemas.validate_hyperparams(&merged)?;
    }
    Ok(TextTransformerParams::from_value(merged)?)
}

/// Fit on `fit_data` (or `data`), transform `data`, and name the output columns.
async fn run(
    raw: Value,
    data: &Path,
    fit_data: Option<&Path>,
    config: &TextOpConfig,
) -> anyhow::Result<Table> {
    let mut params = resolve_params(raw, config, config.validation.validate_hyperparams)?;

    let fit_table = match fit_data {
        Some(path) => load_table(path).await?,
        None => load_table(data).await?,
    };
    let table = match fit_data {
        Some(_) => load_table(data).await?,
        None => fit_table.clone(),
    };

    if params.column_headers_list.as_ref().is_none_or(|l| l.is_empty()) {
        params = params.with_column_headers(fit_table.columns.clone());
    }

    let mut op: TextTransformer = TextTransformer::new(params)?;
    let columns = table.columns.clone();
    let out = op
        .fit(&fit_table.into_array(), None)?
        .transform(&table.into_array())?;

    Ok(Table::new(
        op.output_headers().unwrap_or(columns),
        out.to_rows()?,
    ))
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config: &TextOpConfig,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = config::workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            if let Some(dir) = config_path.parent() {
                std::fs::create_dir_all(dir)?;
            }

            let toml_str = toml::to_string_pretty(&TextOpConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            if !config::config_exists(Some(workspace)) {
                eprintln!("No configuration file found; showing defaults.");
            }
            println!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    const REVIEWS: &str = "id,review,stars\n\
        1,the food was great and tasty,5\n\
        2,terrible service and cold food,1\n\
        3,great staff and friendly service,4\n";

    fn small_config() -> TextOpConfig {
        let mut config = TextOpConfig::default();
        config.word2vec.vector_size = 4;
        config.word2vec.output_dim = 2;
        config.word2vec.epochs = 1;
        config
    }

    #[test]
    fn test_resolve_fills_defaults_and_word2vec_options() {
        let params = resolve_params(json!({"drop_columns": true}), &small_config(), true).unwrap();
        assert!(params.drop_columns);
        assert_eq!(params.min_num_words, 3);
        assert_eq!(params.text_processing_options["word2vec"]["vector_size"], json!(4));
    }

    #[test]
    fn test_resolve_rejects_schema_violations() {
        let err = resolve_params(json!({"min_num_words": "three"}), &small_config(), true)
            .unwrap_err();
        assert!(err.to_string().contains("Schema violation"));

        let err = resolve_params(json!({"bogus": 1}), &small_config(), true).unwrap_err();
        assert!(err.to_string().contains("Schema violation"));

        assert!(resolve_params(json!([1, 2]), &small_config(), true).is_err());
    }

    #[test]
    fn test_schema_document_parts() {
        assert_eq!(
            schema_document(SchemaPartArg::OutputTransform)["description"],
            json!("Features; the outer array is over samples.")
        );
        assert!(schema_document(SchemaPartArg::Combined)["properties"]["hyperparams"].is_object());
    }

    #[tokio::test]
    async fn test_run_uses_table_headers() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("reviews.csv");
        std::fs::write(&data, REVIEWS).unwrap();

        let table = run(json!({"drop_columns": true}), &data, None, &small_config())
            .await
            .unwrap();
        assert_eq!(
            table.columns,
            vec!["id", "stars", "word2vec_review_0", "word2vec_review_1"]
        );
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[1][1], json!(1));
    }

    #[tokio::test]
    async fn test_run_inactive_passes_input_through() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("reviews.csv");
        std::fs::write(&data, REVIEWS).unwrap();

        let table = run(json!({"activate_flag": false}), &data, None, &small_config())
            .await
            .unwrap();
        assert_eq!(table.columns, vec!["id", "review", "stars"]);
        assert_eq!(table.rows[0][1], json!("the food was great and tasty"));
    }

    #[tokio::test]
    async fn test_run_with_separate_fit_data() {
        let dir = TempDir::new().unwrap();
        let fit = dir.path().join("fit.csv");
        let data = dir.path().join("data.jsonl");
        std::fs::write(&fit, REVIEWS).unwrap();
        std::fs::write(
            &data,
            "{\"id\": 9, \"review\": \"cold food and slow staff\", \"stars\": 2}\n",
        )
        .unwrap();

        let table = run(json!({}), &data, Some(&fit), &small_config())
            .await
            .unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].len(), 3 + 2);
    }

    #[tokio::test]
    async fn test_run_rejects_mismatched_width() {
        let dir = TempDir::new().unwrap();
        let fit = dir.path().join("fit.csv");
        let data = dir.path().join("data.csv");
        std::fs::write(&fit, REVIEWS).unwrap();
        std::fs::write(&data, "id,review\n1,some words here\n").unwrap();

        let err = run(json!({}), &data, Some(&fit), &small_config())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Feature mismatch"));
    }

    #[tokio::test]
    async fn test_config_init_creates_file() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace, &TextOpConfig::default())
            .await
            .unwrap();

        let config_path = workspace.join(".textop").join("config.toml");
        let content = std::fs::read_to_string(&config_path).unwrap();
        let parsed: TextOpConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, TextOpConfig::default());
    }

    #[tokio::test]
    async fn test_config_init_idempotent() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();
        let config_path = workspace.join(".textop").join("config.toml");

        handle_command(
            Commands::Config {
                action: ConfigAction::Init,
            },
            workspace,
            &TextOpConfig::default(),
        )
        .await
        .unwrap();
        std::fs::write(&config_path, "[word2vec]\nepochs = 2\n").unwrap();

        handle_command(
            Commands::Config {
                action: ConfigAction::Init,
            },
            workspace,
            &TextOpConfig::default(),
        )
        .await
        .unwrap();
        let content = std::fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, "[word2vec]\nepochs = 2\n");
    }
}
