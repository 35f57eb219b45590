//! Subcommand execution.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use searchcache_client::{CacheGateway, SearchError, TavilyClient};
use searchcache_core::{AppConfig, CacheStore, ListedRecord, ResultStore, SqliteBackend};

use crate::cli::{Command, SearchArgs};
use crate::output;

type Store = CacheStore<SqliteBackend>;

async fn open_store(config: &AppConfig) -> Result<Store> {
    let backend = SqliteBackend::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open cache database at {}", config.db_path.display()))?;
    Ok(CacheStore::from_config(backend, config))
}

pub async fn run(command: Command, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    let store = open_store(config).await?;

    match command {
        Command::Search(args) => search(Arc::new(store), config, &args, out).await,
        Command::Get { id } => {
            let Some(record) = store.fetch(&id).await? else {
                bail!("no cached record with id '{id}'");
            };
            let json = serde_json::to_string_pretty(&ListedRecord { id, record })?;
            writeln!(out, "{json}")?;
            Ok(())
        }
        Command::List { limit, offset, query } => {
            let records = store.list(limit, offset, query.as_deref()).await?;
            output::render_list(out, &records)?;
            Ok(())
        }
        Command::Delete { id } => {
            if store.delete(&id).await? {
                writeln!(out, "Deleted {id}")?;
            } else {
                writeln!(out, "No cached record with id '{id}'")?;
            }
            Ok(())
        }
        Command::Evict { days } => {
            let evicted = store.try_evict(days).await?;
            writeln!(out, "Evicted {evicted} records older than {days} days")?;
            Ok(())
        }
    }
}

async fn search(store: Arc<Store>, config: &AppConfig, args: &SearchArgs, out: &mut impl Write) -> Result<()> {
    let retention_days = args.retention_days.unwrap_or(config.retention_days);
    let evicted = store.evict(retention_days).await;
    tracing::debug!(evicted, retention_days, "pre-search sweep finished");

    let request = args.to_request();
    request.validate()?;

    // A missing key only matters once the cache misses.
    let client = match TavilyClient::from_config(config) {
        Ok(client) => Some(client),
        Err(SearchError::MissingApiKey) => None,
        Err(e) => return Err(e.into()),
    };
    let gateway = CacheGateway::new(store, client);

    let response = gateway.search_with(&request, args.refresh).await?;
    output::render_search(out, &request.query, &response)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_in(dir: &tempfile::TempDir) -> AppConfig {
        AppConfig { db_path: dir.path().join("cache.sqlite"), ..Default::default() }
    }

    async fn run_to_string(command: Command, config: &AppConfig) -> Result<String> {
        let mut out = Vec::new();
        run(command, config, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn test_get_list_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let id = open_store(&config).await.unwrap().save("rust", &json!({"results": [{"title": "a"}]})).await.unwrap();

        let listed = run_to_string(Command::List { limit: 10, offset: 0, query: None }, &config).await.unwrap();
        assert!(listed.contains(&id));
        assert!(listed.contains("(1 results)"));

        let got = run_to_string(Command::Get { id: id.clone() }, &config).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&got).unwrap();
        assert_eq!(value["id"], id.as_str());
        assert_eq!(value["query"], "rust");

        let deleted = run_to_string(Command::Delete { id: id.clone() }, &config).await.unwrap();
        assert_eq!(deleted.trim(), format!("Deleted {id}"));

        assert!(run_to_string(Command::Get { id }, &config).await.is_err());
    }

    #[tokio::test]
    async fn test_evict_all() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let store = open_store(&config).await.unwrap();
        store.save("one", &json!({})).await.unwrap();
        store.save("two", &json!({})).await.unwrap();

        let text = run_to_string(Command::Evict { days: 0 }, &config).await.unwrap();
        assert_eq!(text.trim(), "Evicted 2 records older than 0 days");
    }

    fn search_args(query: &str, retention_days: u32) -> SearchArgs {
        SearchArgs {
            query: query.into(),
            max_results: 10,
            depth: Default::default(),
            raw: false,
            include_domain: vec![],
            exclude_domain: vec![],
            retention_days: Some(retention_days),
            answer: false,
            refresh: false,
        }
    }

    #[tokio::test]
    async fn test_search_without_api_key_fails_after_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        open_store(&config).await.unwrap().save("rust", &json!({})).await.unwrap();

        let err = run_to_string(Command::Search(search_args("rust", 0)), &config).await.unwrap_err();
        assert!(err.to_string().contains("WEB_SEARCH_API_KEY"), "{err}");

        let store = open_store(&config).await.unwrap();
        assert!(store.list(10, 0, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_hit_without_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let id = open_store(&config)
            .await
            .unwrap()
            .save("rust", &json!({"results": [{"title": "cached", "url": "https://example.com"}]}))
            .await
            .unwrap();

        let text = run_to_string(Command::Search(search_args("Rust", 14)), &config).await.unwrap();
        assert!(text.contains(&id), "{text}");

        let mut refresh = search_args("rust", 14);
        refresh.refresh = true;
        assert!(run_to_string(Command::Search(refresh), &config).await.is_err());
    }
}
