use anyhow::{Context, Result};
use tracing::{info, warn};

/// Load resume text from a local file or a URL, preferring the URL when
/// both are set. Returns `None` when neither is configured — the scorer
/// then stays unconfigured and every job scores 0.
pub async fn load_resume(path: Option<&str>, url: Option<&str>) -> Result<Option<String>> {
    if let Some(url) = url {
        let text = fetch_resume(url).await?;
        info!(url, chars = text.len(), "Loaded resume from URL");
        return Ok(Some(text));
    }

    if let Some(path) = path {
        // A path that looks like a URL is treated as one.
        if path.starts_with("http://") || path.starts_with("https://") {
            let text = fetch_resume(path).await?;
            info!(url = path, chars = text.len(), "Loaded resume from URL");
            return Ok(Some(text));
        }
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read resume file {path}"))?;
        info!(path, chars = text.len(), "Loaded resume from file");
        return Ok(Some(text.trim().to_string()));
    }

    warn!("No resume configured; scoring will be skipped");
    Ok(None)
}

/// Best-effort variant for service bootstrap: a resume that fails to load
/// leaves scoring unconfigured (every job scores 0) instead of failing the
/// process. Scoring is enrichment, never a startup requirement.
pub async fn load_resume_best_effort(path: Option<&str>, url: Option<&str>) -> Option<String> {
    match load_resume(path, url).await {
        Ok(resume) => resume,
        Err(err) => {
            warn!(error = %err, "Failed to load resume, scoring disabled");
            None
        }
    }
}

async fn fetch_resume(url: &str) -> Result<String> {
    // GitHub blob pages serve HTML; rewrite to the raw content host.
    let url = if url.contains("github.com") && url.contains("/blob/") {
        url.replace("github.com", "raw.githubusercontent.com")
            .replace("/blob/", "/")
    } else {
        url.to_string()
    };

    let response = reqwest::Client::new()
        .get(&url)
        .timeout(std::time::Duration::from_secs(20))
        .send()
        .await
        .with_context(|| format!("Failed to fetch resume from {url}"))?
        .error_for_status()
        .with_context(|| format!("Resume fetch returned an error status for {url}"))?;

    let text = response.text().await.context("Failed to read resume body")?;
    Ok(text.trim().to_string())
}
