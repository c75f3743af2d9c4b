use tracing::warn;

/// Downloads every chart concurrently. Each slot is `None` when its image
/// could not be fetched; failures never abort the batch.
pub async fn fetch_report_images(client: &reqwest::Client, urls: &[String]) -> Vec<Option<Vec<u8>>> {
    let handles = urls
        .iter()
        .cloned()
        .map(|url| {
            let client = client.clone();
            tokio::spawn(async move { fetch_image(&client, &url).await })
        })
        .collect::<Vec<_>>();

    let mut images = Vec::with_capacity(handles.len());
    for handle in handles {
        images.push(handle.await.ok().flatten());
    }
    images
}

async fn fetch_image(client: &reqwest::Client, url: &str) -> Option<Vec<u8>> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(%url, error = %err, "chart image download failed");
            return None;
        }
    };
    if !response.status().is_success() {
        warn!(%url, status = %response.status(), "chart image download rejected");
        return None;
    }
    match response.bytes().await {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(err) => {
            warn!(%url, error = %err, "chart image body unreadable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_urls_resolve_to_missing() {
        let client = reqwest::Client::new();
        let urls = vec![
            "http://127.0.0.1:9/decomposicao.png".to_string(),
            "not a url".to_string(),
        ];

        let images = fetch_report_images(&client, &urls).await;

        assert_eq!(images, vec![None, None]);
    }

    #[tokio::test]
    async fn empty_url_list_yields_no_images() {
        let images = fetch_report_images(&reqwest::Client::new(), &[]).await;

        assert!(images.is_empty());
    }
}
