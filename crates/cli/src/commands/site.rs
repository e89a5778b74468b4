//! Site widget commands: download badges and page-view tracking.

use little_oat_storefront::Storefront;
use little_oat_storefront::releases::Platform;

use super::CliError;

/// Print download counts per platform.
///
/// # Errors
///
/// Returns `CliError::NotConfigured` if no GitHub repository is set.
#[allow(clippy::print_stdout)]
pub async fn downloads(page: &Storefront) -> Result<(), CliError> {
    if page.config().github.is_none() {
        return Err(CliError::NotConfigured("GITHUB_REPOSITORY"));
    }

    let Some(badges) = page.download_badges().await else {
        println!("Download counts are unavailable right now");
        return Ok(());
    };

    for platform in Platform::ALL {
        println!("{:<8} {}", platform.label(), badges.label(platform));
    }
    if let Some(tag) = &badges.latest_tag {
        match badges.latest_published_at {
            Some(at) => println!("Latest: {tag} ({})", at.format("%Y-%m-%d")),
            None => println!("Latest: {tag}"),
        }
    }
    Ok(())
}

/// Send one page view and wait for it to finish.
///
/// # Errors
///
/// Returns `CliError::NotConfigured` if analytics is disabled.
pub async fn track(page: &Storefront, path: &str) -> Result<(), CliError> {
    let handle = page
        .track_page_view(path)
        .ok_or(CliError::NotConfigured("ANALYTICS_BASE_URL"))?;
    handle.await?;
    tracing::info!(page = path, "Page view sent");
    Ok(())
}
