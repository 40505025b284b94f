use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::{debug, error, info};

use opensearch_headers::{CloudFrontEvent, CloudFrontResponse};

async fn function_handler(event: LambdaEvent<CloudFrontEvent>) -> Result<CloudFrontResponse, Error> {
    let (event, _context) = event.into_parts();

    let mut response = event.into_origin_response().map_err(|e| {
        error!("Rejecting edge event: {}", e);
        e
    })?;

    // Cookie values are never logged, they may hold session material
    match response.filter_cookies() {
        Some(report) => info!(
            "Filtered set-cookie headers - Retained: {}, Dropped: {}",
            report.retained, report.dropped
        ),
        None => debug!("No set-cookie header on origin response"),
    }

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Lambda@Edge has no environment variables, so the level is fixed here
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    run(service_fn(function_handler)).await
}
