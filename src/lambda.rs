#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use roadmap_fn::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use roadmap_fn::{GeminiClient, GeneratorConfig, HttpEvent, HttpResponse, RoadmapHandler};

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &RoadmapHandler<GeminiClient>,
    event: LambdaEvent<HttpEvent>,
) -> Result<HttpResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Starting roadmap function");

    Ok(handler.handle_event(event.payload).await)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = GeneratorConfig::from_env();
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e.into());
    }
    if !config.has_api_key() {
        tracing::warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }
    tracing::debug!("Generator config: {:?}", config);

    // One client for the life of the process, shared by every invocation.
    let handler = RoadmapHandler::new(GeminiClient::new(&config))
        .with_strict_output(config.strict_output);
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<HttpEvent>| async move {
        function_handler(handler, event).await
    }))
    .await
}
